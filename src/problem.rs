use num_traits::Float;
use sprs::CsMat;
use crate::solver::{LinAlg, SolverError};

//

/// Standard-form linear program
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & c^T x \\\\
/// {\rm subject \ to} & A_E x = b_E \\\\
/// & A_I x \ge b_I \\\\
/// & l \le x \le u,
/// \end{array}
/// \\]
/// where the first `num_equalities` rows of \\(A\\) form \\(A_E\\) and the rest form \\(A_I\\).
/// Bounds may be infinite.
#[derive(Debug, Clone)]
pub struct LinearProgrammingProblem<F: Float>
{
    objective_vector: Vec<F>,
    constraint_matrix: CsMat<F>,
    right_hand_side: Vec<F>,
    num_equalities: usize,
    variable_lower_bound: Vec<F>,
    variable_upper_bound: Vec<F>,
}

impl<F: Float> LinearProgrammingProblem<F>
{
    /// Creates an instance.
    ///
    /// Returns [`LinearProgrammingProblem`] instance,
    /// or `Err` with [`SolverError::InvalidProblem`] if dimensions disagree,
    /// `num_equalities` exceeds the number of rows, or some `lower > upper` (or is NaN).
    pub fn new(
        objective_vector: Vec<F>,
        constraint_matrix: CsMat<F>,
        right_hand_side: Vec<F>,
        num_equalities: usize,
        variable_lower_bound: Vec<F>,
        variable_upper_bound: Vec<F>,
    ) -> Result<Self, SolverError>
    {
        let (m, n) = (constraint_matrix.rows(), constraint_matrix.cols());

        if objective_vector.len() != n || right_hand_side.len() != m
            || variable_lower_bound.len() != n || variable_upper_bound.len() != n {
            log::error!("Size mismatch: c({}), A({}, {}), b({}), l({}), u({})",
                objective_vector.len(), m, n, right_hand_side.len(),
                variable_lower_bound.len(), variable_upper_bound.len());
            return Err(SolverError::InvalidProblem);
        }

        if num_equalities > m {
            log::error!("num_equalities {} must be <= {}", num_equalities, m);
            return Err(SolverError::InvalidProblem);
        }

        for (j, (l, u)) in variable_lower_bound.iter().zip(&variable_upper_bound).enumerate() {
            // also rejects NaN
            if !(*l <= *u) {
                log::error!("Bound of variable {} is empty", j);
                return Err(SolverError::InvalidProblem);
            }
        }

        Ok(LinearProgrammingProblem {
            objective_vector,
            constraint_matrix,
            right_hand_side,
            num_equalities,
            variable_lower_bound,
            variable_upper_bound,
        })
    }

    /// Creates an instance from data already known to satisfy the invariants of [`LinearProgrammingProblem::new`].
    pub(crate) fn new_unchecked(
        objective_vector: Vec<F>,
        constraint_matrix: CsMat<F>,
        right_hand_side: Vec<F>,
        num_equalities: usize,
        variable_lower_bound: Vec<F>,
        variable_upper_bound: Vec<F>,
    ) -> Self
    {
        LinearProgrammingProblem {
            objective_vector,
            constraint_matrix,
            right_hand_side,
            num_equalities,
            variable_lower_bound,
            variable_upper_bound,
        }
    }

    /// Number of rows and columns of the constraint matrix.
    pub fn size(&self) -> (usize, usize)
    {
        (self.constraint_matrix.rows(), self.constraint_matrix.cols())
    }

    pub fn objective_vector(&self) -> &[F]
    {
        &self.objective_vector
    }

    pub fn constraint_matrix(&self) -> &CsMat<F>
    {
        &self.constraint_matrix
    }

    pub fn right_hand_side(&self) -> &[F]
    {
        &self.right_hand_side
    }

    pub fn num_equalities(&self) -> usize
    {
        self.num_equalities
    }

    pub fn num_inequalities(&self) -> usize
    {
        self.right_hand_side.len() - self.num_equalities
    }

    pub fn is_equality_row(&self, row: usize) -> bool
    {
        row < self.num_equalities
    }

    pub fn variable_lower_bound(&self) -> &[F]
    {
        &self.variable_lower_bound
    }

    pub fn variable_upper_bound(&self) -> &[F]
    {
        &self.variable_upper_bound
    }

    /// Objective value \\(c^T x\\).
    pub fn objective_value<L: LinAlg<F=F>>(&self, x: &[F]) -> F
    {
        L::inner_prod(&self.objective_vector, x)
    }
}

//

#[test]
fn test_problem1()
{
    use crate::from_triplets;

    let a = from_triplets(2, 2, [(0, 0, 1.), (1, 1, 1.)]);

    let lp = LinearProgrammingProblem::new(
        vec![1., 1.], a.clone(), vec![1., 0.], 1, vec![0., 0.], vec![1., f64::INFINITY],
    ).unwrap();
    assert_eq!(lp.size(), (2, 2));
    assert_eq!(lp.num_inequalities(), 1);
    assert!(lp.is_equality_row(0));
    assert!(!lp.is_equality_row(1));

    let e = LinearProgrammingProblem::new(
        vec![1., 1.], a.clone(), vec![1., 0.], 3, vec![0., 0.], vec![1., 1.],
    ).unwrap_err();
    assert_eq!(e, SolverError::InvalidProblem);

    let e = LinearProgrammingProblem::new(
        vec![1.], a.clone(), vec![1., 0.], 1, vec![0., 0.], vec![1., 1.],
    ).unwrap_err();
    assert_eq!(e, SolverError::InvalidProblem);

    let e = LinearProgrammingProblem::new(
        vec![1., 1.], a, vec![1., 0.], 1, vec![0., 2.], vec![1., 1.],
    ).unwrap_err();
    assert_eq!(e, SolverError::InvalidProblem);
}
