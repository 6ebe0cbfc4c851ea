//! Primal-dual hybrid gradient step

use num_traits::{Float, Zero, One};
use crate::solver::{LinAlg, Operator};
use crate::{LinearProgrammingProblem, SpMatOp};

//

/// Pair of primal and dual vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Iterate<F: Float>
{
    /// Primal vector, one element per variable.
    pub primal: Vec<F>,
    /// Dual vector, one element per constraint.
    pub dual: Vec<F>,
}

impl<F: Float> Iterate<F>
{
    /// Creates an iterate of zeros for `m` constraints and `n` variables.
    pub fn zeros(m: usize, n: usize) -> Self
    {
        Iterate {
            primal: vec![F::zero(); n],
            dual: vec![F::zero(); m],
        }
    }

    /// Elementwise difference `self - prev`.
    pub fn delta_from<L: LinAlg<F=F>>(&self, prev: &Iterate<F>) -> Iterate<F>
    {
        let mut d = self.clone();
        L::add(-F::one(), &prev.primal, &mut d.primal);
        L::add(-F::one(), &prev.dual, &mut d.dual);
        d
    }
}

//

// comparisons keep NaN instead of snapping it to a bound
fn clamp<F: Float>(v: F, lo: F, hi: F) -> F
{
    if v < lo {
        lo
    }
    else if v > hi {
        hi
    }
    else {
        v
    }
}

/// PDHG update with extrapolation for a scaled [`LinearProgrammingProblem`].
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// One step with a step size \\(t\\) reads
/// \\[
/// \begin{array}{l}
/// x^+ = \Pi_X \left( x - t (c - A^T y) \right) \\\\
/// y^+ = \Pi_Y \left( y - t (A (2 x^+ - x) - b) \right),
/// \end{array}
/// \\]
/// where \\(\Pi_X\\) clamps to the variable bounds and
/// \\(\Pi_Y\\) clamps the dual of inequality rows to be nonnegative.
/// It converges when \\(t^2 \\|A\\|_2^2 < 1\\).
pub struct PdhgStepper<'a, L: LinAlg>
{
    problem: &'a LinearProgrammingProblem<L::F>,
    op_a: SpMatOp<'a, L>,
}

impl<'a, L: LinAlg> PdhgStepper<'a, L>
{
    /// Creates an instance.
    ///
    /// Returns [`PdhgStepper`] instance borrowing `problem`.
    pub fn new(problem: &'a LinearProgrammingProblem<L::F>) -> Self
    {
        PdhgStepper {
            problem,
            op_a: SpMatOp::new(problem.constraint_matrix()),
        }
    }

    /// Clamps each element of `x` into its variable bounds.
    pub fn projection_primal(&self, x: &mut [L::F])
    {
        let lb = self.problem.variable_lower_bound();
        let ub = self.problem.variable_upper_bound();
        assert_eq!(x.len(), lb.len());

        for (j, e) in x.iter_mut().enumerate() {
            *e = clamp(*e, lb[j], ub[j]);
        }
    }

    /// Clamps the inequality part of `y` to be nonnegative. The equality part is kept.
    pub fn projection_dual(&self, y: &mut [L::F])
    {
        let f0 = L::F::zero();
        let (_, y_ineq) = y.split_at_mut(self.problem.num_equalities());

        for e in y_ineq {
            if *e < f0 {
                *e = f0;
            }
        }
    }

    /// Performs one step.
    ///
    /// Returns the next [`Iterate`]; `iterate` is left untouched.
    pub fn step(&self, iterate: &Iterate<L::F>, step_size: L::F) -> Iterate<L::F>
    {
        let (m, n) = self.problem.size();
        assert_eq!(iterate.primal.len(), n);
        assert_eq!(iterate.dual.len(), m);

        let f1 = L::F::one();
        let t = step_size;

        // x - t c + t A^T y
        let mut primal = iterate.primal.clone();
        L::add(-t, self.problem.objective_vector(), &mut primal);
        self.op_a.trans_op(t, &iterate.dual, f1, &mut primal);
        self.projection_primal(&mut primal);

        // 2 x+ - x
        let mut extra = primal.clone();
        L::scale(f1 + f1, &mut extra);
        L::add(-f1, &iterate.primal, &mut extra);

        // y - t A (2 x+ - x) + t b
        let mut dual = iterate.dual.clone();
        self.op_a.op(-t, &extra, f1, &mut dual);
        L::add(t, self.problem.right_hand_side(), &mut dual);
        self.projection_dual(&mut dual);

        Iterate {
            primal,
            dual,
        }
    }
}

//

#[cfg(test)]
fn test_problem() -> LinearProgrammingProblem<f64>
{
    use crate::from_triplets;

    // x0 + x1 = 1, x0 - x1 >= -2, 0 <= x0 <= 1, x1 free
    let a = from_triplets(2, 2, [
        (0, 0, 1.), (0, 1, 1.),
        (1, 0, 1.), (1, 1, -1.),
    ]);
    LinearProgrammingProblem::new(
        vec![1., 2.], a, vec![1., -2.], 1,
        vec![0., f64::NEG_INFINITY], vec![1., f64::INFINITY],
    ).unwrap()
}

#[test]
fn test_projections()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let lp = test_problem();
    let s = PdhgStepper::<L>::new(&lp);

    for x0 in [[-3., -7.], [0.5, 1e30], [4., 0.]] {
        let mut x = x0;
        s.projection_primal(&mut x);
        assert!(x[0] >= 0. && x[0] <= 1.);
        assert_float_eq!(x[1], x0[1], abs <= 0.);

        let mut xx = x;
        s.projection_primal(&mut xx);
        assert_float_eq!(xx.as_ref(), x.as_ref(), abs_all <= 0.);
    }

    let mut y = [-2., -3.];
    s.projection_dual(&mut y);
    assert_float_eq!(y.as_ref(), [-2., 0.].as_ref(), abs_all <= 0.);
    let mut yy = y;
    s.projection_dual(&mut yy);
    assert_float_eq!(yy.as_ref(), y.as_ref(), abs_all <= 0.);

    let mut y = [5., 6.];
    s.projection_dual(&mut y);
    assert_float_eq!(y.as_ref(), [5., 6.].as_ref(), abs_all <= 0.);

    let mut x = [f64::NAN, 0.];
    s.projection_primal(&mut x);
    assert!(x[0].is_nan());
}

#[test]
fn test_step_zero()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let lp = test_problem();
    let s = PdhgStepper::<L>::new(&lp);

    let it = Iterate {
        primal: vec![2., -1.],
        dual: vec![-1., -1.],
    };
    let next = s.step(&it, 0.);

    let mut x = it.primal.clone();
    let mut y = it.dual.clone();
    s.projection_primal(&mut x);
    s.projection_dual(&mut y);

    assert_float_eq!(next.primal.as_slice(), x.as_slice(), abs_all <= 0.);
    assert_float_eq!(next.dual.as_slice(), y.as_slice(), abs_all <= 0.);
    assert_eq!(it.primal, vec![2., -1.]);
}

#[test]
fn test_step1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let lp = test_problem();
    let s = PdhgStepper::<L>::new(&lp);

    let it = Iterate {
        primal: vec![0.5, 0.],
        dual: vec![1., 0.5],
    };
    let t = 0.5;
    let next = s.step(&it, t);

    // c - A^T y = [1 - 1.5, 2 - 0.5]
    let x = [0.5 - t * (1. - 1.5), 0. - t * (2. - 0.5)];
    let x = [x[0].max(0.).min(1.), x[1]];
    let e = [2. * x[0] - 0.5, 2. * x[1]];
    let y = [1. - t * (e[0] + e[1] - 1.), 0.5 - t * (e[0] - e[1] + 2.)];
    let y = [y[0], y[1].max(0.)];

    assert_float_eq!(next.primal.as_slice(), x.as_ref(), abs_all <= 1e-12);
    assert_float_eq!(next.dual.as_slice(), y.as_ref(), abs_all <= 1e-12);

    let d = next.delta_from::<L>(&it);
    assert_float_eq!(d.primal.as_slice(), [x[0] - 0.5, x[1]].as_ref(), abs_all <= 1e-12);
    assert_float_eq!(d.dual.as_slice(), [y[0] - 1., y[1] - 0.5].as_ref(), abs_all <= 1e-12);
}
