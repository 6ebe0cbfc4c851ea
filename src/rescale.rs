//! Problem rescaling

use num_traits::{Float, Zero, One};
use crate::solver::LinAlg;
use crate::{LinearProgrammingProblem, from_triplets};

//

/// Rescaled linear program together with its rescaling vectors.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// With \\(D_v={\bf diag}(\\)`variable_rescaling`\\()\\) and \\(D_c={\bf diag}(\\)`constraint_rescaling`\\()\\),
/// the scaled data are
/// \\(\tilde A = D_c^{-1} A D_v^{-1}\\), \\(\tilde c = D_v^{-1} c\\), \\(\tilde b = D_c^{-1} b\\),
/// \\(\tilde l = D_v l\\), \\(\tilde u = D_v u\\),
/// and a scaled solution maps back by \\(x = D_v^{-1} \tilde x\\), \\(y = D_c^{-1} \tilde y\\).
#[derive(Debug, Clone)]
pub struct ScaledProblem<F: Float>
{
    /// Rescaled problem.
    pub scaled_problem: LinearProgrammingProblem<F>,
    /// Positive column factors, one per variable.
    pub variable_rescaling: Vec<F>,
    /// Positive row factors, one per constraint.
    pub constraint_rescaling: Vec<F>,
}

impl<F: Float> ScaledProblem<F>
{
    /// Wraps a problem with identity rescaling.
    pub fn identity(problem: &LinearProgrammingProblem<F>) -> Self
    {
        let (m, n) = problem.size();

        ScaledProblem {
            scaled_problem: problem.clone(),
            variable_rescaling: vec![F::one(); n],
            constraint_rescaling: vec![F::one(); m],
        }
    }

    /// Maps a scaled primal vector back to the original space.
    pub fn unscale_primal<L: LinAlg<F=F>>(&self, scaled_primal: &[F]) -> Vec<F>
    {
        let mut x = scaled_primal.to_vec();
        L::divide_di(&self.variable_rescaling, &mut x);
        x
    }

    /// Maps a scaled dual vector back to the original space.
    pub fn unscale_dual<L: LinAlg<F=F>>(&self, scaled_dual: &[F]) -> Vec<F>
    {
        let mut y = scaled_dual.to_vec();
        L::divide_di(&self.constraint_rescaling, &mut y);
        y
    }

    /// Maps an original primal vector into the scaled space.
    pub fn scale_primal<L: LinAlg<F=F>>(&self, primal: &[F]) -> Vec<F>
    {
        let mut x = vec![F::zero(); primal.len()];
        L::transform_di(F::one(), &self.variable_rescaling, primal, F::zero(), &mut x);
        x
    }

    /// Maps an original dual vector into the scaled space.
    pub fn scale_dual<L: LinAlg<F=F>>(&self, dual: &[F]) -> Vec<F>
    {
        let mut y = vec![F::zero(); dual.len()];
        L::transform_di(F::one(), &self.constraint_rescaling, dual, F::zero(), &mut y);
        y
    }
}

//

#[derive(Debug, Clone, Copy, PartialEq)]
enum Balance
{
    /// \\(\sqrt{\max_j |a_{ij}| \cdot \min_j |a_{ij}|}\\) over nonzeros.
    GeoMean,
    /// \\(\sqrt{\max_j |a_{ij}|}\\).
    LInf,
}

struct AbsRange<F>
{
    min: Vec<F>,
    max: Vec<F>,
}

impl<F: Float> AbsRange<F>
{
    fn new(len: usize) -> Self
    {
        AbsRange {
            min: vec![F::infinity(); len],
            max: vec![F::zero(); len],
        }
    }

    fn update(&mut self, idx: usize, v: F)
    {
        self.min[idx] = self.min[idx].min(v);
        self.max[idx] = self.max[idx].max(v);
    }

    fn factors(&self, balance: Balance, eps_zero: F) -> Vec<F>
    {
        self.min.iter().zip(&self.max).map(|(lo, hi)| {
            let f = match balance {
                Balance::GeoMean => (*lo * *hi).sqrt(),
                Balance::LInf => hi.sqrt(),
            };
            // empty rows/columns leave min at infinity and max at zero
            if f.is_finite() && f > F::zero() {
                f.max(eps_zero)
            }
            else {
                F::one()
            }
        }).collect()
    }
}

fn abs_ranges<F: Float>(
    problem: &LinearProgrammingProblem<F>,
    constraint_rescaling: &[F], variable_rescaling: &[F]) -> (AbsRange<F>, AbsRange<F>)
{
    let (m, n) = problem.size();
    let mut rows = AbsRange::new(m);
    let mut cols = AbsRange::new(n);

    for (a, (r, c)) in problem.constraint_matrix().iter() {
        let v = (*a / (constraint_rescaling[r] * variable_rescaling[c])).abs();
        if v > F::zero() {
            rows.update(r, v);
            cols.update(c, v);
        }
    }

    (rows, cols)
}

fn apply<F: Float>(rescaling: &mut [F], factors: Vec<F>)
{
    for (s, f) in rescaling.iter_mut().zip(factors) {
        *s = *s * f;
    }
}

// GeoMean balances rows, then columns of the row-balanced matrix.
// LInf takes both factors from the same matrix, each being a square root.
fn balance_pass<F: Float>(
    problem: &LinearProgrammingProblem<F>, balance: Balance, eps_zero: F,
    constraint_rescaling: &mut [F], variable_rescaling: &mut [F])
{
    let (rows, cols) = abs_ranges(problem, constraint_rescaling, variable_rescaling);
    apply(constraint_rescaling, rows.factors(balance, eps_zero));

    let cols = match balance {
        Balance::GeoMean => abs_ranges(problem, constraint_rescaling, variable_rescaling).1,
        Balance::LInf => cols,
    };
    apply(variable_rescaling, cols.factors(balance, eps_zero));
}

fn log_abs_range<F: Float>(label: &str, problem: &LinearProgrammingProblem<F>)
{
    if log::log_enabled!(log::Level::Debug) {
        let mut lo = F::infinity();
        let mut hi = F::zero();
        for (a, _) in problem.constraint_matrix().iter() {
            let v = a.abs();
            if v > F::zero() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        log::debug!("{}: |A| in [{:.2e}, {:.2e}]", label,
            lo.to_f64().unwrap_or(f64::NAN), hi.to_f64().unwrap_or(f64::NAN));
    }
}

/// Rescales a problem to improve its conditioning.
///
/// Returns [`ScaledProblem`] which is equivalent to `problem` under the transform documented there.
/// The input is not modified.
/// * `problem` is the problem to rescale.
/// * `geomean_iters` is a number of passes of geometric-mean balancing,
///   each dividing rows and then columns by \\(\sqrt{\max |a_{ij}| \cdot \min |a_{ij}|}\\).
/// * `ruiz_iters` is a number of passes of L-infinity (Ruiz) equilibration, performed after the former.
///   When both are zero, the identity rescaling is returned.
/// * `eps_zero` is a lower clamp of every factor.
///   Factors of empty rows and columns are one.
pub fn rescale_problem<L: LinAlg>(
    problem: &LinearProgrammingProblem<L::F>,
    geomean_iters: usize, ruiz_iters: usize, eps_zero: L::F) -> ScaledProblem<L::F>
{
    if geomean_iters == 0 && ruiz_iters == 0 {
        return ScaledProblem::identity(problem);
    }

    let (m, n) = problem.size();
    let mut constraint_rescaling = vec![L::F::one(); m];
    let mut variable_rescaling = vec![L::F::one(); n];

    log_abs_range("before rescaling", problem);

    for _ in 0.. geomean_iters {
        balance_pass(problem, Balance::GeoMean, eps_zero, &mut constraint_rescaling, &mut variable_rescaling);
    }
    for _ in 0.. ruiz_iters {
        balance_pass(problem, Balance::LInf, eps_zero, &mut constraint_rescaling, &mut variable_rescaling);
    }

    let mat = from_triplets(m, n,
        problem.constraint_matrix().iter().map(|(a, (r, c))| {
            (r, c, *a / (constraint_rescaling[r] * variable_rescaling[c]))
        })
    );

    let mut c = problem.objective_vector().to_vec();
    L::divide_di(&variable_rescaling, &mut c);

    let mut b = problem.right_hand_side().to_vec();
    L::divide_di(&constraint_rescaling, &mut b);

    let mut l = vec![L::F::zero(); n];
    L::transform_di(L::F::one(), &variable_rescaling, problem.variable_lower_bound(), L::F::zero(), &mut l);

    let mut u = vec![L::F::zero(); n];
    L::transform_di(L::F::one(), &variable_rescaling, problem.variable_upper_bound(), L::F::zero(), &mut u);

    let scaled_problem = LinearProgrammingProblem::new_unchecked(
        c, mat, b, problem.num_equalities(), l, u
    );

    log_abs_range("after rescaling", &scaled_problem);

    ScaledProblem {
        scaled_problem,
        variable_rescaling,
        constraint_rescaling,
    }
}

//

#[cfg(test)]
fn test_problem() -> LinearProgrammingProblem<f64>
{
    // badly scaled rows and columns, with an empty row
    let a = from_triplets(3, 3, [
        (0, 0, 1000.), (0, 1, 2.),
        (2, 1, 0.01), (2, 2, 5.),
    ]);
    LinearProgrammingProblem::new(
        vec![1., -2., 3.], a, vec![4., 0., -1.], 1,
        vec![0., f64::NEG_INFINITY, -1.], vec![10., 3., f64::INFINITY],
    ).unwrap()
}

#[test]
fn test_rescale_identity()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let lp = test_problem();
    let sp = rescale_problem::<L>(&lp, 0, 0, 1e-12);

    assert_float_eq!(sp.variable_rescaling.as_slice(), [1.; 3].as_ref(), abs_all <= 0.);
    assert_float_eq!(sp.constraint_rescaling.as_slice(), [1.; 3].as_ref(), abs_all <= 0.);
    assert_eq!(sp.scaled_problem.constraint_matrix(), lp.constraint_matrix());
    assert_float_eq!(sp.scaled_problem.objective_vector(), lp.objective_vector(), abs_all <= 0.);

    let x = &[1., 2., 3.];
    let y = &[-1., 0.5, 2.];
    assert_float_eq!(sp.unscale_primal::<L>(x).as_slice(), x.as_ref(), abs_all <= 0.);
    assert_float_eq!(sp.unscale_dual::<L>(y).as_slice(), y.as_ref(), abs_all <= 0.);
}

#[test]
fn test_rescale_equivalence()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;
    use crate::SpMatOp;
    use crate::solver::Operator;

    type L = FloatGeneric<f64>;

    let lp = test_problem();
    let sp = rescale_problem::<L>(&lp, 10, 4, 1e-12);
    let slp = &sp.scaled_problem;

    for f in sp.variable_rescaling.iter().chain(&sp.constraint_rescaling) {
        assert!(f.is_finite() && *f > 0.);
    }
    // empty row
    assert_float_eq!(sp.constraint_rescaling[1], 1., abs <= 0.);

    // entries are balanced towards one
    for (a, _) in slp.constraint_matrix().iter() {
        assert!(a.abs() > 0.1 && a.abs() < 10., "{}", a);
    }

    let x = &[2., -1., 0.5];
    let y = &[0.3, -2., 1.5];
    let xs = sp.scale_primal::<L>(x);
    let ys = sp.scale_dual::<L>(y);

    // round trip
    assert_float_eq!(sp.unscale_primal::<L>(&xs).as_slice(), x.as_ref(), rmax_all <= 1e-12);
    assert_float_eq!(sp.unscale_dual::<L>(&ys).as_slice(), y.as_ref(), rmax_all <= 1e-12);

    // objective and Lagrangian terms are preserved
    assert_float_eq!(slp.objective_value::<L>(&xs), lp.objective_value::<L>(x), rmax <= 1e-12);
    assert_float_eq!(L::inner_prod(slp.right_hand_side(), &ys), L::inner_prod(lp.right_hand_side(), y), rmax <= 1e-12);

    // A x = D_c * (A_s x_s)
    let op = SpMatOp::<L>::new(lp.constraint_matrix());
    let op_s = SpMatOp::<L>::new(slp.constraint_matrix());
    let ax = &mut [0.; 3];
    let axs = &mut [0.; 3];
    op.op(1., x, 0., ax);
    op_s.op(1., &xs, 0., axs);
    for i in 0.. 3 {
        assert_float_eq!(ax[i], sp.constraint_rescaling[i] * axs[i], abs <= 1e-9);
    }

    // bounds keep their order and infinities
    assert_eq!(slp.variable_lower_bound()[1], f64::NEG_INFINITY);
    assert_eq!(slp.variable_upper_bound()[2], f64::INFINITY);
    for j in 0.. 3 {
        assert!(slp.variable_lower_bound()[j] <= slp.variable_upper_bound()[j]);
    }

    // input untouched
    assert_float_eq!(lp.objective_vector(), [1., -2., 3.].as_ref(), abs_all <= 0.);
}

#[test]
fn test_rescale_geomean()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let lp = LinearProgrammingProblem::new(
        vec![1.], from_triplets(1, 1, [(0, 0, 100.)]), vec![1.], 1,
        vec![0.], vec![1.],
    ).unwrap();
    for k in 1..= 4 {
        let sp = rescale_problem::<L>(&lp, k, 0, 1e-12);
        for (a, _) in sp.scaled_problem.constraint_matrix().iter() {
            assert_float_eq!(*a, 1., rmax <= 1e-12);
        }
    }

    let lp = LinearProgrammingProblem::new(
        vec![1., 1.], from_triplets(2, 2, [(0, 0, 1000.), (0, 1, 2.), (1, 1, 0.01)]), vec![1., 1.], 2,
        vec![0., 0.], vec![1., 1.],
    ).unwrap();
    let sp = rescale_problem::<L>(&lp, 10, 0, 1e-12);
    for (a, _) in sp.scaled_problem.constraint_matrix().iter() {
        assert_float_eq!(*a, 1., rmax <= 1e-4);
    }
}
