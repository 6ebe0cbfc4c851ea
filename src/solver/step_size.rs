use num_traits::{Float, Zero, One, NumCast};
use crate::solver::{LinAlg, Operator, SolverParam};

/// Safety factor below one keeping \\(t \\|A\\|_2\\) strictly less than one.
pub const STEP_SIZE_FACTOR: f64 = 0.99;

// number of start vectors tried before concluding a zero operator
const START_TRIALS: u64 = 3;

// deterministic start vector with distinct positive entries, differing by `seed`
fn start_vector<L: LinAlg>(n: usize, seed: u64) -> Vec<L::F>
{
    let mut v: Vec<L::F> = (0.. n).map(|j| {
        let h = ((seed << 32) ^ (j as u64 + 1)).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let u = (h >> 11) as f64 / (1_u64 << 53) as f64;
        <L::F as NumCast>::from(0.5 + u).unwrap_or_else(L::F::one)
    }).collect();

    let norm = L::norm(&v);
    L::scale(norm.recip(), &mut v);
    v
}

// power method on K^T K from `v`; None if `v` lies in the null space of K
fn power_iteration<L, O>(op: &O, mut v: Vec<L::F>, max_iter: usize, tol: L::F) -> Option<L::F>
where L: LinAlg, O: Operator<L>
{
    let f0 = L::F::zero();
    let f1 = L::F::one();
    let (m, n) = op.size();

    let mut kv = vec![f0; m];
    let mut ktkv = vec![f0; n];
    let mut sq_sigma = f0;

    for i in 0.. max_iter {
        op.op(f1, &v, f0, &mut kv);
        op.trans_op(f1, &kv, f0, &mut ktkv);

        let lambda = L::norm(&ktkv);
        if lambda == f0 {
            return None;
        }
        else if !(lambda > f0) {
            // NaN
            return Some(lambda);
        }

        L::copy(&ktkv, &mut v);
        L::scale(lambda.recip(), &mut v);

        let conv = (lambda - sq_sigma).abs() <= tol * lambda;
        sq_sigma = lambda;

        if conv {
            log::trace!("power method converged at {}", i);
            break;
        }
    }

    Some(sq_sigma.sqrt())
}

/// Estimates the spectral norm \\(\\|K\\|_2\\), the largest singular value of an operator.
///
/// Returns the estimate by the power method on \\(K^T K\\), or zero for an empty or zero operator.
/// A start vector falling in the null space of \\(K\\) is replaced by another one
/// before the operator is regarded as zero.
/// * `op` is the operator \\(K\\).
/// * `max_iter` is a max iteration number.
/// * `tol` is a relative tolerance of the change of the estimate to stop.
pub fn spectral_norm<L, O>(op: &O, max_iter: usize, tol: L::F) -> L::F
where L: LinAlg, O: Operator<L>
{
    let (m, n) = op.size();

    if m == 0 || n == 0 {
        return L::F::zero();
    }

    for seed in 0.. START_TRIALS {
        if let Some(sigma) = power_iteration::<L, _>(op, start_vector::<L>(n, seed), max_iter, tol) {
            return sigma;
        }
        log::debug!("start vector {} in the null space", seed);
    }

    L::F::zero()
}

/// Selects the step size of the primal and the dual update.
///
/// Returns [`SolverParam::step_size`] as it is if given,
/// otherwise [`STEP_SIZE_FACTOR`] divided by the spectral norm of `op_a`,
/// which satisfies the convergence condition \\(t^2 \\|A\\|_2^2 < 1\\).
/// A zero operator results in an infinite step size.
pub fn select_step_size<L, O>(op_a: &O, par: &SolverParam<L::F>) -> L::F
where L: LinAlg, O: Operator<L>
{
    if let Some(step_size) = par.step_size {
        step_size
    }
    else {
        let norm = spectral_norm::<L, _>(op_a, par.power_iter_max, par.power_iter_tol);
        let factor = <L::F as NumCast>::from(STEP_SIZE_FACTOR).unwrap();
        factor / norm
    }
}

//

#[test]
fn test_spectral_norm()
{
    use float_eq::assert_float_eq;
    use crate::{FloatGeneric, SpMatOp, from_triplets};

    type L = FloatGeneric<f64>;

    let a = from_triplets(2, 2, [(0, 0, 3.), (1, 1, 1.)]);
    let op = SpMatOp::<L>::new(&a);
    assert_float_eq!(spectral_norm::<L, _>(&op, 1000, 1e-12), 3., rmax <= 1e-6);

    let a = from_triplets(1, 2, [(0, 0, 1.), (0, 1, -1.)]);
    let op = SpMatOp::<L>::new(&a);
    assert_float_eq!(spectral_norm::<L, _>(&op, 1000, 1e-12), 2_f64.sqrt(), rmax <= 1e-6);

    // [[1, 2], [3, 4]] has singular values 5.4650 and 0.3660
    let a = from_triplets(2, 2, [(0, 0, 1.), (0, 1, 2.), (1, 0, 3.), (1, 1, 4.)]);
    let op = SpMatOp::<L>::new(&a);
    assert_float_eq!(spectral_norm::<L, _>(&op, 1000, 1e-12), 5.464985704, rmax <= 1e-6);

    let a = from_triplets(2, 3, std::iter::empty::<(usize, usize, f64)>());
    let op = SpMatOp::<L>::new(&a);
    assert_float_eq!(spectral_norm::<L, _>(&op, 1000, 1e-12), 0., abs <= 0.);
}

#[test]
fn test_select_step_size()
{
    use float_eq::assert_float_eq;
    use crate::{FloatGeneric, SpMatOp, from_triplets};

    type L = FloatGeneric<f64>;

    let a = from_triplets(1, 2, [(0, 0, 1.), (0, 1, 1.)]);
    let op = SpMatOp::<L>::new(&a);

    let par = SolverParam::default();
    let t = select_step_size::<L, _>(&op, &par);
    assert_float_eq!(t, 0.99 / 2_f64.sqrt(), rmax <= 1e-6);
    assert!(t * t * 2. < 1.);

    let par = SolverParam {step_size: Some(0.25), ..Default::default()};
    assert_float_eq!(select_step_size::<L, _>(&op, &par), 0.25, abs <= 0.);

    let z = from_triplets(1, 2, std::iter::empty::<(usize, usize, f64)>());
    let op = SpMatOp::<L>::new(&z);
    assert!(select_step_size::<L, _>(&op, &SolverParam::default()).is_infinite());
}

#[test]
fn test_spectral_norm_null_start()
{
    use float_eq::assert_float_eq;
    use crate::{FloatGeneric, SpMatOp, from_triplets};

    type L = FloatGeneric<f64>;

    // the first start vector s is orthogonal to the only row [s1, -s0], whose norm is one
    let s = start_vector::<L>(2, 0);
    let a = from_triplets(1, 2, [(0, 0, s[1]), (0, 1, -s[0])]);
    let op = SpMatOp::<L>::new(&a);

    let mut kv = [0.];
    op.op(1., &s, 0., &mut kv);
    assert_float_eq!(kv[0], 0., abs <= 1e-15);

    assert_float_eq!(spectral_norm::<L, _>(&op, 1000, 1e-12), 1., rmax <= 1e-6);
}
