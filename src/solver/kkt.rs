//! KKT error evaluation

use std::time::Instant;
use num_traits::{Float, Zero, One};
use crate::solver::{LinAlg, Operator, Iterate, IterationStatsRecord};
use crate::{ScaledProblem, SpMatOp};

//

// positive part, keeping NaN
fn pos<F: Float>(v: F) -> F
{
    if v < F::zero() {F::zero()} else {v}
}

/// Evaluates optimality of scaled iterates in the original space.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// With \\(x, y\\) the unscaled iterate and \\(r = c - A^T y\\) the reduced cost,
/// * the primal residual stacks \\(A_E x - b_E\\), \\(\max(b_I - A_I x, 0)\\)
///   and violations of finite variable bounds,
/// * the dual residual stacks, for each variable, the part of \\(r_j\\) no finite bound can absorb,
///   and \\(\max(-y_I, 0)\\),
/// * the dual objective is \\(b^T y + \sum_{l_j > -\infty} l_j \max(r_j, 0) + \sum_{u_j < \infty} u_j \min(r_j, 0)\\),
///
/// and the KKT error is the 2-norm of both residuals and the objective gap put together.
/// Only \\(\tilde A \tilde x\\) and \\(\tilde A^T \tilde y\\) are computed on the scaled problem;
/// the rescaling vectors map the results back.
pub struct KktEvaluator<'a, L: LinAlg>
{
    scaled: &'a ScaledProblem<L::F>,
    op_a: SpMatOp<'a, L>,
}

impl<'a, L: LinAlg> KktEvaluator<'a, L>
{
    /// Creates an instance.
    ///
    /// Returns [`KktEvaluator`] instance borrowing `scaled`.
    pub fn new(scaled: &'a ScaledProblem<L::F>) -> Self
    {
        KktEvaluator {
            scaled,
            op_a: SpMatOp::new(scaled.scaled_problem.constraint_matrix()),
        }
    }

    /// Evaluates a scaled iterate.
    ///
    /// Returns [`IterationStatsRecord`] stamped with `iteration`, `cumulative_kkt_passes`
    /// and the seconds elapsed since `start`.
    /// * `iterate` is the current scaled iterate.
    /// * `delta` is the scaled difference from the previous iterate.
    pub fn evaluate(&self,
        iterate: &Iterate<L::F>, delta: &Iterate<L::F>,
        iteration: usize, cumulative_kkt_passes: f64, start: Instant) -> IterationStatsRecord<L::F>
    {
        let prob = &self.scaled.scaled_problem;
        let (m, n) = prob.size();
        let num_eq = prob.num_equalities();

        let f0 = L::F::zero();
        let f1 = L::F::one();

        let x = self.scaled.unscale_primal::<L>(&iterate.primal);
        let lb = self.scaled.unscale_primal::<L>(prob.variable_lower_bound());
        let ub = self.scaled.unscale_primal::<L>(prob.variable_upper_bound());

        // A x - b
        let mut p = prob.right_hand_side().to_vec();
        self.op_a.op(f1, &iterate.primal, -f1, &mut p);
        for (e, cr) in p.iter_mut().zip(&self.scaled.constraint_rescaling) {
            *e = *e * *cr;
        }
        for e in p[num_eq..].iter_mut() {
            *e = pos(-*e);
        }

        let mut p_bound = vec![f0; n];
        for j in 0.. n {
            if lb[j].is_finite() {
                p_bound[j] = p_bound[j] + pos(lb[j] - x[j]);
            }
            if ub[j].is_finite() {
                p_bound[j] = p_bound[j] + pos(x[j] - ub[j]);
            }
        }

        // c - A^T y
        let mut r = prob.objective_vector().to_vec();
        self.op_a.trans_op(-f1, &iterate.dual, f1, &mut r);
        for (e, vr) in r.iter_mut().zip(&self.scaled.variable_rescaling) {
            *e = *e * *vr;
        }

        let mut d = vec![f0; n];
        let mut bound_obj = f0;
        for j in 0.. n {
            let (lf, uf) = (lb[j].is_finite(), ub[j].is_finite());
            d[j] = match (lf, uf) {
                (true, true) => f0,
                (true, false) => pos(-r[j]),
                (false, true) => pos(r[j]),
                (false, false) => r[j],
            };
            if lf {
                bound_obj = bound_obj + lb[j] * pos(r[j]);
            }
            if uf {
                bound_obj = bound_obj - ub[j] * pos(-r[j]);
            }
        }

        let y = self.scaled.unscale_dual::<L>(&iterate.dual);
        let d_ineq: Vec<L::F> = y[num_eq..].iter().map(|e| pos(-*e)).collect();

        let primal_objective = L::inner_prod(prob.objective_vector(), &iterate.primal);
        let dual_objective = L::inner_prod(prob.right_hand_side(), &iterate.dual) + bound_obj;
        let gap = (primal_objective - dual_objective).abs();

        let l2_primal_residual = L::norm(&p).hypot(L::norm(&p_bound));
        let l2_dual_residual = L::norm(&d).hypot(L::norm(&d_ineq));

        let kkt_error = (l2_primal_residual * l2_primal_residual
            + l2_dual_residual * l2_dual_residual
            + gap * gap).sqrt();

        let primal_delta_norm = L::norm(&self.scaled.unscale_primal::<L>(&delta.primal));
        let dual_delta_norm = L::norm(&self.scaled.unscale_dual::<L>(&delta.dual));

        debug_assert_eq!(y.len(), m);

        IterationStatsRecord {
            iteration,
            cumulative_kkt_passes,
            elapsed_time: start.elapsed().as_secs_f64(),
            kkt_error,
            primal_objective,
            dual_objective,
            gap,
            l2_primal_residual,
            l2_dual_residual,
            primal_delta_norm,
            dual_delta_norm,
        }
    }
}

//

#[cfg(test)]
fn test_problem() -> crate::LinearProgrammingProblem<f64>
{
    use crate::from_triplets;

    // min x0 + x1  s.t.  x0 + x1 = 1, 2 x0 >= 0.5, 0 <= x0 <= 1, x1 >= 0
    let a = from_triplets(2, 2, [
        (0, 0, 1.), (0, 1, 1.),
        (1, 0, 2.),
    ]);
    crate::LinearProgrammingProblem::new(
        vec![1., 1.], a, vec![1., 0.5], 1,
        vec![0., 0.], vec![1., f64::INFINITY],
    ).unwrap()
}

#[test]
fn test_kkt_optimal()
{
    use float_eq::assert_float_eq;
    use crate::{FloatGeneric, ScaledProblem};

    type L = FloatGeneric<f64>;

    let lp = test_problem();
    let sp = ScaledProblem::identity(&lp);
    let kkt = KktEvaluator::<L>::new(&sp);

    // optimal: y = (1, 0), r = (0, 0)
    let it = Iterate {
        primal: vec![0.5, 0.5],
        dual: vec![1., 0.],
    };
    let rec = kkt.evaluate(&it, &Iterate::zeros(2, 2), 7, 14., Instant::now());

    assert_eq!(rec.iteration, 7);
    assert_float_eq!(rec.cumulative_kkt_passes, 14., abs <= 0.);
    assert_float_eq!(rec.kkt_error, 0., abs <= 1e-12);
    assert_float_eq!(rec.primal_objective, 1., abs <= 1e-12);
    assert_float_eq!(rec.dual_objective, 1., abs <= 1e-12);
}

#[test]
fn test_kkt_residuals()
{
    use float_eq::assert_float_eq;
    use crate::{FloatGeneric, ScaledProblem};

    type L = FloatGeneric<f64>;

    let lp = test_problem();
    let sp = ScaledProblem::identity(&lp);
    let kkt = KktEvaluator::<L>::new(&sp);

    let it = Iterate {
        primal: vec![0., 0.],
        dual: vec![0., -1.],
    };
    let delta = Iterate {
        primal: vec![3., 4.],
        dual: vec![0., 0.],
    };
    let rec = kkt.evaluate(&it, &delta, 0, 0., Instant::now());

    // A x - b = (-1, -0.5) -> (-1, 0.5)
    assert_float_eq!(rec.l2_primal_residual, 1.25_f64.sqrt(), abs <= 1e-12);
    // r = c - A^T y = (1 + 2, 1) absorbed by finite lower bounds, y1 = -1 violates
    assert_float_eq!(rec.l2_dual_residual, 1., abs <= 1e-12);
    // b^T y + l^T max(r, 0) = -0.5
    assert_float_eq!(rec.dual_objective, -0.5, abs <= 1e-12);
    assert_float_eq!(rec.gap, 0.5, abs <= 1e-12);
    assert_float_eq!(rec.kkt_error, (1.25_f64 + 1. + 0.25).sqrt(), abs <= 1e-12);
    assert_float_eq!(rec.primal_delta_norm, 5., abs <= 1e-12);
    assert_float_eq!(rec.dual_delta_norm, 0., abs <= 1e-12);
}

#[test]
fn test_kkt_unscaled()
{
    use float_eq::assert_float_eq;
    use crate::{FloatGeneric, ScaledProblem, rescale_problem};

    type L = FloatGeneric<f64>;

    let lp = test_problem();
    let id = ScaledProblem::identity(&lp);
    let sp = rescale_problem::<L>(&lp, 10, 4, 1e-12);

    let it = Iterate {
        primal: vec![0.2, 0.3],
        dual: vec![0.7, -0.4],
    };
    let delta = Iterate {
        primal: vec![0.1, -0.2],
        dual: vec![0.3, 0.1],
    };
    let it_s = Iterate {
        primal: sp.scale_primal::<L>(&it.primal),
        dual: sp.scale_dual::<L>(&it.dual),
    };
    let delta_s = Iterate {
        primal: sp.scale_primal::<L>(&delta.primal),
        dual: sp.scale_dual::<L>(&delta.dual),
    };

    let rec = KktEvaluator::<L>::new(&id).evaluate(&it, &delta, 0, 0., Instant::now());
    let rec_s = KktEvaluator::<L>::new(&sp).evaluate(&it_s, &delta_s, 0, 0., Instant::now());

    assert_float_eq!(rec_s.kkt_error, rec.kkt_error, rmax <= 1e-9);
    assert_float_eq!(rec_s.l2_primal_residual, rec.l2_primal_residual, rmax <= 1e-9);
    assert_float_eq!(rec_s.l2_dual_residual, rec.l2_dual_residual, rmax <= 1e-9);
    assert_float_eq!(rec_s.primal_objective, rec.primal_objective, rmax <= 1e-9);
    assert_float_eq!(rec_s.dual_objective, rec.dual_objective, rmax <= 1e-9);
    assert_float_eq!(rec_s.primal_delta_norm, rec.primal_delta_norm, rmax <= 1e-9);
    assert_float_eq!(rec_s.dual_delta_norm, rec.dual_delta_norm, rmax <= 1e-9);
}
