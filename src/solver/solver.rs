use std::fmt::{Debug, LowerExp};
use std::time::Instant;
use num_traits::{Float, Zero};
use crate::solver::{LinAlg, SolverError, SolverParam};
use crate::solver::{Iterate, PdhgStepper, KktEvaluator, IterationStatsRecord, IterationStatsTable, select_step_size};
use crate::logger::{StatsLogger, LogLogger};
use crate::{LinearProgrammingProblem, ScaledProblem, SpMatOp, rescale_problem};

/// Work of one iteration in units of KKT passes:
/// one primal-direction (\\(A^T y\\)) and one dual-direction (\\(A x\\)) matrix pass.
pub const KKT_PASSES_PER_ITERATION: f64 = 2.0;

/// Termination status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus
{
    /// KKT error reached the tolerance.
    Optimal,
    /// Iteration limit reached before the tolerance.
    IterationLimit,
}

/// Result of [`Solver::solve`].
#[derive(Debug, Clone)]
pub struct Output<F: Float>
{
    /// Primal solution in the original space.
    pub primal_solution: Vec<F>,
    /// Dual solution in the original space.
    pub dual_solution: Vec<F>,
    /// Recorded iteration stats.
    pub iteration_stats: IterationStatsTable<F>,
    pub status: SolverStatus,
}

//

/// First-order LP solver.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// The target problem is
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & c^T x \\\\
/// {\rm subject \ to} & A_E x = b_E \\\\
/// & A_I x \ge b_I \\\\
/// & l \le x \le u,
/// \end{array}
/// \\]
/// given as [`LinearProgrammingProblem`], whose leading rows \\(E\\) are equalities
/// and the rest \\(I\\) are inequalities.
///
/// The solver rescales the problem, then iterates [`PdhgStepper`] until the KKT error
/// of the iterate falls below [`SolverParam::kkt_tolerance`] or the iteration count reaches
/// [`SolverParam::iteration_limit`].
pub struct Solver<L: LinAlg>
{
    /// solver parameters.
    pub par: SolverParam<L::F>,
}

impl<L: LinAlg> Solver<L>
{
    /// Creates an instance.
    ///
    /// Returns [`Solver`] instance.
    pub fn new() -> Self
    {
        Solver {
            par: SolverParam::default(),
        }
    }

    /// Changes solver parameters.
    ///
    /// Returns [`Solver`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut SolverParam<L::F>)
    {
        f(&mut self.par);
        self
    }
}

impl<L: LinAlg> Solver<L>
where L::F: Float + Debug + LowerExp
{
    /// Starts to solve a linear program, printing iteration stats through [`LogLogger`].
    ///
    /// Returns `Ok` with [`Output`] or `Err` with [`SolverError`] type.
    /// Reaching the iteration limit is not an error but [`SolverStatus::IterationLimit`].
    /// * `problem` is the linear program to solve.
    pub fn solve(self, problem: &LinearProgrammingProblem<L::F>) -> Result<Output<L::F>, SolverError>
    {
        self.solve_with_logger(problem, LogLogger)
    }

    /// Starts to solve a linear program with a logger of your choice.
    ///
    /// Same as [`Solver::solve`] except that
    /// * `logger` receives a header and formatted rows of iteration stats when [`SolverParam::verbosity`] is on.
    pub fn solve_with_logger<S>(self, problem: &LinearProgrammingProblem<L::F>, logger: S)
    -> Result<Output<L::F>, SolverError>
    where S: StatsLogger
    {
        let start = Instant::now();
        let (m, n) = problem.size();

        self.par.check(m, n)?;

        log::debug!("{:?}", self.par);

        log::info!("----- Initializing");

        let scaled = if self.par.rescale {
            rescale_problem::<L>(problem, self.par.rescale_geomean_iters, self.par.rescale_ruiz_iters, self.par.eps_zero)
        }
        else {
            ScaledProblem::identity(problem)
        };

        let step_size = {
            let op_a = SpMatOp::<L>::new(scaled.scaled_problem.constraint_matrix());
            select_step_size::<L, _>(&op_a, &self.par)
        };
        log::debug!("step_size {:.3e}", step_size);

        let iterate = Iterate {
            primal: match &self.par.initial_primal_solution {
                Some(x) => scaled.scale_primal::<L>(x),
                None => vec![L::F::zero(); n],
            },
            dual: match &self.par.initial_dual_solution {
                Some(y) => scaled.scale_dual::<L>(y),
                None => vec![L::F::zero(); m],
            },
        };

        let core = SolverCore::<L, S> {
            par: self.par,
            scaled: &scaled,
            step_size,
            logger,
            start,
        };

        let (iterate, iteration_stats, status) = core.solve(iterate);

        Ok(Output {
            primal_solution: scaled.unscale_primal::<L>(&iterate.primal),
            dual_solution: scaled.unscale_dual::<L>(&iterate.dual),
            iteration_stats,
            status,
        })
    }
}

//

struct SolverCore<'a, L, S>
where L: LinAlg, L::F: Float + Debug + LowerExp, S: StatsLogger
{
    par: SolverParam<L::F>,

    scaled: &'a ScaledProblem<L::F>,
    step_size: L::F,
    logger: S,
    // elapsed time includes rescaling and step size selection
    start: Instant,
}

impl<'a, L, S> SolverCore<'a, L, S>
where L: LinAlg, L::F: Float + Debug + LowerExp, S: StatsLogger
{
    fn solve(mut self, mut iterate: Iterate<L::F>)
    -> (Iterate<L::F>, IterationStatsTable<L::F>, SolverStatus)
    {
        let (m, n) = self.scaled.scaled_problem.size();

        let stepper = PdhgStepper::<L>::new(&self.scaled.scaled_problem);
        let kkt = KktEvaluator::<L>::new(self.scaled);

        let mut stats = IterationStatsTable::new();
        let mut delta = Iterate::zeros(m, n);
        let mut cumulative_kkt_passes = 0.;
        let mut header_printed = false;

        let print_period = self.par.record_every.saturating_mul(self.par.print_every);

        log::info!("----- Started");
        let mut i = 0;
        loop {
            let terminate_by_limit = i >= self.par.iteration_limit;
            let store_stats = i % self.par.record_every == 0 || terminate_by_limit;
            let print_stats = self.par.verbosity && (i % print_period == 0 || terminate_by_limit);

            let mut converged = false;

            if store_stats {
                let rec = kkt.evaluate(&iterate, &delta, i, cumulative_kkt_passes, self.start);
                converged = rec.kkt_error <= self.par.kkt_tolerance;

                log::debug!("{}: kkt_error {:.2e}", i, rec.kkt_error);

                if print_stats {
                    if !header_printed {
                        self.logger.log_line(&IterationStatsRecord::<L::F>::header());
                        header_printed = true;
                    }
                    self.logger.log_line(&rec.to_line());
                }

                stats.push(rec);
            }

            if converged || terminate_by_limit {
                log::trace!("{}: x {:?}", i, iterate.primal);
                log::trace!("{}: y {:?}", i, iterate.dual);

                if converged {
                    log::info!("----- Converged");

                    return (iterate, stats, SolverStatus::Optimal);
                }
                else {
                    log::warn!("----- IterationLimit");

                    return (iterate, stats, SolverStatus::IterationLimit);
                }
            }

            i += 1;

            let next = stepper.step(&iterate, self.step_size);
            cumulative_kkt_passes += KKT_PASSES_PER_ITERATION;
            delta = next.delta_from::<L>(&iterate);
            iterate = next;
        } // end of loop
    }
}

//

#[cfg(test)]
fn test_problem() -> LinearProgrammingProblem<f64>
{
    use crate::from_triplets;

    // min x0 + x1  s.t.  x0 + x1 = 1, 0 <= x <= 1
    let a = from_triplets(1, 2, [(0, 0, 1.), (0, 1, 1.)]);
    LinearProgrammingProblem::new(
        vec![1., 1.], a, vec![1.], 1,
        vec![0., 0.], vec![1., 1.],
    ).unwrap()
}

#[test]
fn test_solver_record_every()
{
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let lp = test_problem();
    let s = Solver::<L>::new().par(|p| {
        p.record_every = 3;
        p.iteration_limit = 7;
        p.step_size = Some(1e-3);
    });
    let out = s.solve_with_logger(&lp, crate::logger::NullLogger).unwrap();

    assert_eq!(out.status, SolverStatus::IterationLimit);
    let its: Vec<usize> = out.iteration_stats.iter().map(|r| r.iteration).collect();
    assert_eq!(its, vec![0, 3, 6, 7]);
    let passes: Vec<f64> = out.iteration_stats.iter().map(|r| r.cumulative_kkt_passes).collect();
    assert_eq!(passes, vec![0., 6., 12., 14.]);
}

#[test]
fn test_solver_initial_optimal()
{
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let lp = test_problem();
    let s = Solver::<L>::new().par(|p| {
        p.initial_primal_solution = Some(vec![0.5, 0.5]);
        p.initial_dual_solution = Some(vec![1.]);
    });
    let out = s.solve_with_logger(&lp, crate::logger::NullLogger).unwrap();

    assert_eq!(out.status, SolverStatus::Optimal);
    assert_eq!(out.iteration_stats.len(), 1);
    assert_eq!(out.primal_solution, vec![0.5, 0.5]);
    assert_eq!(out.dual_solution, vec![1.]);
}

#[test]
fn test_solver_elapsed_from_start()
{
    use std::time::Duration;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let lp = test_problem();
    let scaled = ScaledProblem::identity(&lp);

    // a clock started before preprocessing
    let Some(start) = Instant::now().checked_sub(Duration::from_millis(50)) else {
        return;
    };

    let core = SolverCore::<L, _> {
        par: SolverParam {iteration_limit: 0, ..Default::default()},
        scaled: &scaled,
        step_size: 0.5,
        logger: crate::logger::NullLogger,
        start,
    };
    let (_, stats, status) = core.solve(Iterate::zeros(1, 2));

    assert_eq!(status, SolverStatus::IterationLimit);
    assert!(stats.get(0).unwrap().elapsed_time >= 0.05);

    let t0 = Instant::now();
    let out = Solver::<L>::new().par(|p| p.iteration_limit = 3)
        .solve_with_logger(&lp, crate::logger::NullLogger).unwrap();
    let total = t0.elapsed().as_secs_f64();
    let elapsed: Vec<f64> = out.iteration_stats.iter().map(|r| r.elapsed_time).collect();
    assert!(elapsed.windows(2).all(|w| w[0] <= w[1]));
    assert!(elapsed[0] >= 0. && elapsed[3] <= total);
}
