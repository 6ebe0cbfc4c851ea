use float_eq::assert_float_eq;
use pdhg_lp::prelude::*;
use pdhg_lp::solver::{IterationStatsRecord, KKT_PASSES_PER_ITERATION};
use pdhg_lp::logger::NullLogger;
use pdhg_lp::*;

type La = FloatGeneric<f64>;

type ASolver = Solver<La>;

const INF: f64 = f64::INFINITY;

// min x0 + x1  s.t.  x0 + x1 = 1, 0 <= x <= 1
fn two_var_lp() -> LinearProgrammingProblem<f64>
{
    let a = from_triplets(1, 2, [(0, 0, 1.), (0, 1, 1.)]);
    LinearProgrammingProblem::new(
        vec![1., 1.], a, vec![1.], 1,
        vec![0., 0.], vec![1., 1.],
    ).unwrap()
}

// min x0 + x1  s.t.  100 x0 + x1 = 50, 0 <= x <= 1
fn badly_scaled_lp() -> LinearProgrammingProblem<f64>
{
    let a = from_triplets(1, 2, [(0, 0, 100.), (0, 1, 1.)]);
    LinearProgrammingProblem::new(
        vec![1., 1.], a, vec![50.], 1,
        vec![0., 0.], vec![1., 1.],
    ).unwrap()
}

//

#[test]
fn test_lp_optimal()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = ASolver::new().par(|p| {
        p.kkt_tolerance = 1e-6;
        p.iteration_limit = 20_000;
    });
    let rslt = s.solve(&two_var_lp()).unwrap();
    println!("{:?}", rslt.primal_solution);

    assert_eq!(rslt.status, SolverStatus::Optimal);

    let last = rslt.iteration_stats.last().unwrap();
    assert!(last.kkt_error <= 1e-6);
    assert_float_eq!(rslt.primal_solution[0] + rslt.primal_solution[1], 1., abs <= 1e-6);
    assert_float_eq!(rslt.dual_solution.as_slice(), [1.].as_ref(), abs_all <= 1e-5);
}

#[test]
fn test_lp_limit1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = ASolver::new().par(|p| {
        p.kkt_tolerance = 1e-6;
        p.iteration_limit = 1;
    });
    let rslt = s.solve(&two_var_lp()).unwrap();

    assert_eq!(rslt.status, SolverStatus::IterationLimit);

    let stats = &rslt.iteration_stats;
    assert_eq!(stats.len(), 2);
    assert_eq!(stats.last().unwrap().iteration, 1);
    // exactly one step
    assert_float_eq!(stats.last().unwrap().cumulative_kkt_passes, KKT_PASSES_PER_ITERATION, abs <= 0.);
}

#[test]
fn test_lp_limit0()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = ASolver::new().par(|p| {
        p.iteration_limit = 0;
    });
    let rslt = s.solve(&two_var_lp()).unwrap();

    assert_eq!(rslt.status, SolverStatus::IterationLimit);
    assert_eq!(rslt.iteration_stats.len(), 1);

    let rec = rslt.iteration_stats.get(0).unwrap();
    assert_eq!(rec.iteration, 0);
    assert_float_eq!(rec.cumulative_kkt_passes, 0., abs <= 0.);
    // x = 0, y = 0: only the equality residual remains
    assert_float_eq!(rec.kkt_error, 1., abs <= 1e-12);
    assert_float_eq!(rslt.primal_solution.as_slice(), [0., 0.].as_ref(), abs_all <= 0.);
}

#[test]
fn test_lp_kkt_passes()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = ASolver::new().par(|p| {
        p.iteration_limit = 8;
        p.step_size = Some(1e-3);
    });
    let rslt = s.solve_with_logger(&two_var_lp(), NullLogger).unwrap();

    assert_eq!(rslt.status, SolverStatus::IterationLimit);
    assert_eq!(rslt.iteration_stats.len(), 9);

    let recs = rslt.iteration_stats.as_slice();
    for (i, w) in recs.windows(2).enumerate() {
        assert_eq!(w[0].iteration, i);
        assert_eq!(w[1].iteration, i + 1);
        assert_float_eq!(w[1].cumulative_kkt_passes - w[0].cumulative_kkt_passes, 2., abs <= 0.);
        assert!(w[1].elapsed_time >= w[0].elapsed_time);
    }
}

#[test]
fn test_lp_rescale()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let lp = badly_scaled_lp();

    let mut sols = Vec::new();
    for rescale in [true, false] {
        let s = ASolver::new().par(|p| {
            p.rescale = rescale;
            p.iteration_limit = 100_000;
        });
        let rslt = s.solve(&lp).unwrap();

        assert_eq!(rslt.status, SolverStatus::Optimal);
        assert_float_eq!(rslt.primal_solution.as_slice(), [0.5, 0.].as_ref(), abs_all <= 1e-5);
        assert_float_eq!(rslt.dual_solution.as_slice(), [0.01].as_ref(), abs_all <= 1e-5);
        assert!(rslt.iteration_stats.last().unwrap().kkt_error <= 1e-6);

        sols.push(rslt.primal_solution);
    }

    assert_float_eq!(sols[0].as_slice(), sols[1].as_slice(), abs_all <= 1e-5);
}

#[test]
fn test_lp_inequality()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // min x0 + x1  s.t.  x0 - x1 = 0, x0 + 2 x1 >= 3, x >= 0
    let a = from_triplets(2, 2, [
        (0, 0, 1.), (0, 1, -1.),
        (1, 0, 1.), (1, 1, 2.),
    ]);
    let lp = LinearProgrammingProblem::new(
        vec![1., 1.], a, vec![0., 3.], 1,
        vec![0., 0.], vec![INF, INF],
    ).unwrap();
    assert_eq!(lp.num_inequalities(), 1);

    let s = ASolver::new().par(|p| {
        p.iteration_limit = 100_000;
    });
    let rslt = s.solve(&lp).unwrap();

    assert_eq!(rslt.status, SolverStatus::Optimal);
    assert_float_eq!(rslt.primal_solution.as_slice(), [1., 1.].as_ref(), abs_all <= 1e-5);
    assert_float_eq!(rslt.dual_solution.as_slice(), [1. / 3., 2. / 3.].as_ref(), abs_all <= 1e-5);
    assert!(rslt.dual_solution[1] >= 0.);
}

#[test]
fn test_lp_initial_solution()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // optimal point carried through a nontrivial rescaling
    let s = ASolver::new().par(|p| {
        p.initial_primal_solution = Some(vec![0.5, 0.]);
        p.initial_dual_solution = Some(vec![0.01]);
        p.iteration_limit = 0;
    });
    let rslt = s.solve(&badly_scaled_lp()).unwrap();

    assert_eq!(rslt.status, SolverStatus::Optimal);
    assert_eq!(rslt.iteration_stats.len(), 1);
    assert_float_eq!(rslt.primal_solution.as_slice(), [0.5, 0.].as_ref(), rmax_all <= 1e-12);
    assert_float_eq!(rslt.dual_solution.as_slice(), [0.01].as_ref(), rmax_all <= 1e-12);
}

#[test]
fn test_lp_step_size()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = ASolver::new().par(|p| {
        p.step_size = Some(0.5);
        p.iteration_limit = 20_000;
    });
    let rslt = s.solve(&two_var_lp()).unwrap();

    assert_eq!(rslt.status, SolverStatus::Optimal);
    assert_float_eq!(rslt.primal_solution[0] + rslt.primal_solution[1], 1., abs <= 1e-6);
}

#[test]
fn test_lp_zero_matrix()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // zero constraint matrix with free variable: infinite step size
    let a = from_triplets(1, 1, std::iter::empty::<(usize, usize, f64)>());
    let lp = LinearProgrammingProblem::new(
        vec![1.], a, vec![0.], 1,
        vec![-INF], vec![INF],
    ).unwrap();

    let s = ASolver::new().par(|p| {
        p.iteration_limit = 3;
    });
    let rslt = s.solve(&lp).unwrap();

    assert_eq!(rslt.status, SolverStatus::IterationLimit);
    assert!(!rslt.primal_solution[0].is_finite());
    assert!(!rslt.iteration_stats.last().unwrap().kkt_error.is_finite());
}

#[test]
fn test_lp_verbosity()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut lines = Vec::<String>::new();

    let s = ASolver::new().par(|p| {
        p.verbosity = true;
        p.record_every = 2;
        p.print_every = 3;
        p.iteration_limit = 10;
        p.step_size = Some(1e-3);
    });
    let rslt = s.solve_with_logger(&two_var_lp(), &mut lines).unwrap();

    let its: Vec<usize> = rslt.iteration_stats.iter().map(|r| r.iteration).collect();
    assert_eq!(its, vec![0, 2, 4, 6, 8, 10]);

    // header, then iterations 0, 6 and 10
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], IterationStatsRecord::<f64>::header());
    for (line, it) in lines[1..].iter().zip([0, 6, 10]) {
        assert!(line.trim_start().starts_with(&format!("{} ", it)), "{}", line);
    }

    // quiet
    let mut lines = Vec::<String>::new();
    let s = ASolver::new().par(|p| {
        p.iteration_limit = 10;
    });
    s.solve_with_logger(&two_var_lp(), &mut lines).unwrap();
    assert!(lines.is_empty());
}

#[test]
fn test_lp_invalid()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = ASolver::new().par(|p| {
        p.print_every = 0;
    });
    assert_eq!(s.solve(&two_var_lp()).unwrap_err(), SolverError::InvalidParam);

    let s = ASolver::new().par(|p| {
        p.step_size = Some(0.);
    });
    assert_eq!(s.solve(&two_var_lp()).unwrap_err(), SolverError::InvalidParam);

    let s = ASolver::new().par(|p| {
        p.initial_dual_solution = Some(vec![0.; 2]);
    });
    let rslt = s.solve(&two_var_lp()).unwrap_err();
    println!("{}", rslt);
    assert_eq!(rslt, SolverError::InvalidParam);

    // lower > upper
    let a = from_triplets(1, 2, [(0, 0, 1.), (0, 1, 1.)]);
    let rslt = LinearProgrammingProblem::new(
        vec![1., 1.], a, vec![1.], 1,
        vec![0., 2.], vec![1., 1.],
    ).unwrap_err();
    assert_eq!(rslt, SolverError::InvalidProblem);
}
