use num_traits::Float;
use crate::solver::SolverError;

/// Solver parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverParam<F: Float>
{
    /// Step size of both the primal and the dual update. `None` selects one from the spectral norm of the constraint matrix.
    pub step_size: Option<F>,
    /// Whether to rescale the problem before iterating.
    pub rescale: bool,
    /// Number of geometric-mean balancing passes of rescaling.
    pub rescale_geomean_iters: usize,
    /// Number of L-infinity equilibration passes of rescaling, after the geometric-mean ones.
    pub rescale_ruiz_iters: usize,
    /// Period of iterations to evaluate and record iteration stats.
    pub record_every: usize,
    /// Period, in units of records, to print iteration stats.
    pub print_every: usize,
    /// Whether to print iteration stats.
    pub verbosity: bool,
    /// Max iteration number.
    pub iteration_limit: usize,
    /// Tolerance of the KKT error.
    pub kkt_tolerance: F,
    /// Starting primal solution in the original space. `None` means zeros.
    pub initial_primal_solution: Option<Vec<F>>,
    /// Starting dual solution in the original space. `None` means zeros.
    pub initial_dual_solution: Option<Vec<F>>,
    /// Tolerance of small positive value to avoid division by zero.
    pub eps_zero: F,
    /// Max iteration number of the power method estimating the spectral norm.
    pub power_iter_max: usize,
    /// Relative tolerance of the power method estimating the spectral norm.
    pub power_iter_tol: F,
}

impl<F: Float> Default for SolverParam<F>
{
    fn default() -> Self
    {
        let ten = F::from(10).unwrap();

        SolverParam {
            step_size: None,
            rescale: true,
            rescale_geomean_iters: 10,
            rescale_ruiz_iters: 4,
            record_every: 1,
            print_every: 1,
            verbosity: false,
            iteration_limit: 10_000,
            kkt_tolerance: ten.powi(-6),
            initial_primal_solution: None,
            initial_dual_solution: None,
            eps_zero: ten.powi(-12),
            power_iter_max: 1_000,
            power_iter_tol: ten.powi(-8),
        }
    }
}

impl<F: Float> SolverParam<F>
{
    /// Checks parameters against a problem of `m` constraints and `n` variables.
    pub(crate) fn check(&self, m: usize, n: usize) -> Result<(), SolverError>
    {
        if self.record_every == 0 || self.print_every == 0 {
            log::error!("record_every {} and print_every {} must be > 0", self.record_every, self.print_every);
            return Err(SolverError::InvalidParam);
        }

        if !(self.kkt_tolerance > F::zero()) {
            log::error!("kkt_tolerance must be > 0");
            return Err(SolverError::InvalidParam);
        }

        if let Some(step_size) = self.step_size {
            if !(step_size > F::zero()) {
                log::error!("step_size must be > 0");
                return Err(SolverError::InvalidParam);
            }
        }

        if let Some(x) = &self.initial_primal_solution {
            if x.len() != n {
                log::error!("initial_primal_solution length {} must be {}", x.len(), n);
                return Err(SolverError::InvalidParam);
            }
        }

        if let Some(y) = &self.initial_dual_solution {
            if y.len() != m {
                log::error!("initial_dual_solution length {} must be {}", y.len(), m);
                return Err(SolverError::InvalidParam);
            }
        }

        Ok(())
    }
}

//

#[test]
fn test_param_check()
{
    let par = SolverParam::<f64>::default();
    assert_eq!(par.check(2, 3), Ok(()));

    let par = SolverParam::<f64> {record_every: 0, ..Default::default()};
    assert_eq!(par.check(2, 3), Err(SolverError::InvalidParam));

    let par = SolverParam::<f64> {step_size: Some(-1.), ..Default::default()};
    assert_eq!(par.check(2, 3), Err(SolverError::InvalidParam));

    let par = SolverParam::<f64> {kkt_tolerance: 0., ..Default::default()};
    assert_eq!(par.check(2, 3), Err(SolverError::InvalidParam));

    let par = SolverParam::<f64> {initial_primal_solution: Some(vec![0.; 2]), ..Default::default()};
    assert_eq!(par.check(2, 3), Err(SolverError::InvalidParam));

    let par = SolverParam::<f64> {initial_dual_solution: Some(vec![0.; 2]), ..Default::default()};
    assert_eq!(par.check(2, 3), Ok(()));
}
