/// Solver errors.
///
/// Running out of iterations is not an error;
/// it is reported as [`crate::solver::SolverStatus::IterationLimit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverError
{
    /// Inconsistent dimensions or empty variable bounds of
    /// [`crate::LinearProgrammingProblem`].
    InvalidProblem,
    /// Invalid [`crate::solver::SolverParam`].
    InvalidParam,
}

impl core::fmt::Display for SolverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            SolverError::InvalidProblem => "InvalidProblem: inconsistent problem dimensions or bounds",
            SolverError::InvalidParam   => "InvalidParam: invalid solver parameter",
        })
    }
}

impl std::error::Error for SolverError {}
