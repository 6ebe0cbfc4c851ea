mod linalg;
mod operator;
mod solver_error;
mod solver_param;
mod stats;
mod pdhg;
mod step_size;
mod kkt;
mod solver;

pub use linalg::*;
pub use operator::*;
pub use solver_error::*;
pub use solver_param::*;
pub use stats::*;
pub use pdhg::*;
pub use step_size::*;
pub use kkt::*;
pub use solver::*;
