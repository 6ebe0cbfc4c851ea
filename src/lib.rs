/*!
A first-order solver of standard-form linear programs.

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

The target problem is
\\[
\begin{array}{ll}
{\rm minimize} & c^T x \\\\
{\rm subject \ to} & A_E x = b_E \\\\
& A_I x \ge b_I \\\\
& l \le x \le u,
\end{array}
\\]
which is solved by the primal-dual hybrid gradient (PDHG) method with extrapolation,
after rescaling of rows and columns of \\(A\\) for better conditioning.
Iterations stop when the KKT error measured in the original space falls below a tolerance,
or when an iteration limit is reached.

# Example

```
use pdhg_lp::prelude::*;
use pdhg_lp::{FloatGeneric, LinearProgrammingProblem, from_triplets};

type L = FloatGeneric<f64>;

// minimize x0 + 2 x1  subject to  x0 + x1 = 1, 0 <= x <= 1
let a = from_triplets(1, 2, [(0, 0, 1.), (0, 1, 1.)]);
let lp = LinearProgrammingProblem::new(
    vec![1., 2.], a, vec![1.], 1,
    vec![0., 0.], vec![1., 1.],
).unwrap();

let s = Solver::<L>::new().par(|p| {
    p.iteration_limit = 20_000;
});
let out = s.solve(&lp).unwrap();

assert_eq!(out.status, SolverStatus::Optimal);
assert!((out.primal_solution[0] - 1.).abs() < 1e-4);
assert!(out.primal_solution[1].abs() < 1e-4);
```

Iteration stats are printed through [`logger::StatsLogger`]
when [`solver::SolverParam::verbosity`] is on;
[`solver::Solver::solve`] forwards them to the `log` crate.
*/

pub mod solver;
pub mod logger;

//

mod floatgeneric;

pub use floatgeneric::*;

//

mod spmatop;

pub use spmatop::*;

//

mod problem;
mod rescale;

pub use problem::*;
pub use rescale::*;

//

/// Prelude
pub mod prelude {
    pub use crate::solver::{LinAlg, Operator, Solver, SolverParam, SolverStatus, SolverError};
}
