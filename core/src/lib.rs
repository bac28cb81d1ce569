pub mod param;
pub mod expr;
pub mod solver;
pub mod geometry;
pub mod sketch;

pub use expr::{Equation, Expr};
pub use param::{ParamId, ParamStore};
pub use solver::{SolveError, SolveReport, Solver, SolverConfig};
