//! Numeric solver for residual equation sets.
//!
//! A solve runs in three stages:
//! - Forward substitution folds trivial `a - b` equalities into aliases
//! - Decomposition splits the rest into exactly constrained subsystems
//! - Each subsystem is driven to zero by damped Newton-Raphson iteration

pub mod types;
pub mod linear;
pub mod substitution;
pub mod decompose;
pub mod newton;
pub mod engine;

#[cfg(test)]
mod tests_substitution;

pub use engine::{EquationSource, Solver};
pub use linear::{gaussian_elimination, newton_step, LinearSolveError};
pub use types::{
    Alias, Decomposition, SolveError, SolveReport, SolverConfig, Subsystem, SubsystemReport,
    Substitution,
};
