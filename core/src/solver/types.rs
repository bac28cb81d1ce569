use crate::expr::Equation;
use crate::param::ParamId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning knobs for the numeric stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Newton steps allowed per subsystem
    pub max_iterations: usize,
    /// Fraction of each Newton step that is applied
    pub damping: f64,
    /// Pivots smaller than this mark the Jacobian singular
    pub pivot_threshold: f64,
    /// Residuals at or below this magnitude count as zero
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            damping: 0.98,
            pivot_threshold: 1e-12,
            tolerance: 1e-9,
        }
    }
}

impl SolverConfig {
    /// Parse a (possibly partial) JSON override. Missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Structural failures that abort a whole solve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("Over-constrained system: {equations} equations for {unknowns} unknowns")]
    Overconstrained { equations: usize, unknowns: usize },
    #[error("Over-constrained subsystem: {equations} equations for {unknowns} unknowns")]
    OverconstrainedSubsystem { equations: usize, unknowns: usize },
    #[error("Singular Jacobian: pivot {pivot:e} in column {column}, two constraints are equivalent")]
    SingularMatrix { column: usize, pivot: f64 },
}

/// One parameter folded into another by forward substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub eliminated: ParamId,
    pub retained: ParamId,
}

/// Output of forward substitution.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    /// Remaining equations, with every alias applied
    pub equations: Vec<Equation>,
    /// Eliminations in the order they were made
    pub aliases: Vec<Alias>,
}

/// A block of equations solved together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsystem {
    /// Indices into the working equation list, ascending
    pub equations: Vec<usize>,
    /// Unknown count at the time the block was closed
    pub unknowns: usize,
    /// True for the trailing block left open at the end of the scan
    pub underconstrained: bool,
}

/// Subsystems in the order they were closed by the backward scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decomposition {
    pub subsystems: Vec<Subsystem>,
}

impl Decomposition {
    pub fn is_empty(&self) -> bool {
        self.subsystems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subsystems.len()
    }
}

/// Outcome of the Newton stage for one subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsystemReport {
    pub equations: usize,
    /// Unknowns still free when the subsystem was solved
    pub unknowns: usize,
    pub iterations: usize,
    pub converged: bool,
    /// Largest absolute residual after the last step
    pub max_residual: f64,
    pub underconstrained: bool,
    /// Steps that fell back to subtracting residuals directly
    pub fallback_steps: usize,
}

/// Result of a full solve.
///
/// Running out of iterations is not an error: `converged` is false and the
/// last computed values are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    pub converged: bool,
    /// Parameters eliminated by forward substitution
    pub eliminated: usize,
    /// Equations left after forward substitution
    pub equations: usize,
    /// Distinct unknowns across those equations
    pub unknowns: usize,
    pub subsystems: Vec<SubsystemReport>,
}

impl SolveReport {
    pub fn total_iterations(&self) -> usize {
        self.subsystems.iter().map(|s| s.iterations).sum()
    }

    /// True when some degrees of freedom were left unconstrained.
    pub fn is_underconstrained(&self) -> bool {
        self.subsystems.iter().any(|s| s.underconstrained)
    }

    pub fn max_residual(&self) -> f64 {
        self.subsystems
            .iter()
            .map(|s| s.max_residual)
            .fold(0.0, f64::max)
    }
}
