//! Solver entry points.

use super::substitution::write_back_aliases;
use super::types::{SolveError, SolveReport, SolverConfig, Substitution};
use crate::expr::Equation;
use crate::param::{ParamId, ParamStore};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Supplies the live equation set when solving without an explicit list.
pub trait EquationSource {
    fn equations(&self) -> Vec<Equation>;
}

/// Orchestrates substitution, decomposition and Newton iteration.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    pub(crate) config: SolverConfig,
    /// Values from the last converged solve
    saved_params: HashMap<ParamId, f64>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            saved_params: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve the equations currently supplied by `source`.
    pub fn solve_source(
        &mut self,
        source: &impl EquationSource,
        params: &mut ParamStore,
    ) -> Result<SolveReport, SolveError> {
        let equations = source.equations();
        self.solve(&equations, params)
    }

    /// Solve an explicit equation list, updating parameter values in place.
    ///
    /// Every non-reference parameter the equations touch is marked unknown
    /// first; current values serve as the initial guess.
    pub fn solve(
        &mut self,
        equations: &[Equation],
        params: &mut ParamStore,
    ) -> Result<SolveReport, SolveError> {
        for equation in equations {
            equation.expr.unknown(params).mark(params, 0);
        }

        let Substitution {
            equations: mut working,
            aliases,
        } = self.forward_substitute(equations, params);

        let outcome = self.solve_reduced(&mut working, params);
        for equation in &working {
            equation.expr.mark(params, 0);
        }
        let mut report = outcome?;

        write_back_aliases(&aliases, params);
        report.eliminated = aliases.len();

        if report.converged {
            self.save_params(equations, params);
        } else {
            warn!(
                "Solve did not converge, max residual {:e}",
                report.max_residual()
            );
        }
        info!(
            "Solved {} equations in {} subsystems ({} eliminated, {} iterations)",
            report.equations,
            report.subsystems.len(),
            report.eliminated,
            report.total_iterations()
        );
        Ok(report)
    }

    /// Decompose the reduced equations and solve each subsystem in the
    /// order it was closed.
    fn solve_reduced(
        &self,
        equations: &mut [Equation],
        params: &mut ParamStore,
    ) -> Result<SolveReport, SolveError> {
        let decomposition = self.decompose(equations, params)?;

        let mut report = SolveReport {
            converged: true,
            equations: equations.len(),
            unknowns: super::decompose::unknowns_of(equations, 0..equations.len(), params).len(),
            ..SolveReport::default()
        };

        for subsystem in &decomposition.subsystems {
            let sub = self.solve_numeric(subsystem, equations, params)?;
            report.converged &= sub.converged;
            report.subsystems.push(sub);
        }
        Ok(report)
    }

    fn save_params(&mut self, equations: &[Equation], params: &ParamStore) {
        let mut touched = HashSet::new();
        for equation in equations {
            equation.expr.for_each_param(&mut |id| {
                touched.insert(id);
            });
        }
        for id in touched {
            if !params[id].reference {
                self.saved_params.insert(id, params.value(id));
            }
        }
    }

    /// Values recorded by the last converged solve.
    pub fn saved_params(&self) -> &HashMap<ParamId, f64> {
        &self.saved_params
    }

    /// Write the saved values back, e.g. after a failed solve.
    /// Returns how many parameters were restored.
    pub fn restore_saved(&self, params: &mut ParamStore) -> usize {
        let mut restored = 0;
        for (&id, &value) in &self.saved_params {
            if let Some(param) = params.get_mut(id) {
                param.set_value(value);
                restored += 1;
            }
        }
        restored
    }
}
