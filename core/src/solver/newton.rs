//! Damped Newton-Raphson iteration over one subsystem.

use super::engine::Solver;
use super::linear::{newton_step, LinearSolveError};
use super::types::{SolveError, Subsystem, SubsystemReport};
use crate::expr::{Equation, Expr};
use crate::param::{ParamId, ParamStore};
use nalgebra::{DMatrix, DVector};
use std::collections::HashSet;
use tracing::{debug, warn};

fn residuals_of(exprs: &[&Expr], params: &ParamStore) -> DVector<f64> {
    DVector::from_iterator(exprs.len(), exprs.iter().map(|e| e.evaluate(params)))
}

impl Solver {
    /// Drive the residuals of one subsystem towards zero.
    ///
    /// Unknowns are collected when the subsystem is reached, so parameters
    /// already assigned by an earlier subsystem are held fixed. Only a
    /// singular Jacobian is an error; running out of iterations is reported
    /// through `converged = false`.
    pub fn solve_numeric(
        &self,
        subsystem: &Subsystem,
        equations: &[Equation],
        params: &mut ParamStore,
    ) -> Result<SubsystemReport, SolveError> {
        let config = &self.config;
        let exprs: Vec<&Expr> = subsystem.equations.iter().map(|&i| &equations[i].expr).collect();

        let mut seen = HashSet::new();
        let mut unknowns: Vec<ParamId> = Vec::new();
        for expr in &exprs {
            expr.collect_unknowns_into(params, true, &mut seen, &mut unknowns);
        }

        let mut residuals = residuals_of(&exprs, params);
        let mut report = SubsystemReport {
            equations: exprs.len(),
            unknowns: unknowns.len(),
            iterations: 0,
            converged: false,
            max_residual: residuals.amax(),
            underconstrained: subsystem.underconstrained,
            fallback_steps: 0,
        };
        let is_zero = |r: &DVector<f64>| r.iter().all(|v| v.abs() <= config.tolerance);

        if unknowns.is_empty() {
            debug!("Subsystem has no free unknowns left, skipping");
            report.converged = is_zero(&residuals);
            return Ok(report);
        }

        let jacobian: Vec<Vec<Expr>> = exprs
            .iter()
            .map(|expr| {
                unknowns
                    .iter()
                    .map(|&u| {
                        if expr.independent_of(u) {
                            Expr::Constant(0.0)
                        } else {
                            expr.partial(u)
                        }
                    })
                    .collect()
            })
            .collect();

        for iteration in 0..config.max_iterations {
            if is_zero(&residuals) {
                report.converged = true;
                break;
            }
            report.iterations = iteration + 1;

            let j = DMatrix::from_fn(exprs.len(), unknowns.len(), |r, c| {
                jacobian[r][c].evaluate(params)
            });

            match newton_step(&j, &residuals, config.pivot_threshold) {
                Ok(step) => {
                    for (k, &u) in unknowns.iter().enumerate() {
                        let value = params.value(u);
                        params.set_value(u, value - config.damping * step[k]);
                    }
                }
                Err(LinearSolveError::Singular { column, pivot }) => {
                    return Err(SolveError::SingularMatrix { column, pivot });
                }
                Err(err) => {
                    warn!("Newton step failed ({}), subtracting residuals instead", err);
                    report.fallback_steps += 1;
                    for (k, &u) in unknowns.iter().enumerate().take(residuals.len()) {
                        let value = params.value(u);
                        params.set_value(u, value - residuals[k]);
                    }
                }
            }

            residuals = residuals_of(&exprs, params);
            debug!("Iteration {}: max residual {:e}", iteration + 1, residuals.amax());
        }

        if !report.converged {
            report.converged = is_zero(&residuals);
        }
        report.max_residual = residuals.amax();
        Ok(report)
    }
}
