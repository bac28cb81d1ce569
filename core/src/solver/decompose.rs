//! Greedy structural decomposition into subsystems.

use super::engine::Solver;
use super::types::{Decomposition, SolveError, Subsystem};
use crate::expr::Equation;
use crate::param::{ParamId, ParamStore};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Distinct unknowns in scope (`mark > 0`) across the selected equations.
pub(crate) fn unknowns_of(
    equations: &[Equation],
    selection: impl IntoIterator<Item = usize>,
    params: &ParamStore,
) -> Vec<ParamId> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for i in selection {
        equations[i]
            .expr
            .collect_unknowns_into(params, true, &mut seen, &mut out);
    }
    out
}

impl Solver {
    /// Split the unassigned equations into subsystems.
    ///
    /// Each pending equation is constant-folded and its parameters marked
    /// in scope. The list is then scanned from the end: a candidate block
    /// grows one equation at a time and is closed as soon as its equation
    /// count equals its unknown count. A block left open at the end is kept
    /// as an underconstrained subsystem. Closed blocks are tagged on the
    /// equations in closing order.
    pub fn decompose(
        &self,
        equations: &mut [Equation],
        params: &mut ParamStore,
    ) -> Result<Decomposition, SolveError> {
        let pending: Vec<usize> = equations
            .iter()
            .enumerate()
            .filter(|(_, equation)| !equation.is_assigned())
            .map(|(i, _)| i)
            .collect();

        for &i in &pending {
            let reduced = equations[i].expr.evaluate_known(params);
            reduced.mark(params, 1);
            equations[i].expr = reduced;
        }

        let unknowns = unknowns_of(equations, pending.iter().copied(), params).len();
        if unknowns == 0 {
            debug!("No unknowns across {} equations, nothing to solve", pending.len());
            return Ok(Decomposition::default());
        }
        if pending.len() > unknowns {
            return Err(SolveError::Overconstrained {
                equations: pending.len(),
                unknowns,
            });
        }

        let mut subsystems = Vec::new();
        let mut candidate: Vec<usize> = Vec::new();

        for &next in pending.iter().rev() {
            let size = candidate.len() + 1;
            let count = unknowns_of(
                equations,
                candidate.iter().copied().chain(std::iter::once(next)),
                params,
            )
            .len();

            if size > count {
                return Err(SolveError::OverconstrainedSubsystem {
                    equations: size,
                    unknowns: count,
                });
            }

            candidate.push(next);
            if size == count {
                candidate.sort_unstable();
                debug!("Closed subsystem {} with {} equations", subsystems.len(), size);
                subsystems.push(Subsystem {
                    equations: std::mem::take(&mut candidate),
                    unknowns: count,
                    underconstrained: false,
                });
            }
        }

        if !candidate.is_empty() {
            let count = unknowns_of(equations, candidate.iter().copied(), params).len();
            warn!(
                "Underconstrained subsystem: {} equations for {} unknowns, remaining degrees of freedom stay free",
                candidate.len(),
                count
            );
            candidate.sort_unstable();
            subsystems.push(Subsystem {
                equations: candidate,
                unknowns: count,
                underconstrained: true,
            });
        }

        for (index, subsystem) in subsystems.iter().enumerate() {
            for &i in &subsystem.equations {
                equations[i].subsystem = Some(index);
            }
        }

        Ok(Decomposition { subsystems })
    }
}
