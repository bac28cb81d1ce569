//! Forward substitution of trivial parameter equalities.

use super::engine::Solver;
use super::types::{Alias, Substitution};
use crate::expr::Equation;
use crate::param::ParamStore;
use tracing::{debug, warn};

impl Solver {
    /// Eliminate every `a - b` equation by aliasing one parameter to the
    /// other across the whole working set.
    ///
    /// Works on clones: the caller's equations are left as they were. The
    /// non-reference side is always the one eliminated; when both sides are
    /// references the equation is dropped without substituting.
    pub fn forward_substitute(&self, equations: &[Equation], params: &ParamStore) -> Substitution {
        let mut working: Vec<Equation> = equations
            .iter()
            .map(|equation| {
                let mut equation = equation.clone();
                equation.reset();
                equation
            })
            .collect();
        let mut keep = vec![true; working.len()];
        let mut aliases = Vec::new();

        for i in 0..working.len() {
            let Some((a, b)) = working[i].expr.marks_two_params_equal() else {
                continue;
            };
            keep[i] = false;

            let (retained, eliminated) = match (params[a].reference, params[b].reference) {
                (true, true) => {
                    if params.value(a) != params.value(b) {
                        warn!("Equality between reference parameters {} and {} cannot hold", a, b);
                    }
                    continue;
                }
                (false, true) => (b, a),
                _ => (a, b),
            };
            if retained == eliminated {
                continue;
            }

            for equation in working.iter_mut() {
                equation.expr.replace_parameter(retained, eliminated);
            }
            debug!("Eliminated {} in favour of {}", eliminated, retained);
            aliases.push(Alias {
                eliminated,
                retained,
            });
        }

        let equations = working
            .into_iter()
            .zip(keep)
            .filter_map(|(equation, keep)| keep.then_some(equation))
            .collect();

        Substitution { equations, aliases }
    }
}

/// Copy each retained value back onto the parameter it replaced, newest
/// elimination first so chained aliases settle.
pub fn write_back_aliases(aliases: &[Alias], params: &mut ParamStore) {
    for alias in aliases.iter().rev() {
        let value = params.value(alias.retained);
        params.set_value(alias.eliminated, value);
    }
}
