//! Parameter bookkeeping over expression trees.
//!
//! These walk the tree's parameter leaves and either inspect or mutate the
//! shared [`ParamStore`] state (`known`, `mark`), or rewrite which
//! parameter a leaf refers to.

use super::types::{BinaryOp, Expr};
use crate::param::{ParamId, ParamStore};
use std::collections::HashSet;

impl Expr {
    /// Visit every parameter leaf, left to right, including repeats.
    pub fn for_each_param(&self, f: &mut impl FnMut(ParamId)) {
        match self {
            Expr::Param(id) => f(*id),
            Expr::Constant(_) => {}
            Expr::Binary { e0, e1, .. } => {
                e0.for_each_param(f);
                e1.for_each_param(f);
            }
            Expr::Unary { e0, .. } => e0.for_each_param(f),
        }
    }

    /// Clear `known` on every non-reference parameter in the tree.
    pub fn unknown(&self, params: &mut ParamStore) -> &Self {
        self.for_each_param(&mut |id| params[id].unknown());
        self
    }

    /// Adjust the usage mark of every parameter leaf by `delta`.
    /// A zero delta resets the marks instead.
    pub fn mark(&self, params: &mut ParamStore, delta: i32) -> &Self {
        self.for_each_param(&mut |id| {
            let param = &mut params[id];
            if delta == 0 {
                param.mark = 0;
            } else {
                param.mark += delta;
            }
        });
        self
    }

    /// Append the distinct unknown parameters of this tree to `out`,
    /// skipping ids already present in `seen`.
    pub fn collect_unknowns_into(
        &self,
        params: &ParamStore,
        filter_by_mark: bool,
        seen: &mut HashSet<ParamId>,
        out: &mut Vec<ParamId>,
    ) {
        self.for_each_param(&mut |id| {
            let param = &params[id];
            if param.known || (filter_by_mark && param.mark <= 0) {
                return;
            }
            if seen.insert(id) {
                out.push(id);
            }
        });
    }

    /// Distinct unknown parameters in discovery order. With
    /// `filter_by_mark`, only parameters whose mark is positive count.
    pub fn collect_unknowns(&self, params: &ParamStore, filter_by_mark: bool) -> Vec<ParamId> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_unknowns_into(params, filter_by_mark, &mut seen, &mut out);
        out
    }

    pub fn count_unknowns(&self, params: &ParamStore, filter_by_mark: bool) -> usize {
        self.collect_unknowns(params, filter_by_mark).len()
    }

    /// Point every leaf referring to `old` at `new` instead.
    pub fn replace_parameter(&mut self, new: ParamId, old: ParamId) -> &mut Self {
        match self {
            Expr::Param(id) if *id == old => *id = new,
            Expr::Param(_) | Expr::Constant(_) => {}
            Expr::Binary { e0, e1, .. } => {
                e0.replace_parameter(new, old);
                e1.replace_parameter(new, old);
            }
            Expr::Unary { e0, .. } => {
                e0.replace_parameter(new, old);
            }
        }
        self
    }

    /// Detect the trivial equality `a - b` between two parameter leaves.
    pub fn marks_two_params_equal(&self) -> Option<(ParamId, ParamId)> {
        match self {
            Expr::Binary {
                op: BinaryOp::Sub,
                e0,
                e1,
            } => match (e0.as_ref(), e1.as_ref()) {
                (Expr::Param(a), Expr::Param(b)) => Some((*a, *b)),
                _ => None,
            },
            _ => None,
        }
    }
}
