//! Evaluation, differentiation and constant folding.

use super::types::{num_div, BinaryOp, Expr, UnaryOp};
use crate::param::{ParamId, ParamStore};

impl Expr {
    /// Fold the tree to a number using current parameter values.
    pub fn evaluate(&self, params: &ParamStore) -> f64 {
        match self {
            Expr::Param(id) => params.value(*id),
            Expr::Constant(value) => *value,
            Expr::Binary { op, e0, e1 } => op.apply(e0.evaluate(params), e1.evaluate(params)),
            Expr::Unary { op, e0 } => op.apply(e0.evaluate(params)),
        }
    }

    /// Exact symbolic derivative with respect to `param`.
    ///
    /// A tree independent of `param` yields a literal zero. Otherwise the
    /// result is not simplified; run [`Expr::evaluate_known`] on it to
    /// collapse the zero terms.
    pub fn partial(&self, param: ParamId) -> Expr {
        if self.independent_of(param) {
            return Expr::Constant(0.0);
        }
        match self {
            Expr::Param(id) => Expr::Constant(if *id == param { 1.0 } else { 0.0 }),
            Expr::Constant(_) => Expr::Constant(0.0),
            Expr::Binary { op, e0, e1 } => {
                let p0 = e0.partial(param);
                let p1 = e1.partial(param);
                let (e0, e1) = (e0.as_ref().clone(), e1.as_ref().clone());
                match op {
                    BinaryOp::Add | BinaryOp::Sub => Expr::binary(*op, p0, p1),
                    BinaryOp::Mul => e0 * p1 + e1 * p0,
                    BinaryOp::Div => (e1.clone() * p0 - e0 * p1) / e1.square(),
                }
            }
            Expr::Unary { op, e0 } => {
                let p0 = e0.partial(param);
                let e0 = e0.as_ref().clone();
                match op {
                    UnaryOp::Negate => -p0,
                    UnaryOp::Sqrt => (Expr::Constant(0.5) / e0.sqrt()) * p0,
                    UnaryOp::Square => (Expr::Constant(2.0) * e0) * p0,
                    UnaryOp::Sin => e0.cos() * p0,
                    UnaryOp::Cos => -(e0.sin() * p0),
                }
            }
        }
    }

    /// Structural check that no leaf refers to `param`.
    pub fn independent_of(&self, param: ParamId) -> bool {
        match self {
            Expr::Param(id) => *id != param,
            Expr::Constant(_) => true,
            Expr::Binary { e0, e1, .. } => e0.independent_of(param) && e1.independent_of(param),
            Expr::Unary { e0, .. } => e0.independent_of(param),
        }
    }

    /// Return a reduced copy where every sub-expression over known
    /// parameters only is collapsed to a constant.
    ///
    /// Multiplying by a literal zero, or dividing a literal zero, collapses
    /// to zero even when the other operand is still unknown.
    pub fn evaluate_known(&self, params: &ParamStore) -> Expr {
        match self {
            Expr::Param(id) => {
                let param = &params[*id];
                if param.known {
                    Expr::Constant(param.value())
                } else {
                    Expr::Param(*id)
                }
            }
            Expr::Constant(value) => Expr::Constant(*value),
            Expr::Binary { op, e0, e1 } => {
                let e0 = e0.evaluate_known(params);
                let e1 = e1.evaluate_known(params);
                match (op, &e0, &e1) {
                    (_, Expr::Constant(l), Expr::Constant(r)) => Expr::Constant(op.apply(*l, *r)),
                    (BinaryOp::Mul, l, r) if l.is_zero() || r.is_zero() => Expr::Constant(0.0),
                    (BinaryOp::Div, l, _) if l.is_zero() => Expr::Constant(0.0),
                    _ => Expr::binary(*op, e0, e1),
                }
            }
            Expr::Unary { op, e0 } => match e0.evaluate_known(params) {
                Expr::Constant(value) => Expr::Constant(op.apply(value)),
                reduced => Expr::unary(*op, reduced),
            },
        }
    }
}
