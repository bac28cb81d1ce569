//! Expression tree types.

use crate::param::{ParamId, ParamStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn apply(self, l: f64, r: f64) -> f64 {
        match self {
            Self::Add => l + r,
            Self::Sub => l - r,
            Self::Mul => l * r,
            Self::Div => num_div(l, r),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Negate,
    Sqrt,
    Square,
    Sin,
    Cos,
}

impl UnaryOp {
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Self::Negate => -v,
            Self::Sqrt => v.sqrt(),
            Self::Square => v * v,
            Self::Sin => v.sin(),
            Self::Cos => v.cos(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::Sqrt => "sqrt",
            Self::Square => "square",
            Self::Sin => "sin",
            Self::Cos => "cos",
        }
    }
}

/// Division that never fails: dividing by exactly zero yields `f64::MAX`
/// so a blown-up residual propagates instead of an error.
pub fn num_div(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        f64::MAX
    } else {
        a / b
    }
}

/// Expression AST node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to a parameter cell
    Param(ParamId),
    /// Numeric literal
    Constant(f64),
    Binary {
        op: BinaryOp,
        e0: Box<Expr>,
        e1: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        e0: Box<Expr>,
    },
}

impl Expr {
    pub fn param(id: ParamId) -> Self {
        Self::Param(id)
    }

    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    pub fn binary(op: BinaryOp, e0: Expr, e1: Expr) -> Self {
        Self::Binary {
            op,
            e0: Box::new(e0),
            e1: Box::new(e1),
        }
    }

    pub fn unary(op: UnaryOp, e0: Expr) -> Self {
        Self::Unary {
            op,
            e0: Box::new(e0),
        }
    }

    pub fn sqrt(self) -> Self {
        Self::unary(UnaryOp::Sqrt, self)
    }

    pub fn square(self) -> Self {
        Self::unary(UnaryOp::Square, self)
    }

    pub fn sin(self) -> Self {
        Self::unary(UnaryOp::Sin, self)
    }

    pub fn cos(self) -> Self {
        Self::unary(UnaryOp::Cos, self)
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// True for a literal zero (either sign).
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Constant(v) if *v == 0.0)
    }

    /// Debug rendering. Known parameters print their value in braces,
    /// unknown ones print `{#id}`.
    pub fn display<'a>(&'a self, params: &'a ParamStore) -> ExprDisplay<'a> {
        ExprDisplay { expr: self, params }
    }
}

impl ops::Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Add, self, rhs)
    }
}

impl ops::Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Sub, self, rhs)
    }
}

impl ops::Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Mul, self, rhs)
    }
}

impl ops::Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Div, self, rhs)
    }
}

impl ops::Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::unary(UnaryOp::Negate, self)
    }
}

impl From<ParamId> for Expr {
    fn from(id: ParamId) -> Self {
        Self::Param(id)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

/// Borrowing formatter returned by [`Expr::display`].
pub struct ExprDisplay<'a> {
    expr: &'a Expr,
    params: &'a ParamStore,
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expr {
            Expr::Param(id) => match self.params.get(*id) {
                Some(param) => write!(f, "{}", param),
                None => write!(f, "{{{}}}", id),
            },
            Expr::Constant(value) => write!(f, "{}", value),
            Expr::Binary { op, e0, e1 } => write!(
                f,
                "({} {} {})",
                e0.display(self.params),
                op.symbol(),
                e1.display(self.params)
            ),
            Expr::Unary { op, e0 } => write!(f, "{}({})", op.name(), e0.display(self.params)),
        }
    }
}

/// A residual that the solver drives to zero, tagged with the subsystem
/// it was assigned to during decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub expr: Expr,
    pub subsystem: Option<usize>,
}

impl Equation {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            subsystem: None,
        }
    }

    /// Clear the subsystem tag.
    pub fn reset(&mut self) {
        self.subsystem = None;
    }

    pub fn is_assigned(&self) -> bool {
        self.subsystem.is_some()
    }
}

impl From<Expr> for Equation {
    fn from(expr: Expr) -> Self {
        Self::new(expr)
    }
}
