//! Symbolic residual expressions over shared parameters.
//!
//! Supports:
//! - Numeric evaluation against a parameter store
//! - Exact symbolic partial derivatives
//! - Constant folding of known sub-expressions
//! - Parameter substitution and unknown bookkeeping used by the solver

pub mod types;
pub mod calculus;
pub mod scope;


pub use types::{num_div, BinaryOp, Equation, Expr, ExprDisplay, UnaryOp};
