//! Numeric parameter cells shared between the geometry layer and the solver.
//!
//! Provides:
//! - A per-model parameter arena with its own id allocator
//! - Known/unknown, reference and usage-mark state per parameter
//! - Field bindings so a parameter can proxy a coordinate owned elsewhere

pub mod types;


pub use types::{FieldBinding, ParamId, ParamIdGenerator, ParamStore, Parameter, ValueCell};
