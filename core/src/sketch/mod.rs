//! 2D sketch geometry driven by the constraint solver.
//!
//! Supports:
//! - Free and reference (anchor) points bound to solver parameters
//! - Lines between points
//! - Distance, point-line distance, equal length, horizontal and vertical constraints
//! - Dragging a point and re-solving around it

pub mod types;
pub mod constraints;
pub mod scene;

#[cfg(test)]
mod tests_sketch;

pub use scene::{Sketch, SketchError};
pub use types::{
    Axis, Constraint, ConstraintEntry, EntityId, Line, PointCoord, PointParams, SharedPoint,
    SketchPoint,
};
