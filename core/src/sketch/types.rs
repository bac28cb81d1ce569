use crate::geometry::Point2;
use crate::param::{FieldBinding, ParamId};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Identifier for points, lines and constraints of a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// A point position shared between the sketch and its parameter bindings.
#[derive(Debug, Clone)]
pub struct SharedPoint(Rc<Cell<Point2>>);

impl SharedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self(Rc::new(Cell::new(Point2::new(x, y))))
    }

    pub fn get(&self) -> Point2 {
        self.0.get()
    }

    pub fn set(&self, x: f64, y: f64) {
        self.0.set(Point2::new(x, y));
    }

    pub fn coord(&self, axis: Axis) -> f64 {
        let p = self.0.get();
        match axis {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }

    pub fn set_coord(&self, axis: Axis, value: f64) {
        let mut p = self.0.get();
        match axis {
            Axis::X => p.x = value,
            Axis::Y => p.y = value,
        }
        self.0.set(p);
    }
}

/// Binds one coordinate of a [`SharedPoint`] to a solver parameter.
#[derive(Debug, Clone)]
pub struct PointCoord {
    pub point: SharedPoint,
    pub axis: Axis,
}

impl FieldBinding for PointCoord {
    fn read(&self) -> f64 {
        self.point.coord(self.axis)
    }

    fn write(&mut self, value: f64) {
        self.point.set_coord(self.axis, value);
    }
}

/// The parameter pair behind a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointParams {
    pub x: ParamId,
    pub y: ParamId,
}

#[derive(Debug, Clone)]
pub struct SketchPoint {
    pub id: EntityId,
    pub position: SharedPoint,
    pub params: PointParams,
    /// Reference points anchor the sketch and never move
    pub reference: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: EntityId,
    pub start: EntityId,
    pub end: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    /// Euclidean distance between two points
    Distance { points: [EntityId; 2], value: f64 },
    /// Perpendicular distance from a point to the infinite extension of a line
    DistancePointLine { point: EntityId, line: EntityId, value: f64 },
    EqualLength { lines: [EntityId; 2] },
    Horizontal { line: EntityId },
    Vertical { line: EntityId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintEntry {
    pub id: EntityId,
    pub constraint: Constraint,
}
