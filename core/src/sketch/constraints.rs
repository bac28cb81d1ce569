//! Residual builders for the sketch constraints.
//!
//! Every builder returns `quantity - target`, so a satisfied constraint
//! evaluates to zero.

use super::scene::SketchError;
use super::types::{Constraint, EntityId, Line, PointParams, SketchPoint};
use crate::expr::{Equation, Expr};
use crate::geometry::{Point2, EPSILON};
use crate::param::ParamId;
use std::collections::HashMap;

fn diff_squared(a: ParamId, b: ParamId) -> Expr {
    (Expr::param(a) - Expr::param(b)).square()
}

/// Length of the segment between two points.
pub fn length(a: PointParams, b: PointParams) -> Expr {
    (diff_squared(a.x, b.x) + diff_squared(a.y, b.y)).sqrt()
}

pub fn distance(a: PointParams, b: PointParams, value: f64) -> Expr {
    length(a, b) - Expr::constant(value)
}

/// Signed perpendicular distance from `p` to the line through `start` and
/// `end`. Positive on the left of the direction of travel.
pub fn signed_distance_point_line(p: PointParams, start: PointParams, end: PointParams) -> Expr {
    let dx = Expr::param(end.x) - Expr::param(start.x);
    let dy = Expr::param(end.y) - Expr::param(start.y);
    let cross = dx.clone() * (Expr::param(p.y) - Expr::param(start.y))
        - dy.clone() * (Expr::param(p.x) - Expr::param(start.x));
    cross / (dx.square() + dy.square()).sqrt()
}

/// `side` is +1 or -1 and selects which side of the line the point is held on.
pub fn distance_point_line(
    p: PointParams,
    start: PointParams,
    end: PointParams,
    value: f64,
    side: f64,
) -> Expr {
    Expr::constant(side) * signed_distance_point_line(p, start, end) - Expr::constant(value)
}

pub fn equal_length(l1: (PointParams, PointParams), l2: (PointParams, PointParams)) -> Expr {
    length(l1.0, l1.1) - length(l2.0, l2.1)
}

/// Kept as a bare `a - b` so forward substitution can fold it.
pub fn horizontal(start: PointParams, end: PointParams) -> Expr {
    Expr::param(start.y) - Expr::param(end.y)
}

pub fn vertical(start: PointParams, end: PointParams) -> Expr {
    Expr::param(start.x) - Expr::param(end.x)
}

/// Numeric counterpart of [`signed_distance_point_line`].
pub fn signed_distance(p: Point2, start: Point2, end: Point2) -> f64 {
    let d = end - start;
    let len = d.norm();
    if len < EPSILON {
        return 0.0;
    }
    (d.x * (p.y - start.y) - d.y * (p.x - start.x)) / len
}

/// Borrowed view of the sketch entities a constraint refers to.
pub(crate) struct EntityLookup<'a> {
    pub points: &'a HashMap<EntityId, SketchPoint>,
    pub lines: &'a HashMap<EntityId, Line>,
}

impl EntityLookup<'_> {
    fn point(&self, id: EntityId) -> Result<&SketchPoint, SketchError> {
        self.points.get(&id).ok_or(SketchError::UnknownEntity(id))
    }

    fn line(&self, id: EntityId) -> Result<(&SketchPoint, &SketchPoint), SketchError> {
        let line = self.lines.get(&id).ok_or(SketchError::UnknownEntity(id))?;
        Ok((self.point(line.start)?, self.point(line.end)?))
    }

    fn line_params(&self, id: EntityId) -> Result<(PointParams, PointParams), SketchError> {
        let (start, end) = self.line(id)?;
        Ok((start.params, end.params))
    }
}

impl Constraint {
    /// Build the residual equations for this constraint against the current
    /// geometry.
    pub(crate) fn equations(&self, lookup: &EntityLookup<'_>) -> Result<Vec<Equation>, SketchError> {
        let expr = match self {
            Constraint::Distance { points, value } => {
                let a = lookup.point(points[0])?;
                let b = lookup.point(points[1])?;
                distance(a.params, b.params, *value)
            }
            Constraint::DistancePointLine { point, line, value } => {
                let p = lookup.point(*point)?;
                let (start, end) = lookup.line(*line)?;
                let current =
                    signed_distance(p.position.get(), start.position.get(), end.position.get());
                let side = if current < 0.0 { -1.0 } else { 1.0 };
                distance_point_line(p.params, start.params, end.params, *value, side)
            }
            Constraint::EqualLength { lines } => {
                equal_length(lookup.line_params(lines[0])?, lookup.line_params(lines[1])?)
            }
            Constraint::Horizontal { line } => {
                let (start, end) = lookup.line_params(*line)?;
                horizontal(start, end)
            }
            Constraint::Vertical { line } => {
                let (start, end) = lookup.line_params(*line)?;
                vertical(start, end)
            }
        };
        Ok(vec![Equation::new(expr)])
    }
}
