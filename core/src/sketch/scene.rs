use super::constraints::EntityLookup;
use super::types::{
    Axis, Constraint, ConstraintEntry, EntityId, Line, PointCoord, PointParams, SharedPoint,
    SketchPoint,
};
use crate::expr::Equation;
use crate::geometry::{dist, Point2};
use crate::param::ParamStore;
use crate::solver::{EquationSource, SolveError, SolveReport, Solver, SolverConfig};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SketchError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),
    #[error("Unknown constraint: {0}")]
    UnknownConstraint(EntityId),
    #[error("Reference point {0} cannot be dragged")]
    ReferencePoint(EntityId),
    #[error("Solve failed: {0}")]
    Solve(#[from] SolveError),
}

/// Live equation set of a sketch, rebuilt from its constraints on every solve.
pub(crate) struct SketchEquations<'a> {
    pub lookup: EntityLookup<'a>,
    pub constraints: &'a [ConstraintEntry],
}

impl EquationSource for SketchEquations<'_> {
    fn equations(&self) -> Vec<Equation> {
        let mut equations = Vec::new();
        for entry in self.constraints {
            match entry.constraint.equations(&self.lookup) {
                Ok(built) => equations.extend(built),
                Err(err) => warn!("Skipping constraint {}: {}", entry.id, err),
            }
        }
        equations
    }
}

/// Points, lines and constraints solved together over one parameter store.
///
/// Point coordinates live in shared cells; the solver reads and writes them
/// through field bindings, so geometry is updated in place by each solve.
#[derive(Debug, Default)]
pub struct Sketch {
    params: ParamStore,
    points: HashMap<EntityId, SketchPoint>,
    lines: HashMap<EntityId, Line>,
    constraints: Vec<ConstraintEntry>,
    solver: Solver,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            solver: Solver::with_config(config),
            ..Self::default()
        }
    }

    fn insert_point(&mut self, x: f64, y: f64, reference: bool) -> EntityId {
        let id = EntityId::new();
        let position = SharedPoint::new(x, y);
        let px = self.params.bind(Box::new(PointCoord {
            point: position.clone(),
            axis: Axis::X,
        }));
        let py = self.params.bind(Box::new(PointCoord {
            point: position.clone(),
            axis: Axis::Y,
        }));
        if reference {
            self.params[px].reference = true;
            self.params[py].reference = true;
        }
        self.points.insert(
            id,
            SketchPoint {
                id,
                position,
                params: PointParams { x: px, y: py },
                reference,
            },
        );
        debug!("Added point {} at ({}, {}), reference: {}", id, x, y, reference);
        id
    }

    pub fn add_point(&mut self, x: f64, y: f64) -> EntityId {
        self.insert_point(x, y, false)
    }

    /// Add a fixed anchor point. Constraints never move it.
    pub fn add_reference_point(&mut self, x: f64, y: f64) -> EntityId {
        self.insert_point(x, y, true)
    }

    pub fn add_line(&mut self, start: EntityId, end: EntityId) -> Result<EntityId, SketchError> {
        for point in [start, end] {
            if !self.points.contains_key(&point) {
                return Err(SketchError::UnknownEntity(point));
            }
        }
        let id = EntityId::new();
        self.lines.insert(id, Line { id, start, end });
        Ok(id)
    }

    /// Add a constraint and solve. If the solve fails the constraint is
    /// dropped again and the last converged geometry is restored.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<EntityId, SketchError> {
        constraint.equations(&self.lookup())?;

        let id = EntityId::new();
        self.constraints.push(ConstraintEntry { id, constraint });
        if let Err(err) = self.solve_or_restore() {
            self.constraints.pop();
            warn!("Rejected constraint {}: {}", id, err);
            return Err(err);
        }
        Ok(id)
    }

    /// Remove a constraint. The geometry is left where it is.
    pub fn remove_constraint(&mut self, id: EntityId) -> Result<Constraint, SketchError> {
        let index = self
            .constraints
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(SketchError::UnknownConstraint(id))?;
        Ok(self.constraints.remove(index).constraint)
    }

    /// Move a free point and re-solve so the constraints hold again.
    pub fn drag_point(&mut self, id: EntityId, x: f64, y: f64) -> Result<SolveReport, SketchError> {
        let point = self.points.get(&id).ok_or(SketchError::UnknownEntity(id))?;
        if point.reference {
            return Err(SketchError::ReferencePoint(id));
        }
        point.position.set(x, y);
        self.solve_or_restore()
    }

    pub fn solve(&mut self) -> Result<SolveReport, SketchError> {
        let source = SketchEquations {
            lookup: EntityLookup {
                points: &self.points,
                lines: &self.lines,
            },
            constraints: &self.constraints,
        };
        Ok(self.solver.solve_source(&source, &mut self.params)?)
    }

    fn solve_or_restore(&mut self) -> Result<SolveReport, SketchError> {
        self.solve().inspect_err(|_| {
            let restored = self.solver.restore_saved(&mut self.params);
            debug!("Restored {} parameters after failed solve", restored);
        })
    }

    fn lookup(&self) -> EntityLookup<'_> {
        EntityLookup {
            points: &self.points,
            lines: &self.lines,
        }
    }

    pub fn point(&self, id: EntityId) -> Option<Point2> {
        self.points.get(&id).map(|p| p.position.get())
    }

    pub fn point_params(&self, id: EntityId) -> Option<PointParams> {
        self.points.get(&id).map(|p| p.params)
    }

    pub fn line(&self, id: EntityId) -> Option<&Line> {
        self.lines.get(&id)
    }

    pub fn line_length(&self, id: EntityId) -> Option<f64> {
        let line = self.lines.get(&id)?;
        Some(dist(&self.point(line.start)?, &self.point(line.end)?))
    }

    pub fn constraints(&self) -> &[ConstraintEntry] {
        &self.constraints
    }

    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    pub fn solver(&self) -> &Solver {
        &self.solver
    }
}
