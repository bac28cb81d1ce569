use super::constraints::EntityLookup;
use super::scene::{Sketch, SketchEquations, SketchError};
use super::types::{Constraint, ConstraintEntry, EntityId, Line, SharedPoint, SketchPoint};
use crate::solver::{EquationSource, SolveError};
use std::collections::HashMap;

#[test]
fn test_distance_point_line() {
    let mut sketch = Sketch::new();

    let a = sketch.add_reference_point(0.0, 0.0);
    let b = sketch.add_reference_point(10.0, 0.0);
    let line = sketch.add_line(a, b).unwrap();
    let p = sketch.add_point(5.0, 5.0);

    sketch
        .add_constraint(Constraint::DistancePointLine {
            point: p,
            line,
            value: 2.0,
        })
        .unwrap();

    let pos = sketch.point(p).unwrap();
    assert!((pos.y - 2.0).abs() < 1e-6, "y = {}", pos.y);
    assert!((pos.x - 5.0).abs() < 1e-6);
    // Anchors stay put
    assert_eq!(sketch.point(b).unwrap().x, 10.0);
}

#[test]
fn test_distance_point_line_below() {
    let mut sketch = Sketch::new();

    let a = sketch.add_reference_point(0.0, 0.0);
    let b = sketch.add_reference_point(10.0, 0.0);
    let line = sketch.add_line(a, b).unwrap();
    let p = sketch.add_point(5.0, -5.0);

    sketch
        .add_constraint(Constraint::DistancePointLine {
            point: p,
            line,
            value: 2.0,
        })
        .unwrap();

    assert!((sketch.point(p).unwrap().y + 2.0).abs() < 1e-6);
}

#[test]
fn test_vertical_is_pure_substitution() {
    let mut sketch = Sketch::new();
    let a = sketch.add_point(0.0, 0.0);
    let b = sketch.add_point(3.0, 10.0);
    let line = sketch.add_line(a, b).unwrap();

    sketch.add_constraint(Constraint::Vertical { line }).unwrap();

    assert_eq!(sketch.point(b).unwrap().x, 0.0);
    assert_eq!(sketch.point(b).unwrap().y, 10.0);

    let report = sketch.solve().unwrap();
    assert_eq!(report.equations, 0);
    assert_eq!(report.eliminated, 1);
}

#[test]
fn test_equal_length() {
    let mut sketch = Sketch::new();
    let o = sketch.add_reference_point(0.0, 0.0);
    let e = sketch.add_reference_point(10.0, 0.0);
    let fixed = sketch.add_line(o, e).unwrap();

    let a = sketch.add_point(0.0, 5.0);
    let b = sketch.add_point(4.0, 5.0);
    let free = sketch.add_line(a, b).unwrap();

    sketch
        .add_constraint(Constraint::Horizontal { line: free })
        .unwrap();
    sketch
        .add_constraint(Constraint::EqualLength {
            lines: [fixed, free],
        })
        .unwrap();

    assert!((sketch.line_length(free).unwrap() - 10.0).abs() < 1e-6);
    assert_eq!(sketch.point(a).unwrap().y, sketch.point(b).unwrap().y);
    assert_eq!(sketch.line_length(fixed).unwrap(), 10.0);
}

#[test]
fn test_overconstrained_constraint_rejected() {
    let mut sketch = Sketch::new();
    let origin = sketch.add_reference_point(0.0, 0.0);
    let b = sketch.add_reference_point(8.0, 0.0);
    let c = sketch.add_reference_point(0.0, 6.0);
    let p = sketch.add_point(4.0, 3.0);

    sketch
        .add_constraint(Constraint::Distance {
            points: [p, origin],
            value: 5.0,
        })
        .unwrap();
    sketch
        .add_constraint(Constraint::Distance {
            points: [p, b],
            value: 5.0,
        })
        .unwrap();

    let err = sketch
        .add_constraint(Constraint::Distance {
            points: [p, c],
            value: 1.0,
        })
        .unwrap_err();

    assert_eq!(
        err,
        SketchError::Solve(SolveError::Overconstrained {
            equations: 3,
            unknowns: 2
        })
    );
    assert_eq!(sketch.constraints().len(), 2);
    let pos = sketch.point(p).unwrap();
    assert!((pos.x - 4.0).abs() < 1e-9 && (pos.y - 3.0).abs() < 1e-9);
}

#[test]
fn test_remove_constraint() {
    let mut sketch = Sketch::new();
    let origin = sketch.add_reference_point(0.0, 0.0);
    let p = sketch.add_point(10.0, 0.0);

    let id = sketch
        .add_constraint(Constraint::Distance {
            points: [p, origin],
            value: 10.0,
        })
        .unwrap();
    assert_eq!(sketch.constraints().len(), 1);

    let removed = sketch.remove_constraint(id).unwrap();
    assert!(matches!(removed, Constraint::Distance { value, .. } if value == 10.0));
    assert!(sketch.constraints().is_empty());
    assert_eq!(
        sketch.remove_constraint(id),
        Err(SketchError::UnknownConstraint(id))
    );

    // Without the constraint the drag is free
    sketch.drag_point(p, 3.0, 3.0).unwrap();
    assert_eq!(sketch.point(p).unwrap().x, 3.0);
}

#[test]
fn test_unknown_entities() {
    let mut sketch = Sketch::new();
    let p = sketch.add_point(0.0, 0.0);
    let ghost = EntityId::new();

    assert_eq!(sketch.add_line(p, ghost), Err(SketchError::UnknownEntity(ghost)));
    assert_eq!(
        sketch.add_constraint(Constraint::Horizontal { line: ghost }),
        Err(SketchError::UnknownEntity(ghost))
    );
    assert!(sketch.constraints().is_empty());
    assert!(sketch.drag_point(ghost, 1.0, 1.0).is_err());
}

#[test]
fn test_reference_points_are_reference_params() {
    let mut sketch = Sketch::new();
    let anchor = sketch.add_reference_point(1.0, 2.0);
    let free = sketch.add_point(3.0, 4.0);

    let anchor_params = sketch.point_params(anchor).unwrap();
    let free_params = sketch.point_params(free).unwrap();
    assert!(sketch.params()[anchor_params.x].reference);
    assert!(sketch.params()[anchor_params.y].reference);
    assert!(!sketch.params()[free_params.x].reference);
    assert!(sketch.params()[free_params.y].is_bound());
}

#[test]
fn test_reference_point_cannot_be_dragged() {
    let mut sketch = Sketch::new();
    let origin = sketch.add_reference_point(0.0, 0.0);
    let p = sketch.add_point(10.0, 0.0);
    sketch
        .add_constraint(Constraint::Distance {
            points: [p, origin],
            value: 10.0,
        })
        .unwrap();

    assert_eq!(
        sketch.drag_point(origin, 5.0, 5.0),
        Err(SketchError::ReferencePoint(origin))
    );
    assert_eq!(sketch.point(origin).unwrap().x, 0.0);
    assert_eq!(sketch.point(origin).unwrap().y, 0.0);
    assert_eq!(sketch.point(p).unwrap().x, 10.0);
}

#[test]
fn test_dangling_constraint_is_skipped() {
    let mut sketch = Sketch::new();
    let a = sketch.add_point(0.0, 0.0);
    let b = sketch.add_point(3.0, 4.0);
    let line = sketch.add_line(a, b).unwrap();

    let points: HashMap<EntityId, SketchPoint> = [a, b]
        .iter()
        .map(|id| {
            let params = sketch.point_params(*id).unwrap();
            let point = SketchPoint {
                id: *id,
                position: SharedPoint::new(0.0, 0.0),
                params,
                reference: false,
            };
            (*id, point)
        })
        .collect();
    let lines: HashMap<EntityId, Line> = [(line, *sketch.line(line).unwrap())].into();

    let ghost = EntityId::new();
    let constraints = vec![
        ConstraintEntry {
            id: EntityId::new(),
            constraint: Constraint::Horizontal { line: ghost },
        },
        ConstraintEntry {
            id: EntityId::new(),
            constraint: Constraint::Vertical { line },
        },
    ];
    let source = SketchEquations {
        lookup: EntityLookup {
            points: &points,
            lines: &lines,
        },
        constraints: &constraints,
    };

    let equations = source.equations();
    assert_eq!(equations.len(), 1);
    let pa = sketch.point_params(a).unwrap();
    let pb = sketch.point_params(b).unwrap();
    assert_eq!(equations[0].expr.marks_two_params_equal(), Some((pa.x, pb.x)));
}
