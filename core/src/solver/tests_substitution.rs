use super::*;
use crate::expr::{Equation, Expr};
use crate::param::ParamStore;

fn eq(expr: Expr) -> Equation {
    Equation::new(expr)
}

#[test]
fn test_single_equality_reduces_to_nothing() {
    let mut params = ParamStore::new();
    let p = params.add_unknown();
    let p2 = params.add_unknown();

    let solver = Solver::new();
    let out = solver.forward_substitute(&[eq(Expr::param(p) - Expr::param(p2))], &params);

    assert!(out.equations.is_empty());
    assert_eq!(out.aliases, vec![Alias { eliminated: p2, retained: p }]);
}

#[test]
fn test_replaces_parameters_in_other_equations() {
    let mut params = ParamStore::new();
    let p = params.add(1.0);
    let p2 = params.add(2.0);

    let equations = vec![
        eq(Expr::param(p) - Expr::param(p2)),
        eq(Expr::constant(5.0) - Expr::param(p2)),
    ];

    let out = Solver::new().forward_substitute(&equations, &params);
    assert_eq!(out.equations.len(), 1);
    assert_eq!(out.equations[0].expr.display(&params).to_string(), "(5 - {1})");

    // The caller's equations are left as they were
    assert_eq!(equations[1].expr, Expr::constant(5.0) - Expr::param(p2));
}

#[test]
fn test_reference_side_is_retained() {
    let mut params = ParamStore::new();
    let p = params.add(1.0);
    let p2 = params.add_reference(2.0);

    let equations = vec![
        eq(Expr::param(p) - Expr::param(p2)),
        eq(Expr::constant(5.0) - Expr::param(p)),
    ];

    let out = Solver::new().forward_substitute(&equations, &params);
    assert_eq!(out.equations.len(), 1);
    assert_eq!(out.equations[0].expr.display(&params).to_string(), "(5 - {2})");
    assert_eq!(out.aliases, vec![Alias { eliminated: p, retained: p2 }]);
}

#[test]
fn test_reference_on_left_is_retained() {
    let mut params = ParamStore::new();
    let anchor = params.add_reference(0.0);
    let p = params.add(4.0);

    let equations = vec![eq(Expr::param(anchor) - Expr::param(p))];
    let out = Solver::new().forward_substitute(&equations, &params);

    assert_eq!(out.aliases, vec![Alias { eliminated: p, retained: anchor }]);
}

#[test]
fn test_substitution_reaches_already_processed_equations() {
    let mut params = ParamStore::new();
    let a = params.add(1.0);
    let b = params.add(2.0);

    let equations = vec![
        eq(Expr::constant(5.0) - Expr::param(b)),
        eq(Expr::param(a) - Expr::param(b)),
    ];

    let out = Solver::new().forward_substitute(&equations, &params);
    assert_eq!(out.equations.len(), 1);
    assert_eq!(out.equations[0].expr.display(&params).to_string(), "(5 - {1})");
}

#[test]
fn test_equality_between_references_is_dropped() {
    let mut params = ParamStore::new();
    let a = params.add_reference(0.0);
    let b = params.add_reference(0.0);

    let out = Solver::new().forward_substitute(&[eq(Expr::param(a) - Expr::param(b))], &params);
    assert!(out.equations.is_empty());
    assert!(out.aliases.is_empty());
}

#[test]
fn test_subsystem_tags_are_reset() {
    let mut params = ParamStore::new();
    let x = params.add(1.0);
    let mut tagged = eq(Expr::param(x) - Expr::constant(1.0));
    tagged.subsystem = Some(4);

    let out = Solver::new().forward_substitute(&[tagged], &params);
    assert_eq!(out.equations[0].subsystem, None);
}

#[test]
fn test_chained_aliases_write_back() {
    let mut params = ParamStore::new();
    let a = params.add(1.0);
    let b = params.add(2.0);
    let c = params.add(3.0);

    let equations = vec![
        eq(Expr::param(a) - Expr::param(b)),
        eq(Expr::param(c) - Expr::param(a)),
    ];
    let out = Solver::new().forward_substitute(&equations, &params);
    assert!(out.equations.is_empty());
    assert_eq!(out.aliases.len(), 2);

    params.set_value(c, 7.0);
    substitution::write_back_aliases(&out.aliases, &mut params);
    assert_eq!(params.value(a), 7.0);
    assert_eq!(params.value(b), 7.0);
}
