//! Custom assertions over synthesized procedures

use droidgraph_harness::features::driver::Severity;
use droidgraph_harness::{CallStep, DriverProcedure, StandInRef, TypeName};

/// Assert that `component.method` is driven at least once
pub fn assert_called<'a>(
    procedure: &'a DriverProcedure,
    component: &str,
    method: &str,
) -> Vec<&'a CallStep> {
    let steps = procedure.calls_to(&TypeName::new(component), method);
    assert!(
        !steps.is_empty(),
        "Expected a call to {}.{}, driven targets: {:?}",
        component,
        method,
        procedure
            .call_targets()
            .iter()
            .map(|(c, m)| format!("{}.{}", c.simple_name(), m.name))
            .collect::<Vec<_>>()
    );
    steps
}

/// Assert that the first ordered call of `first` precedes that of `then`
/// (both on `component`)
pub fn assert_before(procedure: &DriverProcedure, component: &str, first: &str, then: &str) {
    let component = TypeName::new(component);
    let a = procedure.first_ordered_position(&component, first);
    let b = procedure.first_ordered_position(&component, then);
    match (a, b) {
        (Some(a), Some(b)) => assert!(
            a < b,
            "Expected {}.{} (at {}) before {} (at {})",
            component.simple_name(),
            first,
            a,
            then,
            b
        ),
        _ => panic!(
            "Expected ordered calls to {}.{} and {}, got positions {:?} and {:?}",
            component.simple_name(),
            first,
            then,
            a,
            b
        ),
    }
}

/// Assert that two stand-in references denote the same object
pub fn assert_aliased(procedure: &DriverProcedure, a: StandInRef, b: StandInRef) {
    assert_eq!(
        a,
        b,
        "Expected aliasing, got {} and {}",
        procedure.registry().get(a),
        procedure.registry().get(b)
    );
}

/// Assert that no warning diagnostics were produced
pub fn assert_no_warnings(procedure: &DriverProcedure) {
    let warnings: Vec<String> = procedure
        .diagnostics()
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .map(|d| d.to_string())
        .collect();
    assert!(warnings.is_empty(), "Expected no warnings, got: {:?}", warnings);
}

/// Every argument of every step of `method` on `component`
pub fn arguments_of(procedure: &DriverProcedure, component: &str, method: &str) -> Vec<Vec<StandInRef>> {
    procedure
        .calls_to(&TypeName::new(component), method)
        .into_iter()
        .map(|step| step.arg_values())
        .collect()
}
