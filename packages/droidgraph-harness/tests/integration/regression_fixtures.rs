//! Driver synthesis over the regression apps
//!
//! Each test loads one app's facts, synthesizes the driver with the default
//! configuration and checks the calls, their order and the aliasing of the
//! stand-ins passed to them.

#[path = "../common/mod.rs"]
mod common;

use common::*;
use droidgraph_harness::config::Preset;
use droidgraph_harness::features::driver::{CallOrigin, SectionKind};
use droidgraph_harness::features::facts::AccessorStep;
use droidgraph_harness::{JavaHarnessEmitter, TypeName};
use pretty_assertions::assert_eq;

const VIEW_LOOKUP: &str = "com.test.viewlookup.MainActivity";
const HOIST2: &str = "com.test.hoisttest2.MainActivity";
const LIFECYCLE_ACTIVITY: &str = "com.test.lifecycleandinterfacecallback.MainActivity";
const LIFECYCLE_CONTROLLER: &str = "com.test.lifecycleandinterfacecallback.Controller";
const PROTECTED: &str = "com.test.protectedcallback.MainActivity";
const FRAGMENT_ACTIVITY: &str = "com.test.supportfragment.MainActivity";
const FRAGMENT: &str = "com.test.supportfragment.MainFragment";
const SURFACE_ACTIVITY: &str = "com.test.surfacecallback.MainActivity";

#[test]
fn test_view_lookup_create_before_destroy() {
    let procedure = synthesize(&view_lookup());

    assert_called(&procedure, VIEW_LOOKUP, "onCreate");
    assert_called(&procedure, VIEW_LOOKUP, "onDestroy");
    assert_before(&procedure, VIEW_LOOKUP, "onCreate", "onDestroy");
    assert_no_warnings(&procedure);

    // The surface view is allocated as its declared type
    let registry = procedure.registry();
    let view = registry.find_view_by_id(MY_SURFACE_VIEW).unwrap();
    assert_eq!(registry.get(view).type_name, TypeName::new(SURFACE_VIEW));
    assert_eq!(registry.get(view).label, "mySurfaceView");
}

#[test]
fn test_view_lookup_sections_follow_kind_rank() {
    let procedure = synthesize(&view_lookup());
    let labels: Vec<&str> = procedure
        .sections()
        .iter()
        .map(|section| section.label.as_str())
        .collect();
    assert_eq!(labels, vec!["mainActivity", "controller", "callbacks"]);
    assert_eq!(
        procedure.sections()[2].kind,
        SectionKind::Unordered { passes: 1 }
    );
}

#[test]
fn test_hoist_test1_single_lifecycle_step() {
    let procedure = synthesize(&hoist_test1());
    let steps = assert_called(&procedure, "com.test.hoisttest1.MainActivity", "onCreate");
    assert_eq!(steps.len(), 1);

    // onCreate(Bundle) receives the ambient bundle
    let mut registry = procedure.registry().clone();
    let bundle = registry.ambient(&TypeName::new(BUNDLE));
    assert_eq!(steps[0].arg_values(), vec![bundle]);
}

#[test]
fn test_hoist_test2_handler_between_create_and_destroy() {
    let procedure = synthesize(&hoist_test2());

    assert_before(&procedure, HOIST2, "onCreate", "myOnClick");
    assert_before(&procedure, HOIST2, "myOnClick", "onDestroy");
    assert_no_warnings(&procedure);

    // Ordered occurrence plus the unordered re-entry
    let clicks = assert_called(&procedure, HOIST2, "myOnClick");
    assert_eq!(clicks.len(), 2);
    assert!(clicks
        .iter()
        .all(|step| step.origin == CallOrigin::Handler { identifier: Some(MY_BTN) }));
}

#[test]
fn test_hoist_test2_handler_receives_bound_view() {
    let procedure = synthesize(&hoist_test2());
    let button = procedure.registry().find_view_by_id(MY_BTN).unwrap();

    for args in arguments_of(&procedure, HOIST2, "myOnClick") {
        assert_eq!(args.len(), 1);
        assert_aliased(&procedure, args[0], button);
    }
    assert_eq!(
        procedure.registry().get(button).type_name,
        TypeName::new(BUTTON)
    );
}

#[test]
fn test_lifecycle_and_interface_callbacks_covered() {
    let procedure = synthesize(&lifecycle_and_interface_callback());

    assert_before(&procedure, LIFECYCLE_ACTIVITY, "onCreate", "onDestroy");
    assert_called(&procedure, LIFECYCLE_ACTIVITY, "myOnClick");
    assert_called(&procedure, LIFECYCLE_ACTIVITY, "onSharedPreferenceChanged");
    assert_called(&procedure, LIFECYCLE_CONTROLLER, "onConfigurationChanged");
    assert_called(&procedure, LIFECYCLE_CONTROLLER, "onLowMemory");
    assert_no_warnings(&procedure);

    // Handler without a component resolves by method name only
    assert!(procedure
        .calls_to(&TypeName::new(LIFECYCLE_CONTROLLER), "myOnClick")
        .is_empty());
}

#[test]
fn test_preference_listener_arguments() {
    let procedure = synthesize(&lifecycle_and_interface_callback());
    let mut registry = procedure.registry().clone();
    let preferences = registry.ambient(&TypeName::new("android.content.SharedPreferences"));
    let key = registry.value(&TypeName::new("java.lang.String"));

    let args = arguments_of(&procedure, LIFECYCLE_ACTIVITY, "onSharedPreferenceChanged");
    assert!(!args.is_empty());
    for tuple in args {
        assert_eq!(tuple, vec![preferences, key]);
    }
}

#[test]
fn test_controller_constructed_with_context() {
    let procedure = synthesize(&lifecycle_and_interface_callback());
    let registry = procedure.registry();
    let controller = registry
        .component(&TypeName::new(LIFECYCLE_CONTROLLER))
        .unwrap();

    let mut copy = registry.clone();
    let context = copy.ambient(&TypeName::context());
    assert_eq!(
        registry.get(controller).construction,
        droidgraph_harness::features::standin::Construction::Constructor {
            args: vec![context]
        }
    );
    // Dependencies are allocated before the component
    assert!(context < controller);
}

#[test]
fn test_protected_callback_teardown_order() {
    let procedure = synthesize(&protected_callback());

    assert_before(&procedure, PROTECTED, "onCreate", "onPause");
    assert_before(&procedure, PROTECTED, "onPause", "onDestroy");

    let phases: Vec<String> = procedure
        .ordered_steps()
        .filter(|step| step.component == TypeName::new(PROTECTED))
        .map(|step| step.method.name.clone())
        .collect();
    assert_eq!(phases, vec!["onCreate", "onPause", "onDestroy"]);
}

#[test]
fn test_support_fragment_aliases_layout_declaration() {
    let procedure = synthesize(&support_fragment());
    let registry = procedure.registry();

    let fragment = registry.component(&TypeName::new(FRAGMENT)).unwrap();
    let from_layout = registry.find_view_by_id(FRAGMENT_MAIN).unwrap();
    assert_aliased(&procedure, fragment, from_layout);
}

#[test]
fn test_support_fragment_click_receives_button() {
    let procedure = synthesize(&support_fragment());
    let button = procedure.registry().find_view_by_id(MY_BTN).unwrap();

    let clicks = arguments_of(&procedure, FRAGMENT, "onClick");
    assert_eq!(clicks.len(), 2);
    for args in clicks {
        assert_aliased(&procedure, args[0], button);
    }

    assert_before(&procedure, FRAGMENT, "onCreateView", "onClick");
    assert_before(&procedure, FRAGMENT_ACTIVITY, "onCreate", "onDestroy");
}

#[test]
fn test_support_fragment_driven_after_activity() {
    let procedure = synthesize(&support_fragment());
    let activity = procedure
        .first_ordered_position(&TypeName::new(FRAGMENT_ACTIVITY), "onCreate")
        .unwrap();
    let fragment = procedure
        .first_ordered_position(&TypeName::new(FRAGMENT), "onCreateView")
        .unwrap();
    assert!(activity < fragment);
}

#[test]
fn test_system_service_aliases_factory_lookup() {
    let procedure = synthesize(&system_service());
    let mut registry = procedure.registry().clone();

    let by_name = registry.system_service("account");
    let by_type = registry.ambient(&TypeName::new("android.accounts.AccountManager"));
    assert_eq!(by_name, by_type);

    // Allocated during synthesis, not by the lookups above
    assert_eq!(registry.len(), procedure.allocations().len());

    let stubs = JavaHarnessEmitter::new(Default::default()).emit_stubs(&procedure);
    let label = &procedure.registry().get(by_name).label;
    assert!(stubs.contains(&format!("case \"account\": return {};", label)));
}

#[test]
fn test_surface_callback_holder_aliases_getter() {
    let procedure = synthesize(&surface_callback());
    let mut registry = procedure.registry().clone();

    let view = registry.resolve(MY_SURFACE_VIEW, &TypeName::new(SURFACE_VIEW));
    let holder = registry.derived(view, &AccessorStep::new("getHolder", SURFACE_HOLDER));
    assert_eq!(registry.len(), procedure.allocations().len());

    for method in ["surfaceCreated", "surfaceChanged", "surfaceDestroyed"] {
        for args in arguments_of(&procedure, SURFACE_ACTIVITY, method) {
            assert_eq!(args[0], holder, "holder argument of {}", method);
        }
    }
    assert_eq!(registry.get(holder).label, "mySurfaceViewHolder");
}

#[test]
fn test_every_fixture_emits_java() {
    for (name, doc) in all_fixtures() {
        for preset in [Preset::Minimal, Preset::Balanced, Preset::Exhaustive] {
            let synth = synthesizer(preset);
            let procedure = synth.synthesize_facts(&doc);
            let emitter = JavaHarnessEmitter::new(synth.config().emit().clone());

            let harness = emitter.emit_harness(&procedure);
            assert!(
                harness.contains("public static void androidMain()"),
                "{} ({}) harness lacks the entry method",
                name,
                preset
            );
            for step in procedure.ordered_steps() {
                let receiver = &procedure.registry().get(step.receiver).label;
                assert!(
                    harness.contains(&format!("{}.{}(", receiver, step.method.name)),
                    "{} ({}) harness lacks {}",
                    name,
                    preset,
                    step
                );
            }
        }
    }
}
