//! Property-based tests for stand-ins and driver synthesis
//!
//! Invariants that hold for every generated app:
//! - Aliasing: one stand-in per identifier, per ambient type, per getter
//! - Coverage: every lifecycle override, listener method and handler is driven
//! - Ordering: creation steps precede teardown steps of the same component
//! - Isolation: a faulting call never prevents the calls after it

#[path = "../common/mod.rs"]
mod common;

use common::*;
use droidgraph_harness::config::Preset;
use droidgraph_harness::features::driver::{SectionKind, Severity};
use droidgraph_harness::features::facts::{AccessorStep, IdentifierBinding, ListenerImpl};
use droidgraph_harness::features::standin::FrameworkCatalog;
use droidgraph_harness::{
    CallDispatcher, CallStep, ComponentDeclaration, ComponentKind, DispatchFault, DriverExecutor,
    FactsDocument, HandlerBinding, MethodSignature, StandInRegistry, TypeName,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

const VIEW_TYPES: &[&str] = &[
    "android.view.View",
    "android.view.SurfaceView",
    "android.widget.Button",
    "android.widget.TextView",
    "android.widget.ImageView",
];

const AMBIENT_TYPES: &[&str] = &[
    "android.os.Bundle",
    "android.hardware.Camera",
    "android.accounts.AccountManager",
    "android.content.Context",
    "android.content.SharedPreferences",
    "android.graphics.Bitmap",
    "com.test.Unknown",
];

const BASE_ID: u32 = 0x7f05_0000;

/// `activities` activities; bit 2i of `mask` gives activity i a click
/// listener on its own view, bit 2i+1 an XML handler on it
fn generated_app(activities: usize, mask: u16) -> FactsDocument {
    let mut doc = FactsDocument::new();
    for i in 0..activities {
        let id = BASE_ID + i as u32;
        let name = format!("com.test.gen.Activity{}", i);
        doc.identifiers
            .push(IdentifierBinding::new(id, "android.widget.Button").named(format!("button{}", i)));

        let mut activity = ComponentDeclaration::new(name.as_str(), ComponentKind::Activity)
            .with_lifecycle(on_destroy())
            .with_lifecycle(on_create());
        if mask & (1 << (2 * i)) != 0 {
            activity = activity
                .with_listener(ListenerImpl::new("android.view.View.OnClickListener").registered_on(id));
        }
        if mask & (1 << (2 * i + 1)) != 0 {
            let handler = format!("onTap{}", i);
            activity = activity
                .with_handler(handler.as_str())
                .with_method(MethodSignature::of(handler.as_str(), &[VIEW]));
            doc.handlers
                .push(HandlerBinding::new(handler.as_str(), id).on_component(name.as_str()));
        }
        doc.components.push(activity);
    }
    doc
}

fn preset(index: usize) -> Preset {
    [Preset::Minimal, Preset::Balanced, Preset::Exhaustive][index % 3]
}

/// Faults on every step whose index is congruent to a set bit of `mask`
struct FaultInjector {
    mask: u8,
    panics: bool,
}

impl FaultInjector {
    fn faults_on(&self, step: &CallStep) -> bool {
        self.mask & (1 << (step.id.index() % 8)) != 0
    }
}

impl CallDispatcher for FaultInjector {
    fn dispatch(&mut self, step: &CallStep, _registry: &StandInRegistry) -> Result<(), DispatchFault> {
        if !self.faults_on(step) {
            return Ok(());
        }
        if self.panics {
            panic!("injected fault in {}", step);
        }
        Err(DispatchFault::Thrown("java.lang.IllegalStateException".to_string()))
    }
}

proptest! {
    #[test]
    fn prop_resolve_is_idempotent(
        offset in 0u32..4096,
        first in 0usize..VIEW_TYPES.len(),
        second in 0usize..VIEW_TYPES.len(),
    ) {
        let mut registry = StandInRegistry::new(FrameworkCatalog::android());
        let id = BASE_ID + offset;

        let a = registry.resolve(id, &TypeName::new(VIEW_TYPES[first]));
        let b = registry.resolve(id, &TypeName::new(VIEW_TYPES[second]));
        let size = registry.len();
        let c = registry.resolve(id, &TypeName::new(VIEW_TYPES[first]));

        // Invariant: the first declared type wins and nothing new is fabricated
        prop_assert_eq!(a, b);
        prop_assert_eq!(a, c);
        prop_assert_eq!(registry.len(), size);
        prop_assert_eq!(registry.find_view_by_id(id), Some(a));
        prop_assert_eq!(registry.get(a).type_name.as_str(), VIEW_TYPES[first]);
    }

    #[test]
    fn prop_distinct_identifiers_never_alias(
        offsets in prop::collection::btree_set(0u32..512, 1..24),
    ) {
        let mut registry = StandInRegistry::new(FrameworkCatalog::android());
        let stand_ins: BTreeSet<_> = offsets
            .iter()
            .map(|offset| registry.resolve(BASE_ID + offset, &TypeName::view()))
            .collect();

        prop_assert_eq!(stand_ins.len(), offsets.len());
        prop_assert_eq!(registry.identifiers().len(), offsets.len());
    }

    #[test]
    fn prop_ambient_is_memoized(index in 0usize..AMBIENT_TYPES.len(), repeats in 1usize..=5) {
        let mut registry = StandInRegistry::new(FrameworkCatalog::android());
        let ty = TypeName::new(AMBIENT_TYPES[index]);

        let first = registry.ambient(&ty);
        let size = registry.len();
        for _ in 0..repeats {
            prop_assert_eq!(registry.ambient(&ty), first);
        }
        prop_assert_eq!(registry.len(), size);
        prop_assert_eq!(registry.lookup_ambient(&ty), Some(first));
    }

    #[test]
    fn prop_system_services_alias_ambient(index in 0usize..16) {
        let catalog = FrameworkCatalog::android();
        let services: Vec<(String, TypeName)> = catalog
            .services()
            .into_iter()
            .map(|(name, ty)| (name.to_string(), ty.clone()))
            .collect();
        let (name, ty) = &services[index % services.len()];

        let mut registry = StandInRegistry::new(catalog);
        let by_name = registry.system_service(name);
        prop_assert_eq!(registry.ambient(ty), by_name);
        prop_assert_eq!(registry.system_service(name), by_name);
    }

    #[test]
    fn prop_getter_chains_alias(offset in 0u32..256, depth in 1usize..=4) {
        let mut registry = StandInRegistry::new(FrameworkCatalog::android());
        let view = registry.resolve(BASE_ID + offset, &TypeName::new("android.view.SurfaceView"));
        let size = registry.len();
        let chain: Vec<AccessorStep> = (0..depth)
            .map(|level| AccessorStep::new(format!("getPart{}", level), "java.lang.Object"))
            .collect();

        let a = registry.derive_chain(view, &chain);
        let b = registry.derive_chain(view, &chain);
        prop_assert_eq!(a, b);
        prop_assert_eq!(registry.len(), size + depth);
    }

    #[test]
    fn prop_every_target_is_driven(
        activities in 1usize..=6,
        mask in any::<u16>(),
        preset_index in 0usize..3,
    ) {
        let doc = generated_app(activities, mask);
        let procedure = synthesizer(preset(preset_index)).synthesize_facts(&doc);
        let targets: BTreeSet<(String, String)> = procedure
            .call_targets()
            .into_iter()
            .map(|(component, method)| (component.to_string(), method.name))
            .collect();

        for decl in &doc.components {
            let name = decl.name.to_string();
            for method in &decl.lifecycle {
                prop_assert!(targets.contains(&(name.clone(), method.name.clone())));
            }
            if !decl.listeners.is_empty() {
                prop_assert!(targets.contains(&(name.clone(), "onClick".to_string())));
            }
            for handler in &decl.handlers {
                prop_assert!(targets.contains(&(name.clone(), handler.clone())));
            }
        }
        prop_assert!(procedure
            .diagnostics()
            .iter()
            .all(|d| d.severity != Severity::Warning));
    }

    #[test]
    fn prop_create_precedes_destroy(
        activities in 1usize..=6,
        mask in any::<u16>(),
        preset_index in 0usize..3,
    ) {
        let doc = generated_app(activities, mask);
        let procedure = synthesizer(preset(preset_index)).synthesize_facts(&doc);

        for decl in &doc.components {
            let create = procedure.first_ordered_position(&decl.name, "onCreate");
            let destroy = procedure.first_ordered_position(&decl.name, "onDestroy");
            prop_assert!(create.is_some() && destroy.is_some());
            prop_assert!(create < destroy);

            // Every ordered callback of the component runs after its creation
            let callbacks = procedure
                .ordered_steps()
                .enumerate()
                .filter(|(_, step)| step.component == decl.name && !step.origin.is_lifecycle());
            for (position, _) in callbacks {
                prop_assert!(Some(position) > create);
            }
        }
    }

    #[test]
    fn prop_faults_are_isolated(
        activities in 1usize..=4,
        app_mask in any::<u16>(),
        fault_mask in any::<u8>(),
        panics in any::<bool>(),
    ) {
        let doc = generated_app(activities, app_mask);
        let procedure = synthesizer(Preset::Exhaustive).synthesize_facts(&doc);
        let mut dispatcher = FaultInjector { mask: fault_mask, panics };

        let trace = DriverExecutor::new().run(&procedure, &mut dispatcher);

        // Every step is still dispatched, unordered ones once per pass
        let expected: usize = procedure
            .sections()
            .iter()
            .map(|section| match section.kind {
                SectionKind::Ordered => section.steps.len(),
                SectionKind::Unordered { passes } => {
                    section.steps.len() * passes
                }
            })
            .sum();
        prop_assert_eq!(trace.invoked.len(), expected);

        for step in procedure.steps() {
            prop_assert_eq!(trace.faulted(step.id), dispatcher.faults_on(step));
        }

        let healthy: BTreeSet<(TypeName, MethodSignature)> = procedure
            .steps()
            .filter(|step| !dispatcher.faults_on(step))
            .map(|step| (step.component.clone(), step.method.clone()))
            .collect();
        prop_assert!(trace.completed_targets(&procedure).is_superset(&healthy));
    }
}

#[test]
fn test_fault_free_run_completes_every_target() {
    let procedure = synthesize(&hoist_test2());
    let mut dispatcher = FaultInjector {
        mask: 0,
        panics: false,
    };

    let trace = DriverExecutor::new().run(&procedure, &mut dispatcher);
    assert!(trace.faults.is_empty());
    assert_eq!(trace.completed_targets(&procedure), procedure.call_targets());
}
