/*
 * Built-in Lifecycle Protocols
 *
 * Documented callback orders for every component kind:
 * - ActivityLifecycle: create → start → resume … pause → stop → destroy
 * - ServiceLifecycle, ReceiverLifecycle, ProviderLifecycle, ApplicationLifecycle
 * - FragmentLifecycle (framework and support fragments share the order)
 *
 * Active-phase entries are callbacks the framework may deliver at any time
 * while the component is live; only the chains below are guaranteed.
 */

use crate::features::facts::ComponentKind;
use crate::features::lifecycle::domain::{LifecycleProtocol, Phase};
use crate::features::lifecycle::ports::LifecycleDefinition;
use crate::shared::models::MethodSignature;

const BUNDLE: &str = "android.os.Bundle";
const INTENT: &str = "android.content.Intent";
const CONFIGURATION: &str = "android.content.res.Configuration";

/// Add steps of one phase, returning their indices in order
fn add(protocol: &mut LifecycleProtocol, phase: Phase, methods: &[(&str, &[&str])]) -> Vec<usize> {
    methods
        .iter()
        .map(|(name, params)| protocol.add_step(phase, MethodSignature::of(*name, params)))
        .collect()
}

/// Each index happens before the next
fn sequence(protocol: &mut LifecycleProtocol, indices: &[usize]) {
    for pair in indices.windows(2) {
        protocol.add_edge(pair[0], pair[1]);
    }
}

/// Activity protocol
///
/// onCreate → onStart → onRestoreInstanceState → onPostCreate
/// onResume → onPostResume
/// onPause → onSaveInstanceState → onStop → onRestart → onDestroy
pub struct ActivityLifecycle;

impl LifecycleDefinition for ActivityLifecycle {
    fn define() -> LifecycleProtocol {
        let mut protocol = LifecycleProtocol::new(ComponentKind::Activity);

        let create = add(
            &mut protocol,
            Phase::Create,
            &[
                ("onCreate", &[BUNDLE]),
                ("onStart", &[]),
                ("onRestoreInstanceState", &[BUNDLE]),
                ("onPostCreate", &[BUNDLE]),
            ],
        );
        let active = add(
            &mut protocol,
            Phase::Active,
            &[
                ("onResume", &[]),
                ("onPostResume", &[]),
                ("onNewIntent", &[INTENT]),
                ("onActivityResult", &["int", "int", INTENT]),
                ("onCreateOptionsMenu", &["android.view.Menu"]),
                ("onOptionsItemSelected", &["android.view.MenuItem"]),
                ("onConfigurationChanged", &[CONFIGURATION]),
                ("onWindowFocusChanged", &["boolean"]),
                ("onUserInteraction", &[]),
                ("onBackPressed", &[]),
                ("onLowMemory", &[]),
            ],
        );
        let teardown = add(
            &mut protocol,
            Phase::Teardown,
            &[
                ("onPause", &[]),
                ("onSaveInstanceState", &[BUNDLE]),
                ("onStop", &[]),
                ("onRestart", &[]),
                ("onDestroy", &[]),
            ],
        );

        sequence(&mut protocol, &create);
        sequence(&mut protocol, &active[..2]);
        sequence(&mut protocol, &teardown);
        protocol
    }
}

/// Service protocol
///
/// onCreate → (onStartCommand | onBind → onUnbind → onRebind) → onDestroy
pub struct ServiceLifecycle;

impl LifecycleDefinition for ServiceLifecycle {
    fn define() -> LifecycleProtocol {
        let mut protocol = LifecycleProtocol::new(ComponentKind::Service);

        add(&mut protocol, Phase::Create, &[("onCreate", &[])]);
        let active = add(
            &mut protocol,
            Phase::Active,
            &[
                ("onBind", &[INTENT]),
                ("onUnbind", &[INTENT]),
                ("onRebind", &[INTENT]),
                ("onStartCommand", &[INTENT, "int", "int"]),
                ("onStart", &[INTENT, "int"]),
                ("onConfigurationChanged", &[CONFIGURATION]),
                ("onTaskRemoved", &[INTENT]),
                ("onTrimMemory", &["int"]),
                ("onLowMemory", &[]),
            ],
        );
        add(&mut protocol, Phase::Teardown, &[("onDestroy", &[])]);

        sequence(&mut protocol, &active[..3]);
        protocol
    }
}

/// Broadcast receiver protocol: a single `onReceive`
pub struct ReceiverLifecycle;

impl LifecycleDefinition for ReceiverLifecycle {
    fn define() -> LifecycleProtocol {
        let mut protocol = LifecycleProtocol::new(ComponentKind::BroadcastReceiver);
        add(
            &mut protocol,
            Phase::Active,
            &[("onReceive", &["android.content.Context", INTENT])],
        );
        protocol
    }
}

/// Content provider protocol
///
/// onCreate → (query | insert | update | delete | getType) → shutdown
pub struct ProviderLifecycle;

impl LifecycleDefinition for ProviderLifecycle {
    fn define() -> LifecycleProtocol {
        const URI: &str = "android.net.Uri";
        const VALUES: &str = "android.content.ContentValues";
        const STRING: &str = "java.lang.String";
        const STRINGS: &str = "java.lang.String[]";

        let mut protocol = LifecycleProtocol::new(ComponentKind::ContentProvider);
        add(&mut protocol, Phase::Create, &[("onCreate", &[])]);
        add(
            &mut protocol,
            Phase::Active,
            &[
                ("query", &[URI, STRINGS, STRING, STRINGS, STRING]),
                ("insert", &[URI, VALUES]),
                ("update", &[URI, VALUES, STRING, STRINGS]),
                ("delete", &[URI, STRING, STRINGS]),
                ("getType", &[URI]),
                ("onConfigurationChanged", &[CONFIGURATION]),
                ("onLowMemory", &[]),
            ],
        );
        add(&mut protocol, Phase::Teardown, &[("shutdown", &[])]);
        protocol
    }
}

/// Application protocol
pub struct ApplicationLifecycle;

impl LifecycleDefinition for ApplicationLifecycle {
    fn define() -> LifecycleProtocol {
        let mut protocol = LifecycleProtocol::new(ComponentKind::Application);
        add(&mut protocol, Phase::Create, &[("onCreate", &[])]);
        add(
            &mut protocol,
            Phase::Active,
            &[
                ("onConfigurationChanged", &[CONFIGURATION]),
                ("onTrimMemory", &["int"]),
                ("onLowMemory", &[]),
            ],
        );
        add(&mut protocol, Phase::Teardown, &[("onTerminate", &[])]);
        protocol
    }
}

/// Fragment protocol
///
/// onAttach → onCreate → onCreateView → onViewCreated → onActivityCreated
///   → onViewStateRestored → onStart
/// onResume
/// onPause → onSaveInstanceState → onStop → onDestroyView → onDestroy → onDetach
pub struct FragmentLifecycle;

impl FragmentLifecycle {
    /// Same order for framework and support fragments
    pub fn define_for(kind: ComponentKind) -> LifecycleProtocol {
        let mut protocol = LifecycleProtocol::new(kind);

        let create = add(
            &mut protocol,
            Phase::Create,
            &[
                ("onAttach", &["android.content.Context"]),
                ("onCreate", &[BUNDLE]),
                (
                    "onCreateView",
                    &["android.view.LayoutInflater", "android.view.ViewGroup", BUNDLE],
                ),
                ("onViewCreated", &["android.view.View", BUNDLE]),
                ("onActivityCreated", &[BUNDLE]),
                ("onViewStateRestored", &[BUNDLE]),
                ("onStart", &[]),
            ],
        );
        add(
            &mut protocol,
            Phase::Active,
            &[
                ("onResume", &[]),
                ("onActivityResult", &["int", "int", INTENT]),
                ("onCreateOptionsMenu", &["android.view.Menu", "android.view.MenuInflater"]),
                ("onOptionsItemSelected", &["android.view.MenuItem"]),
                ("onHiddenChanged", &["boolean"]),
                ("onConfigurationChanged", &[CONFIGURATION]),
                ("onLowMemory", &[]),
            ],
        );
        let teardown = add(
            &mut protocol,
            Phase::Teardown,
            &[
                ("onPause", &[]),
                ("onSaveInstanceState", &[BUNDLE]),
                ("onStop", &[]),
                ("onDestroyView", &[]),
                ("onDestroy", &[]),
                ("onDetach", &[]),
            ],
        );

        sequence(&mut protocol, &create);
        sequence(&mut protocol, &teardown);
        protocol
    }
}

impl LifecycleDefinition for FragmentLifecycle {
    fn define() -> LifecycleProtocol {
        Self::define_for(ComponentKind::Fragment)
    }
}

/// Built-in protocol for a component kind
///
/// Plain listener implementations have no framework lifecycle.
pub fn built_in(kind: ComponentKind) -> LifecycleProtocol {
    match kind {
        ComponentKind::Activity => ActivityLifecycle::define(),
        ComponentKind::Service => ServiceLifecycle::define(),
        ComponentKind::BroadcastReceiver => ReceiverLifecycle::define(),
        ComponentKind::ContentProvider => ProviderLifecycle::define(),
        ComponentKind::Application => ApplicationLifecycle::define(),
        ComponentKind::Fragment | ComponentKind::SupportFragment => {
            FragmentLifecycle::define_for(kind)
        }
        ComponentKind::PlainListenerImpl => LifecycleProtocol::new(kind),
    }
}
