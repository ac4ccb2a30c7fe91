//! Regression app fixtures
//!
//! Each fixture is the facts document a producer would hand over for one of
//! the small apps used to pin down driver behavior: view lookups, hoisted
//! component state, handler bindings, system services and fragments.

use droidgraph_harness::config::{HarnessConfig, Preset};
use droidgraph_harness::features::facts::{
    AccessorStep, ArgumentSource, IdentifierBinding, ListenerImpl, ParamBinding,
};
use droidgraph_harness::{
    ComponentDeclaration, ComponentKind, DriverProcedure, DriverSynthesizer, FactsDocument,
    HandlerBinding, MethodSignature, ResourceId, TypeName,
};

pub const MY_SURFACE_VIEW: ResourceId = 0x7f05_0000;
pub const MY_BTN: ResourceId = 0x7f05_0001;
pub const FRAGMENT_MAIN: ResourceId = 0x7f05_0002;

pub const BUNDLE: &str = "android.os.Bundle";
pub const VIEW: &str = "android.view.View";
pub const SURFACE_VIEW: &str = "android.view.SurfaceView";
pub const SURFACE_HOLDER: &str = "android.view.SurfaceHolder";
pub const BUTTON: &str = "android.widget.Button";

pub fn on_create() -> MethodSignature {
    MethodSignature::of("onCreate", &[BUNDLE])
}

pub fn on_destroy() -> MethodSignature {
    MethodSignature::nullary("onDestroy")
}

fn document(app: &str) -> FactsDocument {
    let mut doc = FactsDocument::new();
    doc.app = Some(app.to_string());
    doc
}

fn surface_view() -> IdentifierBinding {
    IdentifierBinding::new(MY_SURFACE_VIEW, SURFACE_VIEW).named("mySurfaceView")
}

fn button() -> IdentifierBinding {
    IdentifierBinding::new(MY_BTN, BUTTON).named("myBtn")
}

/// `holder = mySurfaceView.getHolder()`
pub fn holder_source() -> ArgumentSource {
    ArgumentSource::Accessor {
        id: MY_SURFACE_VIEW,
        chain: vec![AccessorStep::new("getHolder", SURFACE_HOLDER)],
    }
}

/// Plain class constructed with the activity, listening for configuration
/// changes
pub fn controller(package: &str) -> ComponentDeclaration {
    ComponentDeclaration::new(format!("{}.Controller", package), ComponentKind::PlainListenerImpl)
        .with_constructor(vec![TypeName::context()])
        .with_listener(ListenerImpl::new("android.content.ComponentCallbacks"))
        .with_method(MethodSignature::nullary("initCam"))
}

/// Activity looking up a surface view in `onCreate` and using its holder
/// in `onDestroy`
pub fn view_lookup() -> FactsDocument {
    let package = "com.test.viewlookup";
    let mut doc = document(package);
    doc.identifiers.push(surface_view());
    doc.components.push(
        ComponentDeclaration::new(format!("{}.MainActivity", package), ComponentKind::Activity)
            .with_lifecycle(on_create())
            .with_lifecycle(on_destroy()),
    );
    doc.components.push(controller(package));
    doc
}

/// Component state created in `onCreate` and used afterwards
pub fn hoist_test1() -> FactsDocument {
    let package = "com.test.hoisttest1";
    let mut doc = document(package);
    doc.components.push(
        ComponentDeclaration::new(format!("{}.MainActivity", package), ComponentKind::Activity)
            .with_lifecycle(on_create()),
    );
    doc.components.push(controller(package));
    doc
}

/// Manifest handler `myOnClick` bound to `myBtn`, storing the surface
/// holder for `onDestroy`
pub fn hoist_test2() -> FactsDocument {
    let package = "com.test.hoisttest2";
    let activity = format!("{}.MainActivity", package);
    let mut doc = document(package);
    doc.identifiers.push(surface_view());
    doc.identifiers.push(button());
    doc.handlers
        .push(HandlerBinding::new("myOnClick", MY_BTN).on_component(activity.as_str()));
    doc.components.push(
        ComponentDeclaration::new(activity.as_str(), ComponentKind::Activity)
            .with_lifecycle(on_create())
            .with_lifecycle(on_destroy())
            .with_handler("myOnClick")
            .with_method(MethodSignature::of("myOnClick", &[VIEW])),
    );
    doc
}

/// Preference activity that is also a shared-preference listener, plus a
/// controller receiving component callbacks
pub fn lifecycle_and_interface_callback() -> FactsDocument {
    let package = "com.test.lifecycleandinterfacecallback";
    let activity = format!("{}.MainActivity", package);
    let mut doc = document(package);
    doc.identifiers.push(surface_view());
    doc.identifiers.push(button());
    doc.handlers.push(HandlerBinding::new("myOnClick", MY_BTN));
    doc.components.push(
        ComponentDeclaration::new(activity.as_str(), ComponentKind::Activity)
            .with_superclass("android.preference.PreferenceActivity")
            .with_lifecycle(on_create())
            .with_lifecycle(on_destroy())
            .with_listener(ListenerImpl::new(
                "android.content.SharedPreferences.OnSharedPreferenceChangeListener",
            ))
            .with_handler("myOnClick")
            .with_method(MethodSignature::of("myOnClick", &[VIEW])),
    );
    doc.components.push(controller(package));
    doc
}

/// Controller created in `onCreate`, used in `onDestroy`, with `onPause`
/// in between
pub fn protected_callback() -> FactsDocument {
    let package = "com.test.protectedcallback";
    let mut doc = document(package);
    doc.components.push(
        ComponentDeclaration::new(format!("{}.MainActivity", package), ComponentKind::Activity)
            .with_lifecycle(on_create())
            .with_lifecycle(MethodSignature::nullary("onPause"))
            .with_lifecycle(on_destroy()),
    );
    doc.components.push(controller(package));
    doc
}

/// Fragment declared in the activity layout; the fragment listens for
/// clicks on `myBtn`
pub fn support_fragment() -> FactsDocument {
    let package = "com.test.supportfragment";
    let fragment = format!("{}.MainFragment", package);
    let mut doc = document(package);
    doc.identifiers.push(surface_view());
    doc.identifiers.push(button());
    doc.identifiers
        .push(IdentifierBinding::new(FRAGMENT_MAIN, fragment.as_str()).named("fragmentMain"));
    doc.components.push(
        ComponentDeclaration::new(format!("{}.MainActivity", package), ComponentKind::Activity)
            .with_superclass("android.support.v4.app.FragmentActivity")
            .with_lifecycle(on_create())
            .with_lifecycle(on_destroy()),
    );
    doc.components.push(
        ComponentDeclaration::new(fragment.as_str(), ComponentKind::SupportFragment)
            .with_lifecycle(MethodSignature::of(
                "onCreateView",
                &["android.view.LayoutInflater", "android.view.ViewGroup", BUNDLE],
            ))
            .with_listener(
                ListenerImpl::new("android.view.View.OnClickListener")
                    .with_method(MethodSignature::of("onClick", &[VIEW]))
                    .registered_on(MY_BTN),
            ),
    );
    doc
}

/// Activity fetching the account manager by service name and by factory
pub fn system_service() -> FactsDocument {
    let package = "com.test.systemservice";
    let mut doc = document(package);
    doc.identifiers.push(surface_view());
    doc.services.push("account".to_string());
    doc.components.push(
        ComponentDeclaration::new(format!("{}.MainActivity", package), ComponentKind::Activity)
            .with_lifecycle(on_create())
            .with_lifecycle(on_destroy()),
    );
    doc
}

/// Surface holder callback whose holder argument is bound to the view's
/// `getHolder()`
pub fn surface_callback() -> FactsDocument {
    let package = "com.test.surfacecallback";
    let mut doc = document(package);
    doc.identifiers.push(surface_view());
    doc.components.push(
        ComponentDeclaration::new(format!("{}.MainActivity", package), ComponentKind::Activity)
            .with_lifecycle(on_create())
            .with_lifecycle(on_destroy())
            .with_listener(
                ListenerImpl::new("android.view.SurfaceHolder.Callback")
                    .with_binding(ParamBinding::new(0, holder_source())),
            ),
    );
    doc
}

/// Every regression fixture, by app name
pub fn all_fixtures() -> Vec<(&'static str, FactsDocument)> {
    vec![
        ("ViewLookup", view_lookup()),
        ("HoistTest1", hoist_test1()),
        ("HoistTest2", hoist_test2()),
        ("LifecycleAndInterfaceCallback", lifecycle_and_interface_callback()),
        ("ProtectedCallback", protected_callback()),
        ("SupportFragment", support_fragment()),
        ("SystemService", system_service()),
        ("SurfaceCallback", surface_callback()),
    ]
}

pub fn synthesizer(preset: Preset) -> DriverSynthesizer {
    DriverSynthesizer::new(HarnessConfig::preset(preset).build().unwrap())
}

/// Synthesize a fixture with the default configuration
pub fn synthesize(doc: &FactsDocument) -> DriverProcedure {
    synthesizer(Preset::Balanced).synthesize_facts(doc)
}
