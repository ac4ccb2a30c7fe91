/*
 * Component Declarations
 *
 * One declaration per discovered application class the framework would
 * instantiate or call back into. Declarations are immutable once discovered;
 * the builder methods below exist for producers and fixtures.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::models::{MethodSignature, ResourceId, TypeName};

/// Declared supertype kind of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Application,
    Activity,
    Service,
    BroadcastReceiver,
    ContentProvider,
    /// `android.app.Fragment`
    Fragment,
    /// `android.support.v4.app.Fragment` / androidx
    SupportFragment,
    /// Plain class implementing framework listener interfaces
    PlainListenerImpl,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 8] = [
        ComponentKind::Application,
        ComponentKind::Activity,
        ComponentKind::Service,
        ComponentKind::BroadcastReceiver,
        ComponentKind::ContentProvider,
        ComponentKind::Fragment,
        ComponentKind::SupportFragment,
        ComponentKind::PlainListenerImpl,
    ];

    /// Framework base class, if the kind has one
    pub fn framework_supertype(&self) -> Option<TypeName> {
        let name = match self {
            Self::Application => "android.app.Application",
            Self::Activity => "android.app.Activity",
            Self::Service => "android.app.Service",
            Self::BroadcastReceiver => "android.content.BroadcastReceiver",
            Self::ContentProvider => "android.content.ContentProvider",
            Self::Fragment => "android.app.Fragment",
            Self::SupportFragment => "android.support.v4.app.Fragment",
            Self::PlainListenerImpl => return None,
        };
        Some(TypeName::new(name))
    }

    /// Framework types an instance of this kind can be passed as
    pub fn assignable_framework_types(&self) -> &'static [&'static str] {
        match self {
            Self::Application => &[
                "android.app.Application",
                "android.content.ContextWrapper",
                "android.content.Context",
            ],
            Self::Activity => &[
                "android.app.Activity",
                "android.view.ContextThemeWrapper",
                "android.content.ContextWrapper",
                "android.content.Context",
            ],
            Self::Service => &[
                "android.app.Service",
                "android.content.ContextWrapper",
                "android.content.Context",
            ],
            Self::BroadcastReceiver => &["android.content.BroadcastReceiver"],
            Self::ContentProvider => &["android.content.ContentProvider"],
            Self::Fragment => &["android.app.Fragment"],
            Self::SupportFragment => &[
                "android.support.v4.app.Fragment",
                "androidx.fragment.app.Fragment",
            ],
            Self::PlainListenerImpl => &[],
        }
    }

    /// Instantiation rank used by the kind-rank ordering policy
    ///
    /// Mirrors process start-up: the application object first, then content
    /// providers, then UI, then background components.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Application => 0,
            Self::ContentProvider => 1,
            Self::Activity => 2,
            Self::Fragment => 3,
            Self::SupportFragment => 4,
            Self::Service => 5,
            Self::BroadcastReceiver => 6,
            Self::PlainListenerImpl => 7,
        }
    }

    /// Typed component getter exposed by the generated stubs class
    pub fn stub_getter(&self) -> Option<&'static str> {
        match self {
            Self::Application => Some("getApplication"),
            Self::Activity => Some("getActivity"),
            Self::Service => Some("getService"),
            Self::BroadcastReceiver => Some("getBroadcastReceiver"),
            Self::ContentProvider => Some("getContentProvider"),
            Self::Fragment => Some("getAppFragment"),
            Self::SupportFragment => Some("getSupportFragment"),
            Self::PlainListenerImpl => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Activity => "activity",
            Self::Service => "service",
            Self::BroadcastReceiver => "broadcast_receiver",
            Self::ContentProvider => "content_provider",
            Self::Fragment => "fragment",
            Self::SupportFragment => "support_fragment",
            Self::PlainListenerImpl => "plain_listener_impl",
        }
    }

    /// Parse kind from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        let normalized = s.to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown component kind '{}'. Valid kinds: {}",
                    s,
                    Self::ALL
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One getter call in an accessor chain (`getHolder()` returning `SurfaceHolder`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessorStep {
    pub method: String,
    pub returns: TypeName,
}

impl AccessorStep {
    pub fn new(method: impl Into<String>, returns: impl Into<TypeName>) -> Self {
        Self {
            method: method.into(),
            returns: returns.into(),
        }
    }
}

/// Where a parameter's value is declared to come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArgumentSource {
    /// The view bound to a resource identifier
    Identifier { id: ResourceId },

    /// The value a getter chain returns when applied to an identifier's view
    Accessor {
        id: ResourceId,
        chain: Vec<AccessorStep>,
    },

    /// The driver's instance of a component class
    Component { class: TypeName },
}

/// Declared source for one parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamBinding {
    /// Method the binding applies to; `None` applies to every method of the owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Zero-based parameter index
    pub index: usize,

    pub source: ArgumentSource,
}

impl ParamBinding {
    pub fn new(index: usize, source: ArgumentSource) -> Self {
        Self {
            method: None,
            index,
            source,
        }
    }

    pub fn for_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn applies_to(&self, method: &MethodSignature) -> bool {
        self.method
            .as_deref()
            .map_or(true, |name| name == method.name)
    }
}

/// An implemented listener interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerImpl {
    pub interface: TypeName,

    /// Implemented methods; empty means every method the catalog knows
    #[serde(default)]
    pub methods: Vec<MethodSignature>,

    /// View identifiers the listener is attached to
    #[serde(default)]
    pub registered_on: Vec<ResourceId>,

    #[serde(default)]
    pub bindings: Vec<ParamBinding>,
}

impl ListenerImpl {
    pub fn new(interface: impl Into<TypeName>) -> Self {
        Self {
            interface: interface.into(),
            methods: Vec::new(),
            registered_on: Vec::new(),
            bindings: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: MethodSignature) -> Self {
        self.methods.push(method);
        self
    }

    pub fn registered_on(mut self, id: ResourceId) -> Self {
        self.registered_on.push(id);
        self
    }

    pub fn with_binding(mut self, binding: ParamBinding) -> Self {
        self.bindings.push(binding);
        self
    }
}

/// A discovered application component class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDeclaration {
    /// Fully-qualified class name
    pub name: TypeName,

    pub kind: ComponentKind,

    /// Direct framework superclass when more specific than the kind's base
    /// (e.g. `android.preference.PreferenceActivity`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<TypeName>,

    /// Parameters of the constructor the driver uses; empty = default constructor
    #[serde(default)]
    pub constructor_params: Vec<TypeName>,

    /// Overridden lifecycle methods
    #[serde(default)]
    pub lifecycle: Vec<MethodSignature>,

    #[serde(default)]
    pub listeners: Vec<ListenerImpl>,

    /// Handler method names bound via manifest/XML declarations
    #[serde(default)]
    pub handlers: Vec<String>,

    /// Other public methods (used to resolve handler signatures)
    #[serde(default)]
    pub methods: Vec<MethodSignature>,

    /// Parameter bindings for lifecycle and handler methods
    #[serde(default)]
    pub bindings: Vec<ParamBinding>,
}

impl ComponentDeclaration {
    pub fn new(name: impl Into<TypeName>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            superclass: None,
            constructor_params: Vec::new(),
            lifecycle: Vec::new(),
            listeners: Vec::new(),
            handlers: Vec::new(),
            methods: Vec::new(),
            bindings: Vec::new(),
        }
    }

    pub fn with_superclass(mut self, superclass: impl Into<TypeName>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn with_constructor(mut self, params: Vec<TypeName>) -> Self {
        self.constructor_params = params;
        self
    }

    pub fn with_lifecycle(mut self, method: MethodSignature) -> Self {
        self.lifecycle.push(method);
        self
    }

    pub fn with_listener(mut self, listener: ListenerImpl) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn with_handler(mut self, name: impl Into<String>) -> Self {
        self.handlers.push(name.into());
        self
    }

    pub fn with_method(mut self, method: MethodSignature) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_binding(mut self, binding: ParamBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Whether an instance may be passed where `ty` is expected
    pub fn is_assignable_to(&self, ty: &TypeName) -> bool {
        if &self.name == ty || self.superclass.as_ref() == Some(ty) {
            return true;
        }
        if self
            .listeners
            .iter()
            .any(|listener| &listener.interface == ty)
        {
            return true;
        }
        self.kind
            .assignable_framework_types()
            .iter()
            .any(|name| *name == ty.as_str())
    }

    /// Declared methods named `name` (public methods and lifecycle overrides)
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodSignature> {
        self.methods
            .iter()
            .chain(self.lifecycle.iter())
            .filter(move |method| method.name == name)
    }

    pub fn declares_method(&self, name: &str) -> bool {
        self.methods_named(name).next().is_some() || self.handlers.iter().any(|h| h == name)
    }
}
