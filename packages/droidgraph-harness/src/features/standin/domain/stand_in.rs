//! Stand-in Instances
//!
//! A stand-in is an abstract allocation the driver hands to app code where
//! the framework would have handed a real object. Identity is the arena
//! index: two references denote the same object iff their `StandInRef`s are
//! equal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::features::facts::ComponentKind;
use crate::shared::models::{ResourceId, TypeName};

/// Handle to a stand-in owned by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StandInRef(u32);

impl StandInRef {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StandInRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "si#{}", self.0)
    }
}

/// Why a stand-in exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StandInOrigin {
    /// Bound to a declared resource identifier
    Identifier { id: ResourceId },

    /// Lookup of an identifier with no declaration (or no identifier at all)
    Unresolved { id: Option<ResourceId> },

    /// Type-keyed service, hardware handle or context
    Ambient,

    /// The driver's instance of an app component
    Component { component: ComponentKind },

    /// Result of a getter applied to another stand-in
    Derived { parent: StandInRef, accessor: String },

    /// Primitive, string or array value
    Value,
}

/// How the stand-in is built, without running the real constructor chain
/// of anything that needs a live framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Construction {
    /// `new T(args)`
    Constructor { args: Vec<StandInRef> },

    /// `Owner.method(args)`, e.g. `Camera.open()`
    StaticFactory {
        owner: TypeName,
        method: String,
        args: Vec<StandInRef>,
    },

    /// `Owner.FIELD`, e.g. `Bundle.EMPTY`
    StaticField { owner: TypeName, field: String },

    /// `receiver.method()`
    Accessor { receiver: StandInRef, method: String },

    /// `new element[length]`
    Array { element: TypeName, length: usize },

    /// Zero / false / empty string
    DefaultValue,

    /// Abstract object of the static type with no behavior
    Degenerate,
}

impl Construction {
    /// Stand-ins this construction reads
    pub fn dependencies(&self) -> Vec<StandInRef> {
        match self {
            Self::Constructor { args } | Self::StaticFactory { args, .. } => args.clone(),
            Self::Accessor { receiver, .. } => vec![*receiver],
            _ => Vec::new(),
        }
    }
}

/// A fabricated framework object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandIn {
    pub id: StandInRef,

    /// Concrete fabricated type (may be a subtype of the requested type)
    pub type_name: TypeName,

    pub origin: StandInOrigin,

    pub construction: Construction,

    /// Unique Java identifier used when emitting the stand-in
    pub label: String,
}

impl StandIn {
    pub fn is_degenerate(&self) -> bool {
        matches!(self.construction, Construction::Degenerate)
    }

    pub fn identifier(&self) -> Option<ResourceId> {
        match self.origin {
            StandInOrigin::Identifier { id } => Some(id),
            _ => None,
        }
    }

    pub fn is_component(&self) -> bool {
        matches!(self.origin, StandInOrigin::Component { .. })
    }
}

impl fmt::Display for StandIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.label, self.type_name)
    }
}

/// Why fabrication fell back to a degenerate stand-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradationReason {
    /// No recipe for the type (abstract, interface or unknown)
    NoRecipe,
    /// Recipe explicitly marks the type unfabricable (native resources)
    Unfabricable,
    /// Fabrication re-entered a type already under construction
    Cycle,
    /// Identifier looked up without a declaration
    MissingIdentifier,
    /// System service name with no known type
    UnknownService,
}

impl fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NoRecipe => "no recipe",
            Self::Unfabricable => "unfabricable",
            Self::Cycle => "construction cycle",
            Self::MissingIdentifier => "missing identifier",
            Self::UnknownService => "unknown system service",
        };
        write!(f, "{}", text)
    }
}

/// Recorded degradation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degradation {
    pub stand_in: StandInRef,
    pub subject: String,
    pub reason: DegradationReason,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} degraded ({})", self.subject, self.reason)
    }
}
