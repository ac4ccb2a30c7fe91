/*
 * Driver Procedure
 *
 * The synthesized entry point: every stand-in allocation (registry order),
 * then the call steps grouped in sections:
 * - Ordered sections: one per component, lifecycle steps interleaved with
 *   the callbacks reachable at each point
 * - Unordered section: every callback target again, repeated per pass, to
 *   cover interleavings the framework might choose
 *
 * Immutable once built. The registry is owned by the procedure, so nothing
 * can fabricate into it after synthesis.
 */

use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

use crate::features::lifecycle::Phase;
use crate::features::standin::{Degradation, StandIn, StandInRef, StandInRegistry};
use crate::shared::models::{MethodSignature, ResourceId, TypeName};

/// Step handle (global position in declaration order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StepId(u32);

impl StepId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step#{}", self.0)
    }
}

/// Why a call is in the driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallOrigin {
    /// Lifecycle override
    Lifecycle { phase: Phase },

    /// Implemented listener interface method
    Listener {
        interface: TypeName,
        #[serde(skip_serializing_if = "Option::is_none")]
        identifier: Option<ResourceId>,
    },

    /// Externally declared handler
    Handler {
        #[serde(skip_serializing_if = "Option::is_none")]
        identifier: Option<ResourceId>,
    },
}

impl CallOrigin {
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::Lifecycle { .. })
    }

    pub fn is_handler(&self) -> bool {
        matches!(self, Self::Handler { .. })
    }
}

/// One argument: declared parameter type and the stand-in passed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgBinding {
    pub param: TypeName,
    pub value: StandInRef,
}

/// `receiver.method(args)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallStep {
    pub id: StepId,

    /// Declaring component class
    pub component: TypeName,

    /// Component instance the call is made on
    pub receiver: StandInRef,

    pub method: MethodSignature,

    pub args: Vec<ArgBinding>,

    pub origin: CallOrigin,
}

impl CallStep {
    pub fn arg_values(&self) -> Vec<StandInRef> {
        self.args.iter().map(|arg| arg.value).collect()
    }
}

impl fmt::Display for CallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component.simple_name(), self.method)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionKind {
    /// Steps run once, in order
    Ordered,
    /// Steps may run in any order, any number of times; emitted `passes` times
    Unordered { passes: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub label: String,
    pub kind: SectionKind,
    pub steps: Vec<CallStep>,
}

impl Section {
    pub fn is_unordered(&self) -> bool {
        matches!(self.kind, SectionKind::Unordered { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

/// Non-fatal synthesis finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

/// Synthesized driver
#[derive(Debug, Clone)]
pub struct DriverProcedure {
    name: String,
    sections: Vec<Section>,
    diagnostics: Vec<Diagnostic>,
    registry: StandInRegistry,
}

impl DriverProcedure {
    pub(crate) fn new(
        name: impl Into<String>,
        sections: Vec<Section>,
        diagnostics: Vec<Diagnostic>,
        registry: StandInRegistry,
    ) -> Self {
        Self {
            name: name.into(),
            sections,
            diagnostics,
            registry,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hoisted allocations in dependency order
    pub fn allocations(&self) -> &[StandIn] {
        self.registry.stand_ins()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn registry(&self) -> &StandInRegistry {
        &self.registry
    }

    pub fn degradations(&self) -> &[Degradation] {
        self.registry.degradations()
    }

    /// Every step, ordered sections first, each once
    pub fn steps(&self) -> impl Iterator<Item = &CallStep> {
        self.sections.iter().flat_map(|section| section.steps.iter())
    }

    pub fn ordered_steps(&self) -> impl Iterator<Item = &CallStep> {
        self.sections
            .iter()
            .filter(|section| !section.is_unordered())
            .flat_map(|section| section.steps.iter())
    }

    pub fn unordered_steps(&self) -> impl Iterator<Item = &CallStep> {
        self.sections
            .iter()
            .filter(|section| section.is_unordered())
            .flat_map(|section| section.steps.iter())
    }

    pub fn step_count(&self) -> usize {
        self.sections.iter().map(|section| section.steps.len()).sum()
    }

    /// Distinct (component, method) call targets
    pub fn call_targets(&self) -> BTreeSet<(TypeName, MethodSignature)> {
        self.steps()
            .map(|step| (step.component.clone(), step.method.clone()))
            .collect()
    }

    /// Steps calling `method_name` on `component`
    pub fn calls_to(&self, component: &TypeName, method_name: &str) -> Vec<&CallStep> {
        self.steps()
            .filter(|step| &step.component == component && step.method.name == method_name)
            .collect()
    }

    /// Position of a step in `steps()` order
    pub fn position(&self, id: StepId) -> Option<usize> {
        self.steps().position(|step| step.id == id)
    }

    /// First ordered-section position of a call to `method_name` on `component`
    pub fn first_ordered_position(&self, component: &TypeName, method_name: &str) -> Option<usize> {
        self.ordered_steps()
            .position(|step| &step.component == component && step.method.name == method_name)
    }
}

#[derive(Serialize)]
struct ProcedureArtifact<'a> {
    name: &'a str,
    stand_ins: &'a [StandIn],
    identifiers: Vec<(ResourceId, StandInRef)>,
    sections: &'a [Section],
    degradations: &'a [Degradation],
    diagnostics: &'a [Diagnostic],
}

impl Serialize for DriverProcedure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ProcedureArtifact {
            name: &self.name,
            stand_ins: self.registry.stand_ins(),
            identifiers: self.registry.identifiers(),
            sections: &self.sections,
            degradations: self.registry.degradations(),
            diagnostics: &self.diagnostics,
        }
        .serialize(serializer)
    }
}
