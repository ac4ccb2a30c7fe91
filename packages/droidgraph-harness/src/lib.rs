/*
 * Droidgraph Harness - Android Entry-Point Synthesis
 *
 * Framework applications never call their own entry points: the runtime
 * instantiates components, hands them framework-owned objects and invokes
 * lifecycle/listener callbacks on its own schedule. This crate turns the
 * statically declared facts about an app into a single driver procedure that
 * a whole-program analysis can use as its unique root.
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (TypeName, MethodSignature)
 * - features/    : Vertical slices (facts → standin → lifecycle/callbacks → driver)
 * - config/      : Presets, YAML schema, validation
 *
 * Data flow:
 *   FactsDocument → StandInRegistry → DriverSynthesizer → DriverProcedure
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::should_implement_trait)] // from_str naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Configuration system (presets, YAML, validation)
pub mod config;

/// Crate-wide error type
pub mod errors;

/// Feature slices
pub mod features;

/// Shared models
pub mod shared;

pub use config::{HarnessConfig, Preset, ValidatedConfig};
pub use errors::{HarnessError, Result};
pub use features::driver::{
    CallDispatcher, CallStep, DispatchFault, DriverExecutor, DriverProcedure, DriverSynthesizer,
    ExecutionTrace, JavaHarnessEmitter,
};
pub use features::facts::{ComponentDeclaration, ComponentKind, FactsDocument, HandlerBinding};
pub use features::standin::{StandIn, StandInRef, StandInRegistry};
pub use shared::models::{MethodSignature, ResourceId, TypeName};
