/*
 * Component Lifecycle Protocols
 *
 * What the framework guarantees about the order of lifecycle callbacks on
 * one component instance, per component kind.
 *
 * Architecture:
 * - Domain: Phase, LifecycleStep, LifecycleProtocol (partial order)
 * - Application: ProtocolSet (built-ins plus custom overrides)
 * - Infrastructure: Built-in protocols, YAML/JSON parser
 * - Ports: LifecycleDefinition trait
 */

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::ProtocolSet;
pub use domain::{LifecycleProtocol, LifecycleStep, Phase, PlacedOverride};
pub use infrastructure::{built_in, LifecycleProtocolParser, ProtocolParseError};
pub use ports::LifecycleDefinition;
