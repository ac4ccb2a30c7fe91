/*
 * Lifecycle Ports
 *
 * Interfaces for external integration.
 */

use crate::features::lifecycle::domain::LifecycleProtocol;

/// Lifecycle protocol definition trait
///
/// Implement this trait to ship a protocol for a framework variant.
pub trait LifecycleDefinition {
    /// Define the protocol
    fn define() -> LifecycleProtocol;
}
