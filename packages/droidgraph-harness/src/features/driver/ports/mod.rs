/*
 * Driver Ports
 *
 * The driver procedure is consumed outside this crate: a points-to analysis
 * walking it as its root, an interpreter replaying it, a test double counting
 * calls. `CallDispatcher` is the seam they implement; `DriverExecutor`
 * drives it step by step.
 */

use thiserror::Error;

use crate::features::driver::domain::CallStep;
use crate::features::standin::StandInRegistry;

/// Fault raised while dispatching one call step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchFault {
    /// The callee threw
    #[error("call threw: {0}")]
    Thrown(String),

    /// The dispatcher itself panicked
    #[error("dispatcher panicked: {0}")]
    Panicked(String),
}

/// Performs one synthesized call
pub trait CallDispatcher {
    /// Invoke `step.method` on `step.receiver` with `step.args`
    ///
    /// Stand-in handles are resolved through `registry`.
    fn dispatch(&mut self, step: &CallStep, registry: &StandInRegistry) -> Result<(), DispatchFault>;
}
