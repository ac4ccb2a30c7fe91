//! Driver execution
//!
//! Walks a procedure through a `CallDispatcher`. Every step is isolated:
//! an `Err` or a panic in one call is recorded and the walk continues with
//! the next step.

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, trace};

use crate::features::driver::domain::{DriverProcedure, SectionKind, StepId};
use crate::features::driver::ports::{CallDispatcher, DispatchFault};
use crate::shared::models::{MethodSignature, TypeName};

/// What one run of a procedure did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionTrace {
    /// Steps dispatched, in dispatch order (unordered steps once per pass)
    pub invoked: Vec<StepId>,

    /// Steps whose dispatch faulted
    pub faults: Vec<(StepId, DispatchFault)>,
}

impl ExecutionTrace {
    /// Steps dispatched without a fault
    pub fn completed(&self) -> usize {
        self.invoked.len() - self.faults.len()
    }

    pub fn faulted(&self, id: StepId) -> bool {
        self.faults.iter().any(|(step, _)| *step == id)
    }

    /// Distinct (component, method) targets whose dispatch completed
    pub fn completed_targets(
        &self,
        procedure: &DriverProcedure,
    ) -> BTreeSet<(TypeName, MethodSignature)> {
        procedure
            .steps()
            .filter(|step| self.invoked.contains(&step.id) && !self.faulted(step.id))
            .map(|step| (step.component.clone(), step.method.clone()))
            .collect()
    }
}

/// Replays procedures step by step
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverExecutor;

impl DriverExecutor {
    pub fn new() -> Self {
        Self
    }

    pub fn run<D: CallDispatcher>(&self, procedure: &DriverProcedure, dispatcher: &mut D) -> ExecutionTrace {
        let mut trace = ExecutionTrace::default();
        let registry = procedure.registry();

        for section in procedure.sections() {
            let passes = match section.kind {
                SectionKind::Ordered => 1,
                SectionKind::Unordered { passes } => passes,
            };
            for _ in 0..passes {
                for step in &section.steps {
                    trace!("dispatching {} ({})", step, step.id);
                    trace.invoked.push(step.id);

                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                        dispatcher.dispatch(step, registry)
                    }));
                    let fault = match outcome {
                        Ok(Ok(())) => continue,
                        Ok(Err(fault)) => fault,
                        Err(payload) => DispatchFault::Panicked(panic_message(payload.as_ref())),
                    };
                    debug!("{} faulted: {}", step, fault);
                    trace.faults.push((step.id, fault));
                }
            }
        }
        trace
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
