/*
 * Driver Synthesizer
 *
 * Builds the single entry point a whole-program analysis starts from: every
 * component allocated, every lifecycle override in protocol order, every
 * listener and handler method reachable from it, all fed stand-in arguments
 * from the registry.
 *
 * Architecture:
 * - Domain: DriverProcedure, Section, CallStep, Diagnostic
 * - Application: DriverSynthesizer (discovery, argument synthesis,
 *   ordering), DriverExecutor (per-step isolated replay)
 * - Infrastructure: JavaHarnessEmitter (harness + stubs sources, JSON)
 * - Ports: CallDispatcher
 *
 * Usage:
 * ```text
 * let synth = DriverSynthesizer::new(HarnessConfig::default().build()?);
 * let procedure = synth.synthesize_facts(&FactsDocument::from_path("facts.yaml")?);
 * let java = JavaHarnessEmitter::new(synth.config().emit().clone()).emit_harness(&procedure);
 * ```
 */

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{DriverExecutor, DriverSynthesizer, ExecutionTrace};
pub use domain::{
    ArgBinding, CallOrigin, CallStep, Diagnostic, DriverProcedure, Section, SectionKind, Severity,
    StepId,
};
pub use infrastructure::JavaHarnessEmitter;
pub use ports::{CallDispatcher, DispatchFault};
