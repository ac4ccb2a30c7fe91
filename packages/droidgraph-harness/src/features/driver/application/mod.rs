//! Driver application layer

mod arguments;
mod discovery;
mod executor;
mod synthesizer;

pub use executor::{DriverExecutor, ExecutionTrace};
pub use synthesizer::DriverSynthesizer;
