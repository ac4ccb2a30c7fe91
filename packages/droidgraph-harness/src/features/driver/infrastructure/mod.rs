//! Driver infrastructure: artifact emitters

pub mod java_emitter;

pub use java_emitter::JavaHarnessEmitter;
