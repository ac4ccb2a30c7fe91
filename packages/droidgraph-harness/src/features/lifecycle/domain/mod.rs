mod protocol;

pub use protocol::{LifecycleProtocol, LifecycleStep, Phase, PlacedOverride};
