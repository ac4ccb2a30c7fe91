/*
 * Lifecycle Infrastructure
 *
 * Built-in protocol definitions and parsers.
 */

mod built_in;
mod protocol_parser;

pub use built_in::{
    built_in, ActivityLifecycle, ApplicationLifecycle, FragmentLifecycle, ProviderLifecycle,
    ReceiverLifecycle, ServiceLifecycle,
};
pub use protocol_parser::{LifecycleProtocolParser, ProtocolConfig, ProtocolParseError, StepConfig};
