//! Harness Configuration System
//!
//! Three levels, mirroring how the harness is driven:
//! - Level 1: Preset (`Minimal`, `Balanced`, `Exhaustive`)
//! - Level 2: Section override through closures
//! - Level 3: YAML file (schema v1)
//!
//! # Examples
//!
//! ```rust,ignore
//! use droidgraph_harness::config::{HarnessConfig, Preset, HandlerPolicy};
//!
//! let config = HarnessConfig::preset(Preset::Balanced).build()?;
//!
//! let config = HarnessConfig::preset(Preset::Balanced)
//!     .handlers(|c| c.policy(HandlerPolicy::Declared))
//!     .interleaving(|c| c.unordered_passes(3))
//!     .build()?;
//!
//! let config = HarnessConfig::from_yaml("harness.yaml")?;
//! ```

pub mod error;
pub mod harness_config;
pub mod io;
pub mod preset;
pub mod section_configs;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use harness_config::{HarnessConfig, ValidatedConfig};
pub use io::{ConfigOverrides, HarnessConfigExportV1};
pub use preset::Preset;
pub use section_configs::{
    CallbackPlacement, EmitConfig, FabricationConfig, HandlerConfig, HandlerPolicy,
    InstanceOrder, InterleavingConfig, LifecycleConfig, OrderingConfig,
};
