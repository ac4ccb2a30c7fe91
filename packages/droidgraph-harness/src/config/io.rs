//! Configuration I/O (YAML schema)
//!
//! Defines YAML schema types. Loading and export live in harness_config.rs.

use super::section_configs::*;
use serde::{Deserialize, Serialize};

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfigExportV1 {
    /// Schema version (always 1 for v1); missing is reported explicitly
    #[serde(default)]
    pub version: Option<u32>,

    /// Base preset
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Fine-grained overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

fn default_preset() -> String {
    "balanced".to_string()
}

/// Configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering: Option<OrderingConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interleaving: Option<InterleavingConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handlers: Option<HandlerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fabrication: Option<FabricationConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emit: Option<EmitConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<LifecycleConfig>,
}
