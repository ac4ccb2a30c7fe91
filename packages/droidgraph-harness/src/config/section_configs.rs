//! Section configurations
//!
//! One struct per tunable concern of the synthesizer. Every section has a
//! preset baseline (`from_preset`), chainable setters and a `validate()`
//! range check. Fields omitted in YAML take the balanced defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use crate::features::lifecycle::infrastructure::ProtocolConfig;

// ═══════════════════════════════════════════════════════════════════════════
// Policies
// ═══════════════════════════════════════════════════════════════════════════

/// Order in which component instances are driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceOrder {
    /// Declaration order of the facts document
    Declared,
    /// Application, providers, activities, fragments, services, receivers,
    /// plain listeners; ties by declaration order
    KindRank,
}

/// Where a component's callbacks run inside its ordered lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackPlacement {
    /// After every create/active lifecycle step
    AfterEachStep,
    /// Once, after the last create/active step
    BeforeTeardown,
}

/// Which components an unscoped handler binding reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerPolicy {
    /// Only components listing the handler name
    Declared,
    /// Every component declaring a method or handler of that name
    ByName,
}

// ═══════════════════════════════════════════════════════════════════════════
// Sections
// ═══════════════════════════════════════════════════════════════════════════

/// Instance and callback ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderingConfig {
    pub instance_order: InstanceOrder,
    pub callback_placement: CallbackPlacement,
}

impl OrderingConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Minimal => Self {
                instance_order: InstanceOrder::KindRank,
                callback_placement: CallbackPlacement::BeforeTeardown,
            },
            Preset::Balanced | Preset::Exhaustive => Self {
                instance_order: InstanceOrder::KindRank,
                callback_placement: CallbackPlacement::AfterEachStep,
            },
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }

    pub fn instance_order(mut self, v: InstanceOrder) -> Self {
        self.instance_order = v;
        self
    }

    pub fn callback_placement(mut self, v: CallbackPlacement) -> Self {
        self.callback_placement = v;
        self
    }
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

/// Unordered callback section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterleavingConfig {
    /// Repetitions of the unordered section (1..=16)
    pub unordered_passes: usize,

    /// Also re-enter active-phase lifecycle methods in the unordered section
    pub include_active_lifecycle: bool,
}

impl InterleavingConfig {
    pub const MAX_PASSES: usize = 16;

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Minimal | Preset::Balanced => Self {
                unordered_passes: 1,
                include_active_lifecycle: false,
            },
            Preset::Exhaustive => Self {
                unordered_passes: 2,
                include_active_lifecycle: true,
            },
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.unordered_passes == 0 || self.unordered_passes > Self::MAX_PASSES {
            return Err(ConfigError::range_with_hint(
                "unordered_passes",
                self.unordered_passes,
                1,
                Self::MAX_PASSES,
                "At least one unordered pass is required to expose every callback",
            ));
        }
        Ok(())
    }

    pub fn unordered_passes(mut self, v: usize) -> Self {
        self.unordered_passes = v;
        self
    }

    pub fn include_active_lifecycle(mut self, v: bool) -> Self {
        self.include_active_lifecycle = v;
        self
    }
}

impl Default for InterleavingConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

/// Handler and listener discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandlerConfig {
    pub policy: HandlerPolicy,

    /// Expand listener declarations without methods from the listener catalog
    pub expand_listener_catalog: bool,
}

impl HandlerConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Minimal => Self {
                policy: HandlerPolicy::Declared,
                expand_listener_catalog: true,
            },
            Preset::Balanced | Preset::Exhaustive => Self {
                policy: HandlerPolicy::ByName,
                expand_listener_catalog: true,
            },
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }

    pub fn policy(mut self, v: HandlerPolicy) -> Self {
        self.policy = v;
        self
    }

    pub fn expand_listener_catalog(mut self, v: bool) -> Self {
        self.expand_listener_catalog = v;
        self
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

/// Stand-in fabrication and argument synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FabricationConfig {
    /// Length of fabricated arrays (1..=64)
    pub array_length: usize,

    /// Maximum component instances one parameter fans out to (1..=32)
    pub max_argument_fanout: usize,

    /// Extra `getSystemService` names → service type
    pub services: BTreeMap<String, String>,
}

impl FabricationConfig {
    pub const MAX_ARRAY_LENGTH: usize = 64;
    pub const MAX_FANOUT: usize = 32;

    pub fn from_preset(preset: Preset) -> Self {
        let max_argument_fanout = match preset {
            Preset::Minimal => 1,
            Preset::Balanced => 4,
            Preset::Exhaustive => 16,
        };
        Self {
            array_length: 1,
            max_argument_fanout,
            services: BTreeMap::new(),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.array_length == 0 || self.array_length > Self::MAX_ARRAY_LENGTH {
            return Err(ConfigError::range_with_hint(
                "array_length",
                self.array_length,
                1,
                Self::MAX_ARRAY_LENGTH,
                "Arrays need at least one element so element reads are reachable",
            ));
        }
        if self.max_argument_fanout == 0 || self.max_argument_fanout > Self::MAX_FANOUT {
            return Err(ConfigError::range_with_hint(
                "max_argument_fanout",
                self.max_argument_fanout,
                1,
                Self::MAX_FANOUT,
                "Each parameter needs at least one argument",
            ));
        }
        if let Some((name, _)) = self.services.iter().find(|(n, t)| n.is_empty() || t.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "service mapping '{}' needs a non-empty name and type",
                name
            )));
        }
        Ok(())
    }

    pub fn array_length(mut self, v: usize) -> Self {
        self.array_length = v;
        self
    }

    pub fn max_argument_fanout(mut self, v: usize) -> Self {
        self.max_argument_fanout = v;
        self
    }

    pub fn service(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.services.insert(name.into(), ty.into());
        self
    }
}

impl Default for FabricationConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

/// Java source emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitConfig {
    /// Fully-qualified harness class
    pub harness_class: String,

    /// Fully-qualified stubs class
    pub stubs_class: String,

    /// Static entry method of the harness class
    pub entry_method: String,
}

impl EmitConfig {
    pub fn from_preset(_preset: Preset) -> Self {
        Self {
            harness_class: "generatedHarness.GeneratedAndroidHarness".to_string(),
            stubs_class: "stubs.GeneratedAndroidStubs".to_string(),
            entry_method: "androidMain".to_string(),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("harness_class", &self.harness_class),
            ("stubs_class", &self.stubs_class),
        ] {
            if value.is_empty() || !value.split('.').all(is_java_identifier) {
                return Err(ConfigError::Validation(format!(
                    "{} '{}' is not a qualified Java class name",
                    field, value
                )));
            }
        }
        if !is_java_identifier(&self.entry_method) {
            return Err(ConfigError::Validation(format!(
                "entry_method '{}' is not a Java identifier",
                self.entry_method
            )));
        }
        if self.harness_class == self.stubs_class {
            return Err(ConfigError::Validation(
                "harness_class and stubs_class must differ".to_string(),
            ));
        }
        Ok(())
    }

    pub fn harness_class(mut self, v: impl Into<String>) -> Self {
        self.harness_class = v.into();
        self
    }

    pub fn stubs_class(mut self, v: impl Into<String>) -> Self {
        self.stubs_class = v.into();
        self
    }

    pub fn entry_method(mut self, v: impl Into<String>) -> Self {
        self.entry_method = v.into();
        self
    }
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

/// Custom lifecycle protocols replacing the built-ins per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifecycleConfig {
    pub protocols: Vec<ProtocolConfig>,
}

impl LifecycleConfig {
    pub fn from_preset(_preset: Preset) -> Self {
        Self::default()
    }

    pub fn protocol(mut self, protocol: ProtocolConfig) -> Self {
        self.protocols.push(protocol);
        self
    }
}

fn is_java_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
