//! Harness configuration
//!
//! Main configuration struct with preset-based defaults and override support.

use std::path::Path;

use tracing::debug;

use super::{
    error::{ConfigError, ConfigResult},
    io::{ConfigOverrides, HarnessConfigExportV1},
    preset::Preset,
    section_configs::*,
};
use crate::features::facts::ComponentKind;
use crate::features::lifecycle::{LifecycleProtocolParser, ProtocolSet};

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Harness configuration (builder)
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base preset
    pub(crate) preset: Preset,

    /// Section overrides
    pub(crate) ordering: Option<OrderingConfig>,
    pub(crate) interleaving: Option<InterleavingConfig>,
    pub(crate) handlers: Option<HandlerConfig>,
    pub(crate) fabrication: Option<FabricationConfig>,
    pub(crate) emit: Option<EmitConfig>,
    pub(crate) lifecycle: Option<LifecycleConfig>,
}

impl HarnessConfig {
    /// Level 1: Create from preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            ordering: None,
            interleaving: None,
            handlers: None,
            fabrication: None,
            emit: None,
            lifecycle: None,
        }
    }

    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    /// Level 2: Override ordering policies
    pub fn ordering<F>(mut self, f: F) -> Self
    where
        F: FnOnce(OrderingConfig) -> OrderingConfig,
    {
        let base = self
            .ordering
            .take()
            .unwrap_or_else(|| OrderingConfig::from_preset(self.preset));
        self.ordering = Some(f(base));
        self
    }

    /// Level 2: Override the unordered section
    pub fn interleaving<F>(mut self, f: F) -> Self
    where
        F: FnOnce(InterleavingConfig) -> InterleavingConfig,
    {
        let base = self
            .interleaving
            .take()
            .unwrap_or_else(|| InterleavingConfig::from_preset(self.preset));
        self.interleaving = Some(f(base));
        self
    }

    /// Level 2: Override handler discovery
    pub fn handlers<F>(mut self, f: F) -> Self
    where
        F: FnOnce(HandlerConfig) -> HandlerConfig,
    {
        let base = self
            .handlers
            .take()
            .unwrap_or_else(|| HandlerConfig::from_preset(self.preset));
        self.handlers = Some(f(base));
        self
    }

    /// Level 2: Override fabrication
    pub fn fabrication<F>(mut self, f: F) -> Self
    where
        F: FnOnce(FabricationConfig) -> FabricationConfig,
    {
        let base = self
            .fabrication
            .take()
            .unwrap_or_else(|| FabricationConfig::from_preset(self.preset));
        self.fabrication = Some(f(base));
        self
    }

    /// Level 2: Override emission
    pub fn emit<F>(mut self, f: F) -> Self
    where
        F: FnOnce(EmitConfig) -> EmitConfig,
    {
        let base = self
            .emit
            .take()
            .unwrap_or_else(|| EmitConfig::from_preset(self.preset));
        self.emit = Some(f(base));
        self
    }

    /// Level 2: Custom lifecycle protocols
    pub fn lifecycle<F>(mut self, f: F) -> Self
    where
        F: FnOnce(LifecycleConfig) -> LifecycleConfig,
    {
        let base = self
            .lifecycle
            .take()
            .unwrap_or_else(|| LifecycleConfig::from_preset(self.preset));
        self.lifecycle = Some(f(base));
        self
    }

    /// Build and validate
    pub fn build(self) -> ConfigResult<ValidatedConfig> {
        let ordering = self
            .ordering
            .clone()
            .unwrap_or_else(|| OrderingConfig::from_preset(self.preset));
        let interleaving = self
            .interleaving
            .clone()
            .unwrap_or_else(|| InterleavingConfig::from_preset(self.preset));
        let handlers = self
            .handlers
            .clone()
            .unwrap_or_else(|| HandlerConfig::from_preset(self.preset));
        let fabrication = self
            .fabrication
            .clone()
            .unwrap_or_else(|| FabricationConfig::from_preset(self.preset));
        let emit = self
            .emit
            .clone()
            .unwrap_or_else(|| EmitConfig::from_preset(self.preset));

        ordering.validate()?;
        interleaving.validate()?;
        handlers.validate()?;
        fabrication.validate()?;
        emit.validate()?;

        let protocols = self.build_protocols()?;

        Ok(ValidatedConfig {
            source: self,
            ordering,
            interleaving,
            handlers,
            fabrication,
            emit,
            protocols,
        })
    }

    /// Built-in protocols with the custom ones applied; one custom protocol per kind
    fn build_protocols(&self) -> ConfigResult<ProtocolSet> {
        let mut protocols = ProtocolSet::built_in();
        let Some(lifecycle) = &self.lifecycle else {
            return Ok(protocols);
        };

        let mut seen: Vec<ComponentKind> = Vec::new();
        for config in &lifecycle.protocols {
            let protocol = LifecycleProtocolParser::build(config)
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
            if seen.contains(&protocol.kind) {
                return Err(ConfigError::Validation(format!(
                    "more than one custom lifecycle protocol for {}",
                    protocol.kind
                )));
            }
            seen.push(protocol.kind);
            protocols.insert(protocol);
        }
        Ok(protocols)
    }

    /// Level 3: Load from a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<ValidatedConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!("loading harness config from {}", path.display());
        Self::from_yaml_str(&content)
    }

    /// Level 3: Load from YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<ValidatedConfig> {
        let export: HarnessConfigExportV1 = serde_yaml::from_str(content)?;

        // Version check
        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = Preset::from_str(&export.preset)
            .map_err(|_| ConfigError::UnknownPreset(export.preset.clone()))?;

        let mut config = Self::preset(preset);
        if let Some(overrides) = export.overrides {
            config.ordering = overrides.ordering;
            config.interleaving = overrides.interleaving;
            config.handlers = overrides.handlers;
            config.fabrication = overrides.fabrication;
            config.emit = overrides.emit;
            config.lifecycle = overrides.lifecycle;
        }

        config.build()
    }

    /// Export to YAML (schema v1)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = HarnessConfigExportV1 {
            version: Some(1),
            preset: self.preset.to_string(),
            overrides: Some(ConfigOverrides {
                ordering: self.ordering.clone(),
                interleaving: self.interleaving.clone(),
                handlers: self.handlers.clone(),
                fabrication: self.fabrication.clone(),
                emit: self.emit.clone(),
                lifecycle: self.lifecycle.clone(),
            }),
        };

        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

/// Validated configuration with every section resolved
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    source: HarnessConfig,
    ordering: OrderingConfig,
    interleaving: InterleavingConfig,
    handlers: HandlerConfig,
    fabrication: FabricationConfig,
    emit: EmitConfig,
    protocols: ProtocolSet,
}

impl ValidatedConfig {
    pub fn preset(&self) -> Preset {
        self.source.preset
    }

    pub fn ordering(&self) -> &OrderingConfig {
        &self.ordering
    }

    pub fn interleaving(&self) -> &InterleavingConfig {
        &self.interleaving
    }

    pub fn handlers(&self) -> &HandlerConfig {
        &self.handlers
    }

    pub fn fabrication(&self) -> &FabricationConfig {
        &self.fabrication
    }

    pub fn emit(&self) -> &EmitConfig {
        &self.emit
    }

    pub fn protocols(&self) -> &ProtocolSet {
        &self.protocols
    }

    /// Unwrap to the builder form
    pub fn into_inner(self) -> HarnessConfig {
        self.source
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        self.source.to_yaml()
    }

    /// Human-readable summary
    pub fn describe(&self) -> String {
        format!(
            "{} (order={:?}, callbacks={:?}, passes={}, handlers={:?}, fanout={})",
            self.source.preset,
            self.ordering.instance_order,
            self.ordering.callback_placement,
            self.interleaving.unordered_passes,
            self.handlers.policy,
            self.fabrication.max_argument_fanout
        )
    }
}

impl Default for ValidatedConfig {
    fn default() -> Self {
        let preset = Preset::default();
        Self {
            source: HarnessConfig::preset(preset),
            ordering: OrderingConfig::from_preset(preset),
            interleaving: InterleavingConfig::from_preset(preset),
            handlers: HandlerConfig::from_preset(preset),
            fabrication: FabricationConfig::from_preset(preset),
            emit: EmitConfig::from_preset(preset),
            protocols: ProtocolSet::built_in(),
        }
    }
}
