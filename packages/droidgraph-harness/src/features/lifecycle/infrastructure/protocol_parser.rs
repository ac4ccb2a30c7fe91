/*
 * Lifecycle Protocol Parser
 *
 * Parse custom lifecycle protocols from YAML/JSON. A custom protocol
 * replaces the built-in one for its component kind.
 *
 * # Schema
 * ```yaml
 * kind: activity
 * steps:
 *   - method: onCreate
 *     params: [android.os.Bundle]
 *     phase: create
 *   - method: onResume
 *     phase: active
 *   - method: onDestroy
 *     phase: teardown
 * chains:
 *   - [onCreate, onResume]
 * ```
 *
 * # Validation
 * - kind must name a component kind
 * - chains may only reference declared steps
 * - no duplicate steps, backward phase edges or cycles
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::facts::ComponentKind;
use crate::features::lifecycle::domain::{LifecycleProtocol, Phase};
use crate::shared::models::{MethodSignature, TypeName};

/// Protocol document (YAML/JSON schema)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolConfig {
    /// Component kind (`activity`, `support_fragment`, ...)
    pub kind: String,

    pub steps: Vec<StepConfig>,

    /// Happens-before chains by step name
    #[serde(default)]
    pub chains: Vec<Vec<String>>,
}

/// Step configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepConfig {
    pub method: String,

    #[serde(default)]
    pub params: Vec<String>,

    pub phase: Phase,
}

/// Parse error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolParseError {
    /// YAML/JSON syntax error
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Schema validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Ordering error (unknown chain step, cycle, backward phase edge)
    #[error("Semantic error: {0}")]
    Semantic(String),
}

/// Lifecycle protocol parser
pub struct LifecycleProtocolParser;

impl LifecycleProtocolParser {
    pub fn from_yaml(yaml: &str) -> Result<LifecycleProtocol, ProtocolParseError> {
        let config: ProtocolConfig = serde_yaml::from_str(yaml)
            .map_err(|e| ProtocolParseError::Syntax(format!("YAML parse error: {}", e)))?;
        Self::build(&config)
    }

    pub fn from_json(json: &str) -> Result<LifecycleProtocol, ProtocolParseError> {
        let config: ProtocolConfig = serde_json::from_str(json)
            .map_err(|e| ProtocolParseError::Syntax(format!("JSON parse error: {}", e)))?;
        Self::build(&config)
    }

    /// Build and validate a protocol from its configuration
    pub fn build(config: &ProtocolConfig) -> Result<LifecycleProtocol, ProtocolParseError> {
        let kind = ComponentKind::from_str(&config.kind).map_err(ProtocolParseError::Validation)?;
        let mut protocol = LifecycleProtocol::new(kind);

        for step in &config.steps {
            if step.method.trim().is_empty() {
                return Err(ProtocolParseError::Validation(format!(
                    "{} protocol has a step with an empty method name",
                    kind
                )));
            }
            let params = step.params.iter().map(TypeName::new).collect();
            protocol.add_step(step.phase, MethodSignature::new(step.method.trim(), params));
        }

        for chain in &config.chains {
            let names: Vec<&str> = chain.iter().map(String::as_str).collect();
            protocol.chain(&names).map_err(ProtocolParseError::Semantic)?;
        }

        protocol.validate().map_err(ProtocolParseError::Semantic)?;
        Ok(protocol)
    }

    /// Serialize a protocol back to the document form
    pub fn to_config(protocol: &LifecycleProtocol) -> ProtocolConfig {
        let steps = protocol.steps();
        ProtocolConfig {
            kind: protocol.kind.as_str().to_string(),
            steps: steps
                .iter()
                .map(|step| StepConfig {
                    method: step.method.name.clone(),
                    params: step.method.params.iter().map(|p| p.to_string()).collect(),
                    phase: step.phase,
                })
                .collect(),
            chains: protocol
                .edges()
                .iter()
                .map(|&(a, b)| vec![steps[a].method.name.clone(), steps[b].method.name.clone()])
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM_ACTIVITY: &str = r#"
kind: activity
steps:
  - method: onCreate
    params: [android.os.Bundle]
    phase: create
  - method: onDestroy
    phase: teardown
  - method: onResume
    phase: active
chains:
  - [onCreate, onResume]
"#;

    #[test]
    fn test_parse_yaml() {
        let protocol = LifecycleProtocolParser::from_yaml(CUSTOM_ACTIVITY).unwrap();
        assert_eq!(protocol.kind, ComponentKind::Activity);
        let order: Vec<_> = protocol
            .canonical_order()
            .iter()
            .map(|s| s.method.name.clone())
            .collect();
        assert_eq!(order, vec!["onCreate", "onResume", "onDestroy"]);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
          "kind": "broadcast_receiver",
          "steps": [{"method": "onReceive", "params": ["android.content.Context", "android.content.Intent"], "phase": "active"}]
        }"#;
        let protocol = LifecycleProtocolParser::from_json(json).unwrap();
        assert_eq!(protocol.steps()[0].method.arity(), 2);
    }

    #[test]
    fn test_unknown_kind() {
        let err = LifecycleProtocolParser::from_yaml("kind: widget\nsteps: []\n").unwrap_err();
        assert!(matches!(err, ProtocolParseError::Validation(_)));
    }

    #[test]
    fn test_unknown_chain_step() {
        let yaml = r#"
kind: service
steps:
  - method: onCreate
    phase: create
chains:
  - [onCreate, onBind]
"#;
        let err = LifecycleProtocolParser::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ProtocolParseError::Semantic(ref msg) if msg.contains("onBind")));
    }

    #[test]
    fn test_backward_chain_rejected() {
        let yaml = r#"
kind: service
steps:
  - method: onCreate
    phase: create
  - method: onDestroy
    phase: teardown
chains:
  - [onDestroy, onCreate]
"#;
        assert!(matches!(
            LifecycleProtocolParser::from_yaml(yaml),
            Err(ProtocolParseError::Semantic(_))
        ));
    }

    #[test]
    fn test_syntax_error() {
        let err = LifecycleProtocolParser::from_yaml("kind: [").unwrap_err();
        assert!(matches!(err, ProtocolParseError::Syntax(_)));
    }

    #[test]
    fn test_config_reparses_to_same_order() {
        let protocol = LifecycleProtocolParser::from_yaml(CUSTOM_ACTIVITY).unwrap();
        let config = LifecycleProtocolParser::to_config(&protocol);
        let rebuilt = LifecycleProtocolParser::build(&config).unwrap();
        assert_eq!(rebuilt, protocol);
    }
}
