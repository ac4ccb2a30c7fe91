/*
 * Facts Document Loader
 *
 * Parse the facts hand-off document from YAML/JSON.
 *
 * # Schema
 * ```yaml
 * version: 1
 * app: com.test.viewlookup
 * identifiers:
 *   - id: 2131034112
 *     declared_type: android.view.SurfaceView
 *     name: mySurfaceView
 * services: [account]
 * handlers:
 *   - component: com.test.hoisttest2.MainActivity
 *     method: myOnClick
 *     identifier: 2131034113
 * components:
 *   - name: com.test.viewlookup.MainActivity
 *     kind: activity
 *     lifecycle:
 *       - name: onCreate
 *         params: [android.os.Bundle]
 * ```
 *
 * # Validation
 * - version must be 1
 * - component names unique and non-empty
 * - handler, method and service names non-empty
 * Identifier type conflicts are tolerated (first declaration wins).
 */

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::features::facts::domain::{ComponentDeclaration, HandlerBinding, IdentifierBinding, ResourceFacts};

/// Supported facts schema versions
const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Facts document rejection
#[derive(Debug, Error)]
pub enum FactsError {
    /// YAML/JSON syntax error
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Unsupported facts version {found}. Supported versions: 1")]
    UnsupportedVersion { found: u32 },

    #[error("Duplicate component declaration '{0}'")]
    DuplicateComponent(String),

    /// Schema-level validation error
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Facts hand-off document (schema v1)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactsDocument {
    pub version: u32,

    /// Application package (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,

    #[serde(default)]
    pub components: Vec<ComponentDeclaration>,

    #[serde(default)]
    pub identifiers: Vec<IdentifierBinding>,

    #[serde(default)]
    pub handlers: Vec<HandlerBinding>,

    /// `getSystemService` names the app looks up
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
}

impl FactsDocument {
    /// Empty v1 document
    pub fn new() -> Self {
        Self {
            version: 1,
            app: None,
            components: Vec::new(),
            identifiers: Vec::new(),
            handlers: Vec::new(),
            services: Vec::new(),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, FactsError> {
        let doc: FactsDocument = serde_yaml::from_str(yaml)
            .map_err(|e| FactsError::Syntax(format!("YAML parse error: {}", e)))?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn from_json(json: &str) -> Result<Self, FactsError> {
        let doc: FactsDocument = serde_json::from_str(json)
            .map_err(|e| FactsError::Syntax(format!("JSON parse error: {}", e)))?;
        doc.validate()?;
        Ok(doc)
    }

    /// Load from a file; `.json` is parsed as JSON, everything else as YAML
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FactsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    pub fn to_yaml(&self) -> Result<String, FactsError> {
        serde_yaml::to_string(self).map_err(|e| FactsError::Syntax(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), FactsError> {
        if !SUPPORTED_VERSIONS.contains(&self.version) {
            return Err(FactsError::UnsupportedVersion {
                found: self.version,
            });
        }

        let mut seen = HashSet::new();
        for component in &self.components {
            if component.name.as_str().is_empty() {
                return Err(FactsError::Validation(
                    "component with empty name".to_string(),
                ));
            }
            if !seen.insert(component.name.clone()) {
                return Err(FactsError::DuplicateComponent(
                    component.name.to_string(),
                ));
            }

            let methods = component
                .lifecycle
                .iter()
                .chain(component.methods.iter())
                .chain(component.listeners.iter().flat_map(|l| l.methods.iter()));
            for method in methods {
                if method.name.is_empty() {
                    return Err(FactsError::Validation(format!(
                        "component '{}' declares a method with an empty name",
                        component.name
                    )));
                }
            }

            if component.handlers.iter().any(|h| h.is_empty()) {
                return Err(FactsError::Validation(format!(
                    "component '{}' declares an empty handler name",
                    component.name
                )));
            }
        }

        if self.services.iter().any(|name| name.is_empty()) {
            return Err(FactsError::Validation(
                "empty system service name".to_string(),
            ));
        }

        if let Some(binding) = self.handlers.iter().find(|b| b.method.is_empty()) {
            return Err(FactsError::Validation(format!(
                "handler binding for identifier {} has an empty method name",
                binding.identifier
            )));
        }

        Ok(())
    }

    /// Identifier table and handler bindings
    pub fn resources(&self) -> ResourceFacts {
        ResourceFacts {
            identifiers: self.identifiers.clone(),
            handlers: self.handlers.clone(),
        }
    }
}

impl Default for FactsDocument {
    fn default() -> Self {
        Self::new()
    }
}
