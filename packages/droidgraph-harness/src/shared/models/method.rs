//! Method signatures

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TypeName;

/// Method name plus ordered parameter types
///
/// Two signatures denote the same override iff name and parameters are equal;
/// the return type is carried for emission only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,

    #[serde(default)]
    pub params: Vec<TypeName>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<TypeName>,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, params: Vec<TypeName>) -> Self {
        Self {
            name: name.into(),
            params,
            returns: None,
        }
    }

    /// Parameterless method
    pub fn nullary(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Build from string parameter types
    pub fn of(name: impl Into<String>, params: &[&str]) -> Self {
        Self::new(name, params.iter().map(|p| TypeName::new(*p)).collect())
    }

    pub fn with_return(mut self, returns: impl Into<TypeName>) -> Self {
        self.returns = Some(returns.into());
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Same name and parameter list
    pub fn matches(&self, other: &MethodSignature) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl PartialEq for MethodSignature {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for MethodSignature {}

impl std::hash::Hash for MethodSignature {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.params.hash(state);
    }
}

impl PartialOrd for MethodSignature {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MethodSignature {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&self.name, &self.params).cmp(&(&other.name, &other.params))
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(|p| p.as_str()).collect();
        write!(f, "{}({})", self.name, params.join(","))
    }
}
