//! Preset configurations
//!
//! Presets provide complete default configurations for common use cases.

use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Smallest sound driver
    ///
    /// - Callbacks: once per component, before teardown
    /// - Unordered section: 1 pass, no lifecycle re-entry
    /// - Handlers: declared bindings only
    /// - Argument fan-out: 1
    Minimal,

    /// Default
    ///
    /// - Callbacks: after every create/active lifecycle step
    /// - Unordered section: 1 pass
    /// - Handlers: unscoped bindings reach every component declaring the name
    /// - Argument fan-out: 4
    Balanced,

    /// Maximal over-approximation
    ///
    /// - Callbacks: after every create/active lifecycle step
    /// - Unordered section: 2 passes including active-phase lifecycle methods
    /// - Handlers: by name
    /// - Argument fan-out: 16
    Exhaustive,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "balanced" => Ok(Self::Balanced),
            "exhaustive" => Ok(Self::Exhaustive),
            _ => Err(format!(
                "Unknown preset '{}'. Valid presets: minimal, balanced, exhaustive",
                s
            )),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Balanced => "balanced",
            Self::Exhaustive => "exhaustive",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Balanced
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
