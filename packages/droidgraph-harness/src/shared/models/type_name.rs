//! Fully-qualified type names

use serde::{Deserialize, Serialize};
use std::fmt;

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

const BOXED: &[&str] = &[
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Character",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Float",
    "java.lang.Double",
];

/// Fully-qualified type name in Java source form
///
/// Nested types use `.` (`android.view.View.OnClickListener`); a binary name
/// with `$` is accepted and normalized on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Create a type name
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self(name.trim().replace('$', "."))
    }

    /// `java.lang.Object`
    pub fn object() -> Self {
        Self::new("java.lang.Object")
    }

    /// `android.view.View`
    pub fn view() -> Self {
        Self::new("android.view.View")
    }

    /// `android.content.Context`
    pub fn context() -> Self {
        Self::new("android.content.Context")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unqualified name (`SurfaceView` for `android.view.SurfaceView`)
    pub fn simple_name(&self) -> &str {
        let base = self.0.trim_end_matches("[]");
        base.rsplit('.').next().unwrap_or(base)
    }

    /// Package part, empty for primitives and default-package types
    pub fn package(&self) -> &str {
        let base = self.0.trim_end_matches("[]");
        match base.rfind('.') {
            Some(idx) => &base[..idx],
            None => "",
        }
    }

    pub fn is_primitive(&self) -> bool {
        PRIMITIVES.contains(&self.0.as_str())
    }

    pub fn is_boxed(&self) -> bool {
        BOXED.contains(&self.0.as_str())
    }

    pub fn is_void(&self) -> bool {
        self.0 == "void"
    }

    pub fn is_string(&self) -> bool {
        self.0 == "java.lang.String" || self.0 == "String"
    }

    pub fn is_array(&self) -> bool {
        self.0.ends_with("[]")
    }

    /// Element type of an array type (`byte` for `byte[]`)
    pub fn element_type(&self) -> Option<TypeName> {
        self.0
            .strip_suffix("[]")
            .map(|element| TypeName(element.to_string()))
    }

    /// Values that have no identity: primitives, boxes and strings
    pub fn is_value_type(&self) -> bool {
        self.is_primitive() || self.is_boxed() || self.is_string()
    }

    /// Whether the name lives in a framework namespace rather than the app
    pub fn is_framework(&self) -> bool {
        ["android.", "androidx.", "java.", "javax."]
            .iter()
            .any(|prefix| self.0.starts_with(prefix))
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
