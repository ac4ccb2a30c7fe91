/*
 * Resource Facts
 *
 * Identifier bindings harvested from layout declarations and handler
 * bindings harvested from manifest/XML attributes.
 */

use serde::{Deserialize, Serialize};

use crate::shared::models::{ResourceId, TypeName};

/// Declared (identifier, static type) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierBinding {
    pub id: ResourceId,

    pub declared_type: TypeName,

    /// Symbolic resource name (`mySurfaceView`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Declaring layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl IdentifierBinding {
    pub fn new(id: ResourceId, declared_type: impl Into<TypeName>) -> Self {
        Self {
            id,
            declared_type: declared_type.into(),
            name: None,
            scope: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn in_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

/// Externally declared handler for a view identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandlerBinding {
    /// Receiving component; `None` for unscoped XML attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<TypeName>,

    /// Handler method name
    pub method: String,

    /// View the handler is declared on
    pub identifier: ResourceId,
}

impl HandlerBinding {
    pub fn new(method: impl Into<String>, identifier: ResourceId) -> Self {
        Self {
            component: None,
            method: method.into(),
            identifier,
        }
    }

    pub fn on_component(mut self, component: impl Into<TypeName>) -> Self {
        self.component = Some(component.into());
        self
    }
}

/// An identifier declared with different types in different scopes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierConflict {
    pub id: ResourceId,
    pub kept: TypeName,
    pub ignored: TypeName,
}

/// Resource and manifest facts consumed by the registry and synthesizer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFacts {
    #[serde(default)]
    pub identifiers: Vec<IdentifierBinding>,

    #[serde(default)]
    pub handlers: Vec<HandlerBinding>,
}

impl ResourceFacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identifier(mut self, binding: IdentifierBinding) -> Self {
        self.identifiers.push(binding);
        self
    }

    pub fn with_handler(mut self, binding: HandlerBinding) -> Self {
        self.handlers.push(binding);
        self
    }

    /// First declared type for `id`
    pub fn declared_type(&self, id: ResourceId) -> Option<&TypeName> {
        self.identifiers
            .iter()
            .find(|binding| binding.id == id)
            .map(|binding| &binding.declared_type)
    }

    /// Identifiers redeclared with a different type (first declaration wins)
    pub fn conflicts(&self) -> Vec<IdentifierConflict> {
        let mut conflicts = Vec::new();
        for (idx, binding) in self.identifiers.iter().enumerate() {
            let first = self.identifiers[..idx]
                .iter()
                .find(|earlier| earlier.id == binding.id);
            if let Some(first) = first {
                if first.declared_type != binding.declared_type {
                    conflicts.push(IdentifierConflict {
                        id: binding.id,
                        kept: first.declared_type.clone(),
                        ignored: binding.declared_type.clone(),
                    });
                }
            }
        }
        conflicts
    }
}
