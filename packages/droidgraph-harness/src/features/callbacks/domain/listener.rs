use serde::{Deserialize, Serialize};

use crate::shared::models::{MethodSignature, TypeName};

/// A framework callback interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerInterface {
    pub name: TypeName,
    pub methods: Vec<MethodSignature>,
}

impl ListenerInterface {
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, name: &str, params: &[&str]) -> Self {
        self.methods.push(MethodSignature::of(name, params));
        self
    }
}
