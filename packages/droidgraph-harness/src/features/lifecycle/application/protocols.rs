//! Protocol set: one lifecycle protocol per component kind

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::features::facts::ComponentKind;
use crate::features::lifecycle::domain::LifecycleProtocol;
use crate::features::lifecycle::infrastructure::built_in;

#[derive(Debug, Clone)]
pub struct ProtocolSet {
    protocols: FxHashMap<ComponentKind, LifecycleProtocol>,
}

impl ProtocolSet {
    /// Built-in protocols for every kind
    pub fn built_in() -> Self {
        let protocols = ComponentKind::ALL
            .iter()
            .map(|&kind| (kind, built_in(kind)))
            .collect();
        Self { protocols }
    }

    /// Replace the protocol for `protocol.kind`
    pub fn with_protocol(mut self, protocol: LifecycleProtocol) -> Self {
        self.insert(protocol);
        self
    }

    pub fn insert(&mut self, protocol: LifecycleProtocol) {
        debug!("custom lifecycle protocol for {}", protocol.kind);
        self.protocols.insert(protocol.kind, protocol);
    }

    pub fn get(&self, kind: ComponentKind) -> &LifecycleProtocol {
        // Every kind is populated by built_in()
        &self.protocols[&kind]
    }
}

impl Default for ProtocolSet {
    fn default() -> Self {
        Self::built_in()
    }
}
