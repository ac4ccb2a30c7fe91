//! Callback target discovery
//!
//! A component method is a callback target when it implements a method of a
//! listener interface the component declares, or when an external handler
//! binding names it. Lifecycle overrides are placed separately by the
//! component's lifecycle protocol.

use tracing::warn;

use crate::config::{HandlerConfig, HandlerPolicy};
use crate::features::callbacks::ListenerCatalog;
use crate::features::driver::domain::{CallOrigin, Diagnostic};
use crate::features::facts::{ComponentDeclaration, HandlerBinding, ParamBinding};
use crate::shared::models::{MethodSignature, ResourceId, TypeName};

/// A listener or handler method to drive
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CallbackTarget {
    pub method: MethodSignature,
    pub origin: CallOrigin,
    /// Identifier whose view is passed to the view parameter
    pub view: Option<ResourceId>,
    pub bindings: Vec<ParamBinding>,
}

/// Whether an externally declared handler binding reaches `component`
pub(crate) fn binding_reaches(
    binding: &HandlerBinding,
    component: &ComponentDeclaration,
    policy: HandlerPolicy,
) -> bool {
    match &binding.component {
        Some(name) => name == &component.name,
        None => match policy {
            HandlerPolicy::Declared => component.handlers.iter().any(|h| h == &binding.method),
            HandlerPolicy::ByName => component.declares_method(&binding.method),
        },
    }
}

/// Signature of a handler: the declared method of that name, else `name(View)`
pub(crate) fn handler_signature(component: &ComponentDeclaration, name: &str) -> MethodSignature {
    component
        .methods_named(name)
        .next()
        .cloned()
        .unwrap_or_else(|| MethodSignature::new(name, vec![TypeName::view()]))
}

/// Listener and handler targets of one component, without duplicates
pub(crate) fn callback_targets(
    component: &ComponentDeclaration,
    handlers: &[HandlerBinding],
    config: &HandlerConfig,
    listeners: &ListenerCatalog,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<CallbackTarget> {
    let mut targets: Vec<CallbackTarget> = Vec::new();
    let mut push = |target: CallbackTarget| {
        let duplicate = targets
            .iter()
            .any(|t| t.method == target.method && t.view == target.view);
        if !duplicate {
            targets.push(target);
        }
    };

    for listener in &component.listeners {
        let methods: Vec<MethodSignature> = if listener.methods.is_empty() && config.expand_listener_catalog {
            listeners.methods_of(&listener.interface).to_vec()
        } else {
            listener.methods.clone()
        };

        if methods.is_empty() {
            warn!(
                "{} implements {} with no known methods",
                component.name, listener.interface
            );
            diagnostics.push(Diagnostic::warning(format!(
                "{} implements {} but no methods are known for it",
                component.name, listener.interface
            )));
            continue;
        }

        let views: Vec<Option<ResourceId>> = if listener.registered_on.is_empty() {
            vec![None]
        } else {
            listener.registered_on.iter().copied().map(Some).collect()
        };

        for method in &methods {
            for &view in &views {
                push(CallbackTarget {
                    method: method.clone(),
                    origin: CallOrigin::Listener {
                        interface: listener.interface.clone(),
                        identifier: view,
                    },
                    view,
                    bindings: listener
                        .bindings
                        .iter()
                        .chain(component.bindings.iter())
                        .cloned()
                        .collect(),
                });
            }
        }
    }

    let mut bound_names: Vec<&str> = Vec::new();
    for binding in handlers {
        if !binding_reaches(binding, component, config.policy) {
            continue;
        }
        bound_names.push(&binding.method);
        push(CallbackTarget {
            method: handler_signature(component, &binding.method),
            origin: CallOrigin::Handler {
                identifier: Some(binding.identifier),
            },
            view: Some(binding.identifier),
            bindings: component.bindings.clone(),
        });
    }

    // Handler names declared without an identifier binding still run
    for name in &component.handlers {
        if bound_names.contains(&name.as_str()) {
            continue;
        }
        push(CallbackTarget {
            method: handler_signature(component, name),
            origin: CallOrigin::Handler { identifier: None },
            view: None,
            bindings: component.bindings.clone(),
        });
    }

    targets
}
