//! Argument synthesis
//!
//! Every parameter of a synthesized call is bound from the registry, in
//! priority order:
//! 1. an explicit `ParamBinding` (identifier, getter chain or component)
//! 2. the view identifier of a listener registration or handler binding,
//!    passed to the first view-typed parameter
//! 3. by declared type: values for primitives/strings/arrays, every
//!    assignable component instance, else `ambient(type)`
//!
//! A parameter with several candidates fans the call out; the cartesian
//! product is capped at `max_argument_fanout` tuples.

use tracing::debug;

use crate::features::driver::domain::{ArgBinding, Diagnostic};
use crate::features::facts::{ArgumentSource, ParamBinding};
use crate::features::standin::{StandInRef, StandInRegistry};
use crate::shared::models::{MethodSignature, ResourceId, TypeName};

/// Argument tuples for one call target
pub(crate) struct ArgumentPlan<'a> {
    pub method: &'a MethodSignature,
    pub view: Option<ResourceId>,
    pub bindings: &'a [ParamBinding],
}

impl<'a> ArgumentPlan<'a> {
    pub fn new(method: &'a MethodSignature) -> Self {
        Self {
            method,
            view: None,
            bindings: &[],
        }
    }

    pub fn view(mut self, view: Option<ResourceId>) -> Self {
        self.view = view;
        self
    }

    pub fn bindings(mut self, bindings: &'a [ParamBinding]) -> Self {
        self.bindings = bindings;
        self
    }

    /// Parameter receiving the registered view
    fn view_slot(&self, registry: &StandInRegistry) -> Option<usize> {
        self.view?;
        let params = &self.method.params;
        params
            .iter()
            .position(|p| registry.catalog().is_view_type(p))
            .or_else(|| params.iter().position(|p| !p.is_value_type() && !p.is_array()))
    }

    /// At least one tuple; at most `fanout`
    pub fn tuples(
        &self,
        registry: &mut StandInRegistry,
        fanout: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<Vec<ArgBinding>> {
        let fanout = fanout.max(1);
        let view_slot = self.view_slot(registry);

        let candidates: Vec<Vec<StandInRef>> = self
            .method
            .params
            .iter()
            .enumerate()
            .map(|(index, param)| self.candidates(index, param, view_slot, registry, fanout, diagnostics))
            .collect();

        let mut tuples: Vec<Vec<ArgBinding>> = vec![Vec::new()];
        let mut truncated = false;
        for (param, options) in self.method.params.iter().zip(candidates) {
            let mut next = Vec::with_capacity(tuples.len() * options.len());
            'product: for prefix in &tuples {
                for &value in &options {
                    if next.len() == fanout {
                        truncated = true;
                        break 'product;
                    }
                    let mut tuple = prefix.clone();
                    tuple.push(ArgBinding {
                        param: param.clone(),
                        value,
                    });
                    next.push(tuple);
                }
            }
            tuples = next;
        }

        if truncated {
            diagnostics.push(Diagnostic::info(format!(
                "argument tuples for {} capped at {}",
                self.method, fanout
            )));
        }
        tuples
    }

    fn candidates(
        &self,
        index: usize,
        param: &TypeName,
        view_slot: Option<usize>,
        registry: &mut StandInRegistry,
        fanout: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<StandInRef> {
        let explicit = self
            .bindings
            .iter()
            .find(|binding| binding.index == index && binding.applies_to(self.method));
        if let Some(binding) = explicit {
            return vec![bound_value(registry, &binding.source, param)];
        }

        if let (Some(slot), Some(id)) = (view_slot, self.view) {
            if slot == index {
                let view = registry.resolve_declared(id, param);
                if !registry.get(view).is_component() {
                    return vec![view];
                }
                diagnostics.push(Diagnostic::warning(format!(
                    "identifier {} registered for {} denotes component {}; bound by type",
                    id,
                    self.method,
                    registry.get(view).type_name
                )));
            }
        }

        if param.is_value_type() || param.is_array() {
            return vec![registry.value(param)];
        }

        let mut components = registry.components_assignable_to(param);
        if components.is_empty() {
            return vec![registry.ambient(param)];
        }
        if components.len() > fanout {
            debug!(
                "{} components assignable to {}, keeping {}",
                components.len(),
                param,
                fanout
            );
            diagnostics.push(Diagnostic::info(format!(
                "parameter {} of {} fans out to {} components, capped at {}",
                index,
                self.method,
                components.len(),
                fanout
            )));
            components.truncate(fanout);
        }
        components
    }
}

/// Stand-in an explicit parameter binding denotes
pub(crate) fn bound_value(
    registry: &mut StandInRegistry,
    source: &ArgumentSource,
    param: &TypeName,
) -> StandInRef {
    match source {
        ArgumentSource::Identifier { id } => registry.resolve_declared(*id, param),
        ArgumentSource::Accessor { id, chain } => {
            let view = registry.resolve_declared(*id, &TypeName::view());
            registry.derive_chain(view, chain)
        }
        ArgumentSource::Component { class } => registry
            .component(class)
            .unwrap_or_else(|| registry.ambient(class)),
    }
}
