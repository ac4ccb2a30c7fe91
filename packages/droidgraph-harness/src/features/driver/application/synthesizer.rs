/*
 * Driver Synthesizer
 *
 * Turns component declarations into one driver procedure:
 *
 *   allocate every component (registry)
 *   for each component, in instance order:
 *       lifecycle overrides in protocol order,
 *       callbacks interleaved per the placement policy
 *   unordered section: every callback again, `unordered_passes` times
 *
 * Synthesis never fails. Whatever cannot be fabricated or matched degrades
 * and is reported as a diagnostic on the procedure.
 */

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use super::arguments::ArgumentPlan;
use super::discovery::{binding_reaches, callback_targets, CallbackTarget};
use crate::config::{CallbackPlacement, InstanceOrder, ValidatedConfig};
use crate::features::callbacks::ListenerCatalog;
use crate::features::driver::domain::{
    CallOrigin, CallStep, Diagnostic, DriverProcedure, Section, SectionKind, StepId,
};
use crate::features::facts::{
    ComponentDeclaration, FactsDocument, HandlerBinding, IdentifierBinding, ParamBinding,
    ResourceFacts,
};
use crate::features::lifecycle::{Phase, PlacedOverride};
use crate::features::standin::{FrameworkCatalog, StandInRef, StandInRegistry};
use crate::shared::models::TypeName;

const UNORDERED_LABEL: &str = "callbacks";

/// Builds driver procedures from declared facts
#[derive(Debug, Clone)]
pub struct DriverSynthesizer {
    config: ValidatedConfig,
    listeners: ListenerCatalog,
}

impl DriverSynthesizer {
    pub fn new(config: ValidatedConfig) -> Self {
        Self {
            config,
            listeners: ListenerCatalog::android(),
        }
    }

    /// Replace the built-in listener catalog
    pub fn with_listener_catalog(mut self, listeners: ListenerCatalog) -> Self {
        self.listeners = listeners;
        self
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Android recipes plus the configured system services
    pub fn framework_catalog(&self) -> FrameworkCatalog {
        self.config
            .fabrication()
            .services
            .iter()
            .fold(FrameworkCatalog::android(), |catalog, (name, ty)| {
                catalog.with_service(name.as_str(), ty.as_str())
            })
    }

    /// Fresh registry over a declared identifier table
    pub fn registry_for(&self, identifiers: &[IdentifierBinding]) -> StandInRegistry {
        StandInRegistry::with_bindings(self.framework_catalog(), identifiers)
            .with_array_length(self.config.fabrication().array_length)
    }

    /// Synthesize from a loaded facts document
    ///
    /// Looked-up system services are allocated up front so the stubs can
    /// answer `getSystemService` for them.
    pub fn synthesize_facts(&self, facts: &FactsDocument) -> DriverProcedure {
        let resources = facts.resources();
        let mut registry = self.registry_for(&resources.identifiers);
        for name in &facts.services {
            registry.system_service(name);
        }
        let diagnostics = conflict_diagnostics(&resources);
        self.synthesize_with(&facts.components, &facts.handlers, registry, diagnostics)
    }

    /// Synthesize the driver; always produces a procedure
    pub fn synthesize(
        &self,
        components: &[ComponentDeclaration],
        handlers: &[HandlerBinding],
        registry: StandInRegistry,
    ) -> DriverProcedure {
        self.synthesize_with(components, handlers, registry, Vec::new())
    }

    fn synthesize_with(
        &self,
        components: &[ComponentDeclaration],
        handlers: &[HandlerBinding],
        registry: StandInRegistry,
        diagnostics: Vec<Diagnostic>,
    ) -> DriverProcedure {
        let mut builder = ProcedureBuilder {
            registry,
            diagnostics,
            next_step: 0,
            fanout: self.config.fabrication().max_argument_fanout,
        };

        let ordered = self.instance_order(components, &mut builder.diagnostics);
        self.report_unreached_handlers(&ordered, handlers, &mut builder.diagnostics);

        // Allocation: components first, then every declared view
        let receivers = builder.registry.register_components(ordered.iter().copied());
        for id in builder.registry.declared_identifiers() {
            builder.registry.resolve_declared(id, &TypeName::view());
        }
        builder.registry.unresolved(&TypeName::view());

        let mut sections = Vec::with_capacity(ordered.len() + 1);
        let mut unordered_targets: Vec<(&ComponentDeclaration, StandInRef, Vec<CallbackTarget>)> =
            Vec::new();

        for (decl, &receiver) in ordered.iter().zip(&receivers) {
            let targets = callback_targets(
                decl,
                handlers,
                self.config.handlers(),
                &self.listeners,
                &mut builder.diagnostics,
            );
            let placed = self.config.protocols().get(decl.kind).place(&decl.lifecycle);
            for unmatched in placed.iter().filter(|p| p.unmatched) {
                builder.diagnostics.push(Diagnostic::info(format!(
                    "{}.{} is not a {} lifecycle method; driven as active",
                    decl.name.simple_name(),
                    unmatched.method,
                    decl.kind
                )));
            }

            let steps = self.ordered_steps(&mut builder, decl, receiver, &placed, &targets);
            sections.push(Section {
                label: builder.registry.get(receiver).label.clone(),
                kind: SectionKind::Ordered,
                steps,
            });

            let mut reentered = targets;
            if self.config.interleaving().include_active_lifecycle {
                reentered.extend(
                    placed
                        .iter()
                        .filter(|p| p.phase == Phase::Active)
                        .map(|p| lifecycle_target(decl, p)),
                );
            }
            if !reentered.is_empty() {
                unordered_targets.push((*decl, receiver, reentered));
            }
        }

        let mut unordered = Vec::new();
        for (decl, receiver, targets) in &unordered_targets {
            for target in targets {
                unordered.extend(builder.calls(decl, *receiver, target));
            }
        }
        if !unordered.is_empty() {
            sections.push(Section {
                label: UNORDERED_LABEL.to_string(),
                kind: SectionKind::Unordered {
                    passes: self.config.interleaving().unordered_passes,
                },
                steps: unordered,
            });
        }

        let ProcedureBuilder {
            registry,
            mut diagnostics,
            ..
        } = builder;
        diagnostics.extend(
            registry
                .degradations()
                .iter()
                .map(|degradation| Diagnostic::info(degradation.to_string())),
        );

        let procedure =
            DriverProcedure::new(self.config.emit().entry_method.clone(), sections, diagnostics, registry);
        info!(
            "synthesized {}: {} components, {} steps, {} stand-ins, {} degradations",
            procedure.name(),
            receivers.len(),
            procedure.step_count(),
            procedure.allocations().len(),
            procedure.degradations().len()
        );
        procedure
    }

    /// Components in drive order, duplicates dropped
    fn instance_order<'a>(
        &self,
        components: &'a [ComponentDeclaration],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<&'a ComponentDeclaration> {
        let mut seen: FxHashSet<&TypeName> = FxHashSet::default();
        let mut ordered: Vec<&ComponentDeclaration> = Vec::with_capacity(components.len());
        for decl in components {
            if seen.insert(&decl.name) {
                ordered.push(decl);
            } else {
                warn!("duplicate component declaration {}", decl.name);
                diagnostics.push(Diagnostic::warning(format!(
                    "duplicate declaration of {} ignored",
                    decl.name
                )));
            }
        }

        if self.config.ordering().instance_order == InstanceOrder::KindRank {
            // Stable: ties keep declaration order
            ordered.sort_by_key(|decl| decl.kind.rank());
        }
        ordered
    }

    fn report_unreached_handlers(
        &self,
        components: &[&ComponentDeclaration],
        handlers: &[HandlerBinding],
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let policy = self.config.handlers().policy;
        for binding in handlers {
            let reached = components
                .iter()
                .any(|decl| binding_reaches(binding, decl, policy));
            if !reached {
                warn!(
                    "handler {} for identifier {} reaches no component",
                    binding.method, binding.identifier
                );
                diagnostics.push(Diagnostic::warning(format!(
                    "handler '{}' declared on identifier {} matches no component",
                    binding.method, binding.identifier
                )));
            }
        }
    }

    /// Lifecycle steps of one component with its callbacks interleaved
    fn ordered_steps(
        &self,
        builder: &mut ProcedureBuilder,
        decl: &ComponentDeclaration,
        receiver: StandInRef,
        placed: &[PlacedOverride],
        targets: &[CallbackTarget],
    ) -> Vec<CallStep> {
        let mut steps = Vec::new();
        let callbacks = |builder: &mut ProcedureBuilder, steps: &mut Vec<CallStep>| {
            for target in targets {
                steps.extend(builder.calls(decl, receiver, target));
            }
        };

        let before_teardown = placed.iter().any(|p| p.phase != Phase::Teardown);
        match self.config.ordering().callback_placement {
            CallbackPlacement::AfterEachStep if before_teardown => {
                for placed in placed {
                    steps.extend(builder.calls(decl, receiver, &lifecycle_target(decl, placed)));
                    if placed.phase != Phase::Teardown {
                        callbacks(builder, &mut steps);
                    }
                }
            }
            _ => {
                let mut done = false;
                for placed in placed {
                    if placed.phase == Phase::Teardown && !done {
                        callbacks(builder, &mut steps);
                        done = true;
                    }
                    steps.extend(builder.calls(decl, receiver, &lifecycle_target(decl, placed)));
                }
                if !done {
                    callbacks(builder, &mut steps);
                }
            }
        }
        debug!("{}: {} ordered steps", decl.name, steps.len());
        steps
    }
}

/// Mutable synthesis state
struct ProcedureBuilder {
    registry: StandInRegistry,
    diagnostics: Vec<Diagnostic>,
    next_step: usize,
    fanout: usize,
}

impl ProcedureBuilder {
    /// One step per argument tuple
    fn calls(
        &mut self,
        decl: &ComponentDeclaration,
        receiver: StandInRef,
        target: &CallbackTarget,
    ) -> Vec<CallStep> {
        let tuples = ArgumentPlan::new(&target.method)
            .view(target.view)
            .bindings(&target.bindings)
            .tuples(&mut self.registry, self.fanout, &mut self.diagnostics);

        tuples
            .into_iter()
            .map(|args| {
                let id = StepId::new(self.next_step);
                self.next_step += 1;
                CallStep {
                    id,
                    component: decl.name.clone(),
                    receiver,
                    method: target.method.clone(),
                    args,
                    origin: target.origin.clone(),
                }
            })
            .collect()
    }
}

fn lifecycle_target(decl: &ComponentDeclaration, placed: &PlacedOverride) -> CallbackTarget {
    let bindings: Vec<ParamBinding> = decl
        .bindings
        .iter()
        .filter(|binding| binding.applies_to(&placed.method))
        .cloned()
        .collect();
    CallbackTarget {
        method: placed.method.clone(),
        origin: CallOrigin::Lifecycle {
            phase: placed.phase,
        },
        view: None,
        bindings,
    }
}

fn conflict_diagnostics(resources: &ResourceFacts) -> Vec<Diagnostic> {
    resources
        .conflicts()
        .into_iter()
        .map(|conflict| {
            warn!(
                "identifier {} declared as {} and {}; keeping {}",
                conflict.id, conflict.kept, conflict.ignored, conflict.kept
            );
            Diagnostic::warning(format!(
                "identifier {} redeclared as {} (kept {})",
                conflict.id, conflict.ignored, conflict.kept
            ))
        })
        .collect()
}
