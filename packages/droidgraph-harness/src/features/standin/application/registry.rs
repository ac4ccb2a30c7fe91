//! Stand-in Registry
//!
//! Owns every fabricated framework object and memoizes it by the key the app
//! would use to obtain it:
//! - resource identifier (`findViewById(R.id.x)`)
//! - type (services, hardware handles, contexts)
//! - component class
//! - (parent, getter) for derived values
//!
//! At most one stand-in exists per key within one registry lifetime. Code
//! comparing two separately obtained references to "the same view" must see
//! identical handles, otherwise alias-sensitive branches are mis-analyzed.
//!
//! The arena is append-only and every stand-in is pushed after its
//! dependencies, so arena order is a valid hoisted allocation order.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::features::facts::{AccessorStep, ComponentDeclaration, IdentifierBinding};
use crate::features::standin::domain::{
    Construction, Degradation, DegradationReason, StandIn, StandInOrigin, StandInRef,
};
use crate::features::standin::infrastructure::catalog::{FrameworkCatalog, ParamSource, Recipe};
use crate::shared::models::{ResourceId, TypeName};

const DEFAULT_ARRAY_LENGTH: usize = 1;

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "boolean", "break", "byte", "case", "catch", "char", "class", "const", "continue",
    "default", "do", "double", "else", "enum", "extends", "final", "finally", "float", "for",
    "goto", "if", "implements", "import", "instanceof", "int", "interface", "long", "native",
    "new", "package", "private", "protected", "public", "return", "short", "static", "super",
    "switch", "synchronized", "this", "throw", "throws", "transient", "try", "void", "volatile",
    "while",
];

/// Declared identifier entry
#[derive(Debug, Clone)]
struct DeclaredIdentifier {
    declared_type: TypeName,
    name: Option<String>,
}

/// Component instance entry
#[derive(Debug, Clone)]
struct RegisteredComponent {
    stand_in: StandInRef,
    declaration: ComponentDeclaration,
}

/// Memoizing factory of stand-ins
#[derive(Debug, Clone)]
pub struct StandInRegistry {
    catalog: FrameworkCatalog,

    /// Arena in creation order
    stand_ins: Vec<StandIn>,

    /// Identifier table (first declaration wins)
    declared: FxHashMap<ResourceId, DeclaredIdentifier>,

    by_identifier: FxHashMap<ResourceId, StandInRef>,
    ambient: FxHashMap<TypeName, StandInRef>,
    values: FxHashMap<TypeName, StandInRef>,
    typed_nulls: FxHashMap<TypeName, StandInRef>,
    unresolved: FxHashMap<TypeName, StandInRef>,
    services: FxHashMap<String, StandInRef>,
    derived: FxHashMap<(StandInRef, String), StandInRef>,

    components: Vec<RegisteredComponent>,
    components_by_name: FxHashMap<TypeName, usize>,

    /// Declared components not yet registered
    pending: FxHashMap<TypeName, ComponentDeclaration>,

    /// Components whose constructor arguments are being materialized
    registering: FxHashSet<TypeName>,

    /// Types currently being fabricated (cycle guard)
    in_progress: FxHashSet<TypeName>,

    /// Degenerate stand-ins that broke a fabrication cycle, by type
    cycle_breaks: FxHashMap<TypeName, StandInRef>,

    labels: FxHashSet<String>,
    degradations: Vec<Degradation>,
    array_length: usize,
}

impl StandInRegistry {
    pub fn new(catalog: FrameworkCatalog) -> Self {
        Self {
            catalog,
            stand_ins: Vec::new(),
            declared: FxHashMap::default(),
            by_identifier: FxHashMap::default(),
            ambient: FxHashMap::default(),
            values: FxHashMap::default(),
            typed_nulls: FxHashMap::default(),
            unresolved: FxHashMap::default(),
            services: FxHashMap::default(),
            derived: FxHashMap::default(),
            components: Vec::new(),
            components_by_name: FxHashMap::default(),
            pending: FxHashMap::default(),
            registering: FxHashSet::default(),
            in_progress: FxHashSet::default(),
            cycle_breaks: FxHashMap::default(),
            labels: FxHashSet::default(),
            degradations: Vec::new(),
            array_length: DEFAULT_ARRAY_LENGTH,
        }
    }

    /// Registry with the built-in Android catalog and a declared identifier table
    pub fn with_bindings(catalog: FrameworkCatalog, bindings: &[IdentifierBinding]) -> Self {
        let mut registry = Self::new(catalog);
        for binding in bindings {
            registry.declare(binding);
        }
        registry
    }

    /// Length of fabricated arrays (at least 1)
    pub fn with_array_length(mut self, length: usize) -> Self {
        self.array_length = length.max(1);
        self
    }

    pub fn catalog(&self) -> &FrameworkCatalog {
        &self.catalog
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Identifier lookup
    // ═══════════════════════════════════════════════════════════════════════

    /// Record a declared identifier binding
    ///
    /// Returns `false` when the identifier was already declared with another
    /// type; the first declaration is kept.
    pub fn declare(&mut self, binding: &IdentifierBinding) -> bool {
        match self.declared.get(&binding.id) {
            Some(existing) => {
                if existing.declared_type != binding.declared_type {
                    debug!(
                        "identifier {} redeclared as {} (keeping {})",
                        binding.id, binding.declared_type, existing.declared_type
                    );
                    return false;
                }
                true
            }
            None => {
                self.declared.insert(
                    binding.id,
                    DeclaredIdentifier {
                        declared_type: binding.declared_type.clone(),
                        name: binding.name.clone(),
                    },
                );
                true
            }
        }
    }

    pub fn declared_type(&self, id: ResourceId) -> Option<&TypeName> {
        self.declared.get(&id).map(|entry| &entry.declared_type)
    }

    /// Declared identifiers in ascending order
    pub fn declared_identifiers(&self) -> Vec<ResourceId> {
        let mut ids: Vec<ResourceId> = self.declared.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Canonical stand-in for `id`, fabricated as `declared_type` on first use
    ///
    /// Idempotent: later calls return the same handle whatever type they pass.
    pub fn resolve(&mut self, id: ResourceId, declared_type: &TypeName) -> StandInRef {
        if let Some(&existing) = self.by_identifier.get(&id) {
            trace!("identifier {} memo hit {}", id, existing);
            return existing;
        }

        let stand_in = match self.components_by_name.get(declared_type) {
            // Layout-declared fragments alias the driver's instance
            Some(&idx) => self.components[idx].stand_in,
            None => {
                let label = self
                    .declared
                    .get(&id)
                    .and_then(|entry| entry.name.clone())
                    .unwrap_or_else(|| format!("view{}", id));
                self.fabricate(declared_type, StandInOrigin::Identifier { id }, &label)
            }
        };

        debug!("identifier {} -> {} ({})", id, stand_in, declared_type);
        self.by_identifier.insert(id, stand_in);
        stand_in
    }

    /// Stand-in for `id` using its declared type
    ///
    /// An undeclared identifier resolves to a degenerate stand-in of
    /// `fallback`, memoized under the identifier.
    pub fn resolve_declared(&mut self, id: ResourceId, fallback: &TypeName) -> StandInRef {
        if let Some(&existing) = self.by_identifier.get(&id) {
            return existing;
        }
        if let Some(declared_type) = self.declared_type(id).cloned() {
            return self.resolve(id, &declared_type);
        }

        let label = format!("missing{}", id);
        let stand_in = self.push(
            fallback.clone(),
            StandInOrigin::Unresolved { id: Some(id) },
            Construction::Degenerate,
            &label,
        );
        self.record(stand_in, format!("R.id {}", id), DegradationReason::MissingIdentifier);
        self.by_identifier.insert(id, stand_in);
        stand_in
    }

    /// Result of looking up an unknown identifier (`findViewById(-1)`)
    pub fn unresolved(&mut self, ty: &TypeName) -> StandInRef {
        if let Some(&existing) = self.unresolved.get(ty) {
            return existing;
        }
        let label = format!("unresolved{}", ty.simple_name());
        let stand_in = self.push(
            ty.clone(),
            StandInOrigin::Unresolved { id: None },
            Construction::Degenerate,
            &label,
        );
        self.unresolved.insert(ty.clone(), stand_in);
        stand_in
    }

    /// Read-only identifier lookup, mirroring the framework entry point
    pub fn find_view_by_id(&self, id: ResourceId) -> Option<StandInRef> {
        self.by_identifier.get(&id).copied()
    }

    /// Resolved identifiers in ascending order
    pub fn identifiers(&self) -> Vec<(ResourceId, StandInRef)> {
        let mut entries: Vec<_> = self
            .by_identifier
            .iter()
            .map(|(&id, &stand_in)| (id, stand_in))
            .collect();
        entries.sort_unstable();
        entries
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Type-keyed lookup
    // ═══════════════════════════════════════════════════════════════════════

    /// Canonical stand-in for a type obtained by type-based lookup
    ///
    /// A component class resolves to the driver's instance, registering a
    /// pending declaration on demand.
    pub fn ambient(&mut self, ty: &TypeName) -> StandInRef {
        if let Some(&idx) = self.components_by_name.get(ty) {
            return self.components[idx].stand_in;
        }
        if let Some(declaration) = self.pending.get(ty).cloned() {
            return self.register_component(&declaration);
        }
        if let Some(&existing) = self.ambient.get(ty) {
            return existing;
        }
        if ty.is_value_type() || ty.is_array() {
            return self.value(ty);
        }

        let label = format!("ambient{}", ty.simple_name());
        let stand_in = self.fabricate(ty, StandInOrigin::Ambient, &label);
        // A cycle through `ty` memoized its degenerate stand-in already
        if let Some(&existing) = self.ambient.get(ty) {
            return existing;
        }
        self.ambient.insert(ty.clone(), stand_in);

        // A substituted type is also the canonical instance of its concrete type
        let concrete = self.stand_ins[stand_in.index()].type_name.clone();
        self.ambient.entry(concrete).or_insert(stand_in);
        stand_in
    }

    /// Read-only ambient lookup; `None` until `ambient(ty)` has run
    pub fn lookup_ambient(&self, ty: &TypeName) -> Option<StandInRef> {
        self.ambient.get(ty).copied()
    }

    /// `Context.getSystemService(name)`; aliases `ambient(service type)`
    pub fn system_service(&mut self, name: &str) -> StandInRef {
        if let Some(&existing) = self.services.get(name) {
            return existing;
        }
        let stand_in = match self.catalog.service_type(name).cloned() {
            Some(ty) => self.ambient(&ty),
            None => {
                let label = format!("service_{}", name);
                let stand_in = self.push(
                    TypeName::object(),
                    StandInOrigin::Ambient,
                    Construction::Degenerate,
                    &label,
                );
                self.record(stand_in, format!("service '{}'", name), DegradationReason::UnknownService);
                stand_in
            }
        };
        self.services.insert(name.to_string(), stand_in);
        stand_in
    }

    /// Default value for primitives, strings and arrays
    pub fn value(&mut self, ty: &TypeName) -> StandInRef {
        if let Some(&existing) = self.values.get(ty) {
            return existing;
        }
        let construction = match ty.element_type() {
            Some(element) => Construction::Array {
                element,
                length: self.array_length,
            },
            None => Construction::DefaultValue,
        };
        let label = format!("value{}", camel_type(ty));
        let stand_in = self.push(ty.clone(), StandInOrigin::Value, construction, &label);
        self.values.insert(ty.clone(), stand_in);
        stand_in
    }

    /// Single stand-in for a parameter of type `ty`
    pub fn argument_for(&mut self, ty: &TypeName) -> StandInRef {
        if ty.is_value_type() || ty.is_array() {
            self.value(ty)
        } else {
            self.ambient(ty)
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Components and derived values
    // ═══════════════════════════════════════════════════════════════════════

    /// Register a set of components, in order
    ///
    /// A constructor parameter naming another component of the set binds that
    /// component's instance even when it is declared later.
    pub fn register_components<'a>(
        &mut self,
        declarations: impl IntoIterator<Item = &'a ComponentDeclaration>,
    ) -> Vec<StandInRef> {
        let declarations: Vec<&ComponentDeclaration> = declarations.into_iter().collect();
        for declaration in &declarations {
            if !self.components_by_name.contains_key(&declaration.name) {
                self.pending
                    .entry(declaration.name.clone())
                    .or_insert_with(|| (*declaration).clone());
            }
        }
        declarations
            .into_iter()
            .map(|declaration| self.register_component(declaration))
            .collect()
    }

    /// The single driver instance of a component class
    ///
    /// Constructor cycles between components bind a typed null at the
    /// re-entered parameter.
    pub fn register_component(&mut self, declaration: &ComponentDeclaration) -> StandInRef {
        if let Some(&idx) = self.components_by_name.get(&declaration.name) {
            return self.components[idx].stand_in;
        }
        if !self.registering.insert(declaration.name.clone()) {
            let stand_in = self.typed_null(&declaration.name);
            self.record(stand_in, declaration.name.to_string(), DegradationReason::Cycle);
            return stand_in;
        }

        let args: Vec<StandInRef> = declaration
            .constructor_params
            .iter()
            .map(|param| self.argument_for(param))
            .collect();
        self.registering.remove(&declaration.name);
        self.pending.remove(&declaration.name);

        let label = lower_camel(declaration.name.simple_name());
        let stand_in = self.push(
            declaration.name.clone(),
            StandInOrigin::Component {
                component: declaration.kind,
            },
            Construction::Constructor { args },
            &label,
        );

        self.components_by_name
            .insert(declaration.name.clone(), self.components.len());
        self.components.push(RegisteredComponent {
            stand_in,
            declaration: declaration.clone(),
        });
        debug!("component {} -> {}", declaration.name, stand_in);
        stand_in
    }

    pub fn component(&self, name: &TypeName) -> Option<StandInRef> {
        self.components_by_name
            .get(name)
            .map(|&idx| self.components[idx].stand_in)
    }

    /// Component instances that can be passed where `ty` is expected
    pub fn components_assignable_to(&self, ty: &TypeName) -> Vec<StandInRef> {
        self.components
            .iter()
            .filter(|entry| entry.declaration.is_assignable_to(ty))
            .map(|entry| entry.stand_in)
            .collect()
    }

    /// Registered components in registration order
    pub fn components(&self) -> impl Iterator<Item = (&ComponentDeclaration, StandInRef)> {
        self.components
            .iter()
            .map(|entry| (&entry.declaration, entry.stand_in))
    }

    /// Value `parent.accessor()` returns; one stand-in per (parent, accessor)
    pub fn derived(&mut self, parent: StandInRef, step: &AccessorStep) -> StandInRef {
        let key = (parent, step.method.clone());
        if let Some(&existing) = self.derived.get(&key) {
            return existing;
        }

        let parent_label = self.stand_ins[parent.index()].label.clone();
        let suffix = step.method.strip_prefix("get").unwrap_or(&step.method);
        let label = format!("{}{}", parent_label, upper_first(suffix));
        let stand_in = self.push(
            step.returns.clone(),
            StandInOrigin::Derived {
                parent,
                accessor: step.method.clone(),
            },
            Construction::Accessor {
                receiver: parent,
                method: step.method.clone(),
            },
            &label,
        );
        self.derived.insert(key, stand_in);
        stand_in
    }

    /// Follow a getter chain from `start`
    pub fn derive_chain(&mut self, start: StandInRef, chain: &[AccessorStep]) -> StandInRef {
        chain
            .iter()
            .fold(start, |current, step| self.derived(current, step))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════════

    pub fn get(&self, stand_in: StandInRef) -> &StandIn {
        &self.stand_ins[stand_in.index()]
    }

    /// All stand-ins in creation order
    pub fn stand_ins(&self) -> &[StandIn] {
        &self.stand_ins
    }

    pub fn len(&self) -> usize {
        self.stand_ins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stand_ins.is_empty()
    }

    pub fn degradations(&self) -> &[Degradation] {
        &self.degradations
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Fabrication
    // ═══════════════════════════════════════════════════════════════════════

    fn fabricate(&mut self, ty: &TypeName, origin: StandInOrigin, label: &str) -> StandInRef {
        if ty.is_value_type() || ty.is_array() {
            return self.value(ty);
        }
        if self.in_progress.contains(ty) {
            let stand_in = self.push(ty.clone(), origin, Construction::Degenerate, label);
            self.record(stand_in, ty.to_string(), DegradationReason::Cycle);
            self.cycle_breaks.insert(ty.clone(), stand_in);
            return stand_in;
        }

        let recipe = match self.catalog.recipe_for(ty) {
            Some(recipe) => recipe,
            None => {
                let stand_in = self.push(ty.clone(), origin, Construction::Degenerate, label);
                self.record(stand_in, ty.to_string(), DegradationReason::NoRecipe);
                return stand_in;
            }
        };

        self.in_progress.insert(ty.clone());
        let stand_in = match recipe {
            Recipe::Substitute(concrete) => self.fabricate(&concrete, origin, label),
            Recipe::Constructor(params) => {
                let args = self.materialize(&params);
                match self.broken_cycle(ty, &origin) {
                    Some(broken) => broken,
                    None => self.push(ty.clone(), origin, Construction::Constructor { args }, label),
                }
            }
            Recipe::StaticFactory {
                owner,
                method,
                params,
            } => {
                let args = self.materialize(&params);
                match self.broken_cycle(ty, &origin) {
                    Some(broken) => broken,
                    None => self.push(
                        ty.clone(),
                        origin,
                        Construction::StaticFactory {
                            owner,
                            method,
                            args,
                        },
                        label,
                    ),
                }
            }
            Recipe::StaticField { owner, field } => self.push(
                ty.clone(),
                origin,
                Construction::StaticField { owner, field },
                label,
            ),
            Recipe::Unfabricable => {
                let stand_in = self.push(ty.clone(), origin, Construction::Degenerate, label);
                self.record(stand_in, ty.to_string(), DegradationReason::Unfabricable);
                stand_in
            }
        };
        self.in_progress.remove(ty);
        self.cycle_breaks.remove(ty);
        stand_in
    }

    /// Ambient stand-in fabricated for `ty` by a cycle while its own
    /// arguments were materialized
    fn broken_cycle(&mut self, ty: &TypeName, origin: &StandInOrigin) -> Option<StandInRef> {
        let broken = self.cycle_breaks.remove(ty)?;
        matches!(origin, StandInOrigin::Ambient).then_some(broken)
    }

    fn materialize(&mut self, params: &[ParamSource]) -> Vec<StandInRef> {
        params
            .iter()
            .map(|param| match param {
                ParamSource::Context => self.ambient(&TypeName::context()),
                ParamSource::Ambient(ty) => self.ambient(ty),
                ParamSource::Degenerate(ty) => self.typed_null(ty),
                ParamSource::Value(ty) => self.value(ty),
            })
            .collect()
    }

    /// Typed null used as a recipe argument; not a degradation
    fn typed_null(&mut self, ty: &TypeName) -> StandInRef {
        if let Some(&existing) = self.typed_nulls.get(ty) {
            return existing;
        }
        let label = format!("null{}", ty.simple_name());
        let stand_in = self.push(ty.clone(), StandInOrigin::Ambient, Construction::Degenerate, &label);
        self.typed_nulls.insert(ty.clone(), stand_in);
        stand_in
    }

    fn push(
        &mut self,
        type_name: TypeName,
        origin: StandInOrigin,
        construction: Construction,
        label: &str,
    ) -> StandInRef {
        let id = StandInRef::new(self.stand_ins.len());
        let label = self.unique_label(label);
        trace!("fabricated {} {} as {:?}", id, type_name, construction);
        self.stand_ins.push(StandIn {
            id,
            type_name,
            origin,
            construction,
            label,
        });
        id
    }

    fn record(&mut self, stand_in: StandInRef, subject: String, reason: DegradationReason) {
        debug!("{} degraded: {}", subject, reason);
        self.degradations.push(Degradation {
            stand_in,
            subject,
            reason,
        });
    }

    fn unique_label(&mut self, hint: &str) -> String {
        let mut base: String = hint
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        if base.is_empty() || base.starts_with(|c: char| c.is_ascii_digit()) {
            base.insert(0, '_');
        }
        if JAVA_KEYWORDS.contains(&base.as_str()) {
            base.push('_');
        }

        let mut label = base.clone();
        let mut n = 1;
        while self.labels.contains(&label) {
            n += 1;
            label = format!("{}_{}", base, n);
        }
        self.labels.insert(label.clone());
        label
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_camel(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `byte[]` → `ByteArray`, `java.lang.String` → `String`
fn camel_type(ty: &TypeName) -> String {
    match ty.element_type() {
        Some(element) => format!("{}Array", camel_type(&element)),
        None => upper_first(ty.simple_name()),
    }
}
