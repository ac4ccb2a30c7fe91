/*
 * Declared App Facts
 *
 * Everything the harness knows about an app comes from here: the discovered
 * component classes, the identifier table harvested from layouts, and the
 * handler bindings declared in manifest/XML. Producers (resource parsers,
 * class-hierarchy scanners) live outside this crate and hand over a
 * `FactsDocument`.
 *
 * Architecture:
 * - Domain: ComponentDeclaration, IdentifierBinding, HandlerBinding
 * - Infrastructure: YAML/JSON document loader + validation
 */

pub mod domain;
pub mod infrastructure;

pub use domain::{
    AccessorStep, ArgumentSource, ComponentDeclaration, ComponentKind, HandlerBinding,
    IdentifierBinding, IdentifierConflict, ListenerImpl, ParamBinding, ResourceFacts,
};
pub use infrastructure::{FactsDocument, FactsError};
