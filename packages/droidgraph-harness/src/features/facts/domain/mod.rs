/*
 * Facts Domain Models
 */

mod component;
mod resources;

pub use component::{
    AccessorStep, ArgumentSource, ComponentDeclaration, ComponentKind, ListenerImpl, ParamBinding,
};
pub use resources::{HandlerBinding, IdentifierBinding, IdentifierConflict, ResourceFacts};
