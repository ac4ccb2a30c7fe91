//! Stand-in application layer

pub mod registry;
