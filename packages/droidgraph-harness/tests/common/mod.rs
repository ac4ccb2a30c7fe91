//! Common test utilities for droidgraph-harness
//!
//! Fact fixtures modelled on small regression apps, plus assertions over
//! synthesized procedures.

#![allow(dead_code)]

mod assertions;
mod fixtures;

pub use assertions::*;
pub use fixtures::*;
