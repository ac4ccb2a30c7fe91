//! # Stand-in Registry
//!
//! Creation and lookup of fabricated framework objects ("stand-ins") so that
//! app code referencing framework types can be driven without a live
//! framework.
//!
//! - **Identifier stand-ins**: one canonical instance per resource identifier,
//!   exposed through a `findViewById`-style lookup
//! - **Ambient stand-ins**: one instance per type for services, hardware
//!   handles and context wrappers
//! - **Component instances**: one per app component class, shared with any
//!   identifier whose declared type names that class
//! - **Derived stand-ins**: one per (parent, getter) so getter chains alias
//!
//! Fabrication never fails: types without a safe recipe degrade to an
//! abstract object of their static type and the degradation is recorded.
//!
//! ## Usage
//! ```text
//! use droidgraph_harness::features::standin::{FrameworkCatalog, StandInRegistry};
//!
//! let mut registry = StandInRegistry::new(FrameworkCatalog::android());
//! let a = registry.resolve(0x7f05_0000, &"android.view.SurfaceView".into());
//! let b = registry.resolve(0x7f05_0000, &"android.view.SurfaceView".into());
//! assert_eq!(a, b);
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::registry::StandInRegistry;
pub use domain::{Construction, Degradation, DegradationReason, StandIn, StandInOrigin, StandInRef};
pub use infrastructure::catalog::{FrameworkCatalog, ParamSource, Recipe};
