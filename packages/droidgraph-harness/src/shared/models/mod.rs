//! Shared domain models
//!
//! Types are spelled in Java source form (`android.view.View.OnClickListener`,
//! `byte[]`) because that is what both the facts producers and the emitted
//! harness speak.

mod method;
mod type_name;

pub use method::MethodSignature;
pub use type_name::TypeName;

/// Numeric resource identifier (`R.id.*`)
pub type ResourceId = u32;
