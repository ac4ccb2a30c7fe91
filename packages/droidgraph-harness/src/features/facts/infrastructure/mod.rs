/*
 * Facts Infrastructure
 */

mod loader;

pub use loader::{FactsDocument, FactsError};
