/*
 * Listener Callbacks
 *
 * Framework callback interfaces an app class can implement, and the
 * methods the framework calls on each. Listener declarations that do not
 * list their methods are expanded from this catalog.
 */

pub mod domain;
pub mod infrastructure;

pub use domain::ListenerInterface;
pub use infrastructure::ListenerCatalog;
