mod catalog;

pub use catalog::ListenerCatalog;
