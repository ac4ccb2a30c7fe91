//! Stand-in infrastructure (framework recipes)

pub mod catalog;
