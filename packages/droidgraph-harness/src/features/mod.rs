//! Feature slices
//!
//! - `facts`     : declared app facts (components, identifiers, handlers)
//! - `standin`   : Stand-in Registry (fabricated framework objects)
//! - `lifecycle` : per-kind lifecycle protocols (partial orders)
//! - `callbacks` : listener interface catalog
//! - `driver`    : Driver Synthesizer, executor and emitters

pub mod callbacks;
pub mod driver;
pub mod facts;
pub mod lifecycle;
pub mod standin;
