//! Stand-in domain models

mod stand_in;

pub use stand_in::{Construction, Degradation, DegradationReason, StandIn, StandInOrigin, StandInRef};
