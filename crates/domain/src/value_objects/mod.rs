//! Value objects with construction-time validation.

mod names;

pub use names::{DisplayName, FriendlyName, TownId};
