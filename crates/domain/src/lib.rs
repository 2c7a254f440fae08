//! Covey domain layer.
//!
//! Pure value types for the town selection flow: validated names, town listings,
//! session join/create payloads and the registration form. No I/O lives here.

pub mod error;
pub mod ids;
pub mod types;
pub mod value_objects;

pub use error::DomainError;
pub use ids::{FlowId, SessionId};
pub use types::{
    LoginForm, RegistrationField, RegistrationForm, SessionCreateRequest, SessionCreateResult,
    SessionJoinRequest, SessionJoinResult, TownListing, TownSummary,
};
pub use value_objects::{DisplayName, FriendlyName, TownId};
