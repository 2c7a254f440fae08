//! Town and session vocabulary types.
//!
//! These are pure data types shared by the application services and the adapters.

mod registration;
mod session;
mod town;

pub use registration::{LoginForm, RegistrationField, RegistrationForm};
pub use session::{
    SessionCreateRequest, SessionCreateResult, SessionJoinRequest, SessionJoinResult,
};
pub use town::{TownListing, TownSummary};
