//! Covey player client.
//!
//! Town selection for Covey Town: joining or creating a town and keeping the public
//! listing current. Application services talk to the towns service, the login gate,
//! the video subsystem and the UI through the port traits in [`ports`].

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod runner;
pub mod state;

pub use application::services::{
    CreateOutcome, FlowState, JoinOutcome, ListingRefresher, RefreshOutcome, TownJoinService,
};
pub use application::{JoinError, ValidationError};
pub use state::{ActiveConnection, SessionContext};
