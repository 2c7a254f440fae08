//! Application layer
//!
//! Use cases of the town selection screen. Services depend on the port traits in
//! `crate::ports`, never on concrete adapters.

pub mod error;
pub mod services;

pub use error::{JoinError, ValidationError};
