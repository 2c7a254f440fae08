//! Covey Shared - Wire types of the towns service
//!
//! This crate contains the JSON shapes exchanged with the towns service REST API:
//! - Request bodies for town creation and session join
//! - Response payloads and the `ResponseEnvelope` every endpoint wraps them in
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and thiserror
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain types** - raw strings and numbers; conversion happens in adapters

pub mod requests;
pub mod responses;

pub use requests::{TownCreateRequest, TownJoinRequest};
pub use responses::{
    CoveyTownInfo, EnvelopeError, ResponseEnvelope, TownCreateResponse, TownJoinResponse,
    TownListResponse,
};
