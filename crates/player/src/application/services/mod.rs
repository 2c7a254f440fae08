//! Application services
//!
//! `TownJoinService` runs join/create attempts; `ListingRefresher` keeps the public
//! town listing current. Both depend on port traits only.

mod join_flow;
pub mod listing_refresher;
pub mod town_join_service;

pub use join_flow::FlowState;
pub use listing_refresher::{ListingRefresher, RefreshOutcome, MIN_REFRESH_INTERVAL};
pub use town_join_service::{CreateOutcome, JoinOutcome, TownJoinService};
