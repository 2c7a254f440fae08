//! Infrastructure adapters
//!
//! Concrete implementations of the outbound ports plus configuration loading.

pub mod config;
pub mod headless;
pub mod http_client;
pub mod notifications;

pub use config::{AutoJoin, ConfigError, PlayerConfig};
pub use headless::{AutoConfirmLoginGate, LoggingVideoHandoff};
pub use http_client::TownsServiceClient;
pub use notifications::{ChannelNotifier, TracingNotifier};
