//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to interact with the towns directory, the login
//! gate, the video subsystem and the presentation layer without depending on
//! concrete implementations.

mod error;
pub mod login_gate_port;
pub mod notifier_port;
pub mod town_directory_port;
pub mod video_handoff_port;

pub use error::{DirectoryError, LoginGateError, VideoError};
pub use login_gate_port::LoginGatePort;
pub use notifier_port::{Notification, NotificationPersistence, NotifierPort, TownCreatedNotice};
pub use town_directory_port::TownDirectoryPort;
pub use video_handoff_port::VideoHandoffPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use login_gate_port::MockLoginGatePort;
#[cfg(test)]
pub use notifier_port::MockNotifierPort;
#[cfg(test)]
pub use town_directory_port::MockTownDirectoryPort;
#[cfg(test)]
pub use video_handoff_port::MockVideoHandoffPort;
