//! Session context
//!
//! One `SessionContext` exists per player session. It replaces a process-wide video
//! instance: everything that used to be read from that global (the last display name,
//! the connected town) lives here and is passed explicitly.

use std::sync::{Arc, PoisonError, RwLock};

use covey_domain::{DisplayName, SessionId, TownId};

/// The town the player is currently connected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveConnection {
    pub town_id: TownId,
    pub user_id: String,
    pub session_token: String,
    pub friendly_name: String,
}

#[derive(Debug)]
struct Inner {
    id: SessionId,
    display_name: RwLock<Option<DisplayName>>,
    connection: RwLock<Option<ActiveConnection>>,
}

/// Cheaply cloneable handle to the player's session state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::with_id(SessionId::new())
    }

    pub fn with_id(id: SessionId) -> Self {
        Self {
            inner: Arc::new(Inner {
                id,
                display_name: RwLock::new(None),
                connection: RwLock::new(None),
            }),
        }
    }

    pub fn id(&self) -> SessionId {
        self.inner.id
    }

    /// Last display name used for a join; prefills the username field.
    pub fn display_name(&self) -> Option<DisplayName> {
        self.inner
            .display_name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn remember_display_name(&self, name: DisplayName) {
        *self
            .inner
            .display_name
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(name);
    }

    pub fn connection(&self) -> Option<ActiveConnection> {
        self.inner
            .connection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connection().is_some()
    }

    pub fn set_connection(&self, connection: ActiveConnection) {
        *self
            .inner
            .connection
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(connection);
    }

    /// Forget the connected town, returning it if there was one.
    pub fn clear_connection(&self) -> Option<ActiveConnection> {
        self.inner
            .connection
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
