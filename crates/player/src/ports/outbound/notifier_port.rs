//! Notifier Port - the presentation boundary for user-facing messages
//!
//! The application layer hands over structured notifications; how they are rendered
//! (toasts, dialogs, log lines) is up to the adapter.

use covey_domain::TownId;

/// How long a notification stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPersistence {
    /// Dismisses itself after a short while
    Transient,
    /// Stays until the user closes it
    Persistent,
}

/// Credentials of a town the user just created.
///
/// The edit password cannot be recovered later, which is why this is the only
/// persistent notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TownCreatedNotice {
    pub friendly_name: String,
    pub town_id: TownId,
    pub edit_password: String,
    pub is_publicly_listed: bool,
}

impl TownCreatedNotice {
    pub fn title(&self) -> String {
        format!("Town {} is ready to go!", self.friendly_name)
    }

    /// Plain-text rendering for adapters without their own layout.
    pub fn description(&self) -> String {
        let mut text = String::new();
        if !self.is_publicly_listed {
            text.push_str(&format!(
                "This town will NOT be publicly listed. To re-enter it, you will need to use this ID: {}\n",
                self.town_id
            ));
        }
        text.push_str(&format!(
            "Please record these values in case you need to change the room:\nTown ID: {}\nTown Editing Password: {}",
            self.town_id, self.edit_password
        ));
        text
    }
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Something the user asked for did not happen
    Error { title: String, description: String },
    /// A town was created; carries its credentials
    TownCreated(TownCreatedNotice),
}

impl Notification {
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Error {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn persistence(&self) -> NotificationPersistence {
        match self {
            Notification::Error { .. } => NotificationPersistence::Transient,
            Notification::TownCreated(_) => NotificationPersistence::Persistent,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error { .. })
    }

    pub fn title(&self) -> String {
        match self {
            Notification::Error { title, .. } => title.clone(),
            Notification::TownCreated(notice) => notice.title(),
        }
    }

    pub fn description(&self) -> String {
        match self {
            Notification::Error { description, .. } => description.clone(),
            Notification::TownCreated(notice) => notice.description(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait NotifierPort: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(is_publicly_listed: bool) -> TownCreatedNotice {
        TownCreatedNotice {
            friendly_name: "Party".into(),
            town_id: TownId::new("t9").unwrap(),
            edit_password: "pw9".into(),
            is_publicly_listed,
        }
    }

    #[test]
    fn created_notice_is_persistent_and_errors_are_transient() {
        assert_eq!(
            Notification::TownCreated(notice(true)).persistence(),
            NotificationPersistence::Persistent
        );
        assert_eq!(
            Notification::error("t", "d").persistence(),
            NotificationPersistence::Transient
        );
    }

    #[test]
    fn created_notice_description_contains_credentials() {
        let text = notice(true).description();
        assert!(text.contains("Town ID: t9"));
        assert!(text.contains("Town Editing Password: pw9"));
        assert!(!text.contains("NOT be publicly listed"));
    }

    #[test]
    fn private_town_notice_warns_about_listing() {
        let text = notice(false).description();
        assert!(text.starts_with("This town will NOT be publicly listed"));
    }

    #[test]
    fn title_names_the_town() {
        assert_eq!(
            Notification::TownCreated(notice(true)).title(),
            "Town Party is ready to go!"
        );
    }
}
