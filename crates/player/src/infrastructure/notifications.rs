//! Notifier adapters
//!
//! `ChannelNotifier` feeds a UI task through an unbounded stream. `TracingNotifier`
//! writes notifications to the log for the headless runner.

use futures_channel::mpsc;

use crate::ports::outbound::{Notification, NotifierPort};

/// Forwards notifications to whoever holds the receiver.
#[derive(Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded::<Notification>();
        (Self { tx }, rx)
    }
}

impl NotifierPort for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.unbounded_send(notification).is_err() {
            tracing::debug!("Notification receiver dropped");
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotifierPort for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match &notification {
            Notification::Error { title, description } => {
                tracing::warn!(title = %title, "{}", description);
            }
            Notification::TownCreated(notice) => {
                tracing::info!(
                    town_id = %notice.town_id,
                    is_publicly_listed = notice.is_publicly_listed,
                    "{}\n{}",
                    notice.title(),
                    notice.description()
                );
            }
        }
    }
}
