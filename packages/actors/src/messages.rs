//! Message types for the notifier actor.

use notify_core::{AppEvent, Notification, NotificationDraft, NotificationId, NotificationPatch};
use ractor::RpcReplyPort;

use crate::timer::Countdown;

/// Messages for the NotifierActor.
#[derive(Debug)]
pub enum NotifierMessage {
    /// Append a notification and reply with the stored record.
    Push {
        draft: NotificationDraft,
        reply: RpcReplyPort<Notification>,
    },

    /// Merge a partial update into a notification.
    Update {
        id: NotificationId,
        patch: NotificationPatch,
    },

    /// Remove a notification wherever it sits.
    Remove { id: NotificationId },

    /// Get the current head.
    Head {
        reply: RpcReplyPort<Option<Notification>>,
    },

    /// Get every queued notification, head first.
    List {
        reply: RpcReplyPort<Vec<Notification>>,
    },

    /// Get the countdown armed for the head, if any.
    GetCountdown {
        reply: RpcReplyPort<Option<Countdown>>,
    },

    /// Retire the head after the configured dismissal delay.
    Dismiss,

    /// A job lifecycle event from the bus.
    Event(Box<AppEvent>),

    /// The sleeper for countdown `generation` fired.
    Advance { generation: u64 },

    /// Stop the actor.
    Shutdown,
}

/// Error type for notifier operations.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("notifier is not running")]
    Stopped,

    #[error("failed to spawn notifier: {0}")]
    Spawn(String),

    #[error("notifier did not reply")]
    Rpc,
}
