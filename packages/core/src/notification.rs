//! Notification records shown to the user, one at a time.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a notification, independent of any job id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub Ulid);

impl NotificationId {
    /// Create a new unique notification ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual status of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    #[default]
    Default,
    Loading,
    Success,
    Error,
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationStatus::Default => write!(f, "default"),
            NotificationStatus::Loading => write!(f, "loading"),
            NotificationStatus::Success => write!(f, "success"),
            NotificationStatus::Error => write!(f, "error"),
        }
    }
}

/// A notification stored in the queue.
///
/// `duration` is in milliseconds. `None` means the notification is sticky:
/// it stays until removed or superseded and is never retired by the timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: NotificationStatus,
    pub duration: Option<u64>,
}

impl Notification {
    /// Check if the notification is never auto-advanced.
    pub fn is_sticky(&self) -> bool {
        self.duration.is_none()
    }

    /// Apply a partial update in place. Fields absent from the patch keep
    /// their current value.
    pub fn apply(&mut self, patch: NotificationPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(message) = patch.message {
            self.message = message;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
    }
}

/// Input to a queue push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationDraft {
    pub title: String,
    pub message: Option<String>,
    pub status: NotificationStatus,
    /// `None`: use the queue default. `Some(None)`: sticky.
    pub duration: Option<Option<u64>>,
}

impl NotificationDraft {
    /// Create a draft with the given title and default status.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the message line.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the visual status.
    pub fn with_status(mut self, status: NotificationStatus) -> Self {
        self.status = status;
        self
    }

    /// Set an explicit duration in milliseconds.
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration = Some(Some(duration_ms));
        self
    }

    /// Make the notification sticky regardless of the queue default.
    pub fn sticky(mut self) -> Self {
        self.duration = Some(None);
        self
    }
}

/// Partial update applied by `update`. Only the fields that are `Some` change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationPatch {
    pub title: Option<String>,
    /// `Some(None)` clears the message.
    pub message: Option<Option<String>>,
    pub status: Option<NotificationStatus>,
    /// `Some(None)` makes the notification sticky.
    pub duration: Option<Option<u64>>,
}

impl NotificationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn message(mut self, message: Option<String>) -> Self {
        self.message = Some(message);
        self
    }

    pub fn status(mut self, status: NotificationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn duration(mut self, duration_ms: Option<u64>) -> Self {
        self.duration = Some(duration_ms);
        self
    }
}
