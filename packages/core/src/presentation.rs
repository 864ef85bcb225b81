//! Mapping from job status to notification presentation.

use crate::{Job, JobStatus, NotificationDraft, NotificationPatch, NotificationStatus};

/// Lifetimes of terminal notifications, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    pub done_ms: u64,
    pub failed_ms: u64,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            done_ms: 1000,
            failed_ms: 5000,
        }
    }
}

/// Status-derived part of a job notification. The title comes from a
/// presentation adapter keyed on the payload kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub status: NotificationStatus,
    pub duration: Option<u64>,
    pub message: Option<String>,
}

/// Derive the presentation for a job snapshot.
///
/// | status  | visual  | duration  | message         |
/// |---------|---------|-----------|-----------------|
/// | pending | default | sticky    | none            |
/// | running | loading | sticky    | last log line   |
/// | done    | success | `done_ms` | none            |
/// | failed  | error   | `failed_ms` | job error text |
pub fn present(job: &Job, last_log: Option<&str>, durations: &Durations) -> Presentation {
    match job.status {
        JobStatus::Pending => Presentation {
            status: NotificationStatus::Default,
            duration: None,
            message: None,
        },
        JobStatus::Running => Presentation {
            status: NotificationStatus::Loading,
            duration: None,
            message: last_log.map(str::to_owned),
        },
        JobStatus::Done => Presentation {
            status: NotificationStatus::Success,
            duration: Some(durations.done_ms),
            message: None,
        },
        JobStatus::Failed => Presentation {
            status: NotificationStatus::Error,
            duration: Some(durations.failed_ms),
            message: job.error.clone(),
        },
    }
}

impl Presentation {
    /// Build a push draft with the given title.
    pub fn into_draft(self, title: impl Into<String>) -> NotificationDraft {
        NotificationDraft {
            title: title.into(),
            message: self.message,
            status: self.status,
            duration: Some(self.duration),
        }
    }

    /// Build a full-replacement patch with the given title.
    pub fn into_patch(self, title: impl Into<String>) -> NotificationPatch {
        NotificationPatch::new()
            .title(title)
            .message(self.message)
            .status(self.status)
            .duration(self.duration)
    }
}
