//! Event types delivered over the push channel.

use serde::{Deserialize, Serialize};

use crate::{Job, JobId};

/// Job lifecycle events pushed by the server, one JSON object per message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AppEvent {
    /// A job started (or was enqueued) on the server.
    #[serde(rename_all = "camelCase")]
    JobStart { job: Job },
    /// A job reached a terminal status.
    #[serde(rename_all = "camelCase")]
    JobEnd { job: Job },
    /// A running job reported a progress line.
    #[serde(rename_all = "camelCase")]
    JobLog { job_id: JobId, log: String },
}

/// Error decoding an inbound frame.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed event frame: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppEvent {
    /// Decode a single JSON frame.
    pub fn from_frame(frame: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(frame)?)
    }

    /// Get the job ID this event refers to.
    pub fn job_id(&self) -> JobId {
        match self {
            AppEvent::JobStart { job } => job.id,
            AppEvent::JobEnd { job } => job.id,
            AppEvent::JobLog { job_id, .. } => *job_id,
        }
    }

    /// Check if this is the terminal event for the given job.
    pub fn is_terminal_for(&self, id: JobId) -> bool {
        matches!(self, AppEvent::JobEnd { job } if job.id == id)
    }

    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            AppEvent::JobStart { job } => {
                format!("Job {} ({}) started as {}", job.id, job.payload.kind(), job.status)
            }
            AppEvent::JobEnd { job } => match &job.error {
                Some(error) => format!("Job {} ended {}: {}", job.id, job.status, error),
                None => format!("Job {} ended {}", job.id, job.status),
            },
            AppEvent::JobLog { job_id, log } => format!("Job {} log: {}", job_id, log),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use crate::{JobPayload, JobStatus};

    #[test]
    fn decodes_each_event_kind() {
        let start = AppEvent::from_frame(
            r#"{"type":"jobStart","job":{"id":7,"payload":{"type":"scanLibrary"},"status":"pending"}}"#,
        )
        .unwrap();
        assert_eq!(start.job_id(), JobId(7));

        let end = AppEvent::from_frame(
            r#"{"type":"jobEnd","job":{"id":7,"payload":{"type":"scanLibrary"},"status":"failed","error":"disk full"}}"#,
        )
        .unwrap();
        assert!(end.is_terminal_for(JobId(7)));
        assert!(!end.is_terminal_for(JobId(8)));

        let log = AppEvent::from_frame(r#"{"type":"jobLog","jobId":7,"log":"Processing A"}"#)
            .unwrap();
        assert_eq!(
            log,
            AppEvent::JobLog {
                job_id: JobId(7),
                log: "Processing A".into()
            }
        );
        assert!(!log.is_terminal_for(JobId(7)));
    }

    #[test]
    fn rejects_unknown_event_type() {
        let err = AppEvent::from_frame(r#"{"type":"jobPaused","jobId":1}"#);
        assert!(matches!(err, Err(DecodeError::Json(_))));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let event = AppEvent::JobLog {
            job_id: JobId(3),
            log: "hi".into(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, serde_json::json!({ "type": "jobLog", "jobId": 3, "log": "hi" }));
    }

    #[test]
    fn describes_failures_with_error_text() {
        let job = Job::new(5, JobPayload::SyncLibrary).failed("boom");
        let text = AppEvent::JobEnd { job }.description();
        assert_eq!(text, "Job 5 ended failed: boom");
        let job = Job::new(5, JobPayload::SyncLibrary).with_status(JobStatus::Running);
        assert!(AppEvent::JobStart { job }.description().contains("syncLibrary"));
    }
}
