//! Job domain types as observed on the event stream.
//!
//! Jobs are owned by the server. This side only ever sees snapshots carried
//! on events or returned from the create call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for JobId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Created, not yet picked up by a worker.
    #[default]
    Pending,
    /// A worker is executing the job.
    Running,
    /// Finished successfully.
    Done,
    /// Finished with an error.
    Failed,
}

impl JobStatus {
    /// Check if the job reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }

    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific job parameters, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum JobPayload {
    // Import
    #[serde(rename_all = "camelCase")]
    ImportLyrics {
        track_id: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider: Option<String>,
        synced: bool,
        content: String,
    },

    // Clean
    #[serde(rename_all = "camelCase")]
    CleanAlbum { album_id: i64 },

    // Scan
    ScanLibrary,
    #[serde(rename_all = "camelCase")]
    ScanArtist { artist_id: i64 },
    #[serde(rename_all = "camelCase")]
    ScanAlbum { album_id: i64 },
    #[serde(rename_all = "camelCase")]
    ScanTrack { track_id: i64 },

    // Search
    SearchLibrary,
    #[serde(rename_all = "camelCase")]
    SearchArtist { artist_id: i64 },
    #[serde(rename_all = "camelCase")]
    SearchAlbum { album_id: i64 },
    #[serde(rename_all = "camelCase")]
    SearchTrack { track_id: i64 },

    // Sync
    SyncLibrary,
    #[serde(rename_all = "camelCase")]
    SyncArtist { artist_id: i64 },
}

impl JobPayload {
    /// The wire tag of this payload, used to key title adapters.
    pub fn kind(&self) -> &'static str {
        match self {
            JobPayload::ImportLyrics { .. } => "importLyrics",
            JobPayload::CleanAlbum { .. } => "cleanAlbum",
            JobPayload::ScanLibrary => "scanLibrary",
            JobPayload::ScanArtist { .. } => "scanArtist",
            JobPayload::ScanAlbum { .. } => "scanAlbum",
            JobPayload::ScanTrack { .. } => "scanTrack",
            JobPayload::SearchLibrary => "searchLibrary",
            JobPayload::SearchArtist { .. } => "searchArtist",
            JobPayload::SearchAlbum { .. } => "searchAlbum",
            JobPayload::SearchTrack { .. } => "searchTrack",
            JobPayload::SyncLibrary => "syncLibrary",
            JobPayload::SyncArtist { .. } => "syncArtist",
        }
    }

    /// Every kind tag, in declaration order.
    pub const KINDS: [&'static str; 12] = [
        "importLyrics",
        "cleanAlbum",
        "scanLibrary",
        "scanArtist",
        "scanAlbum",
        "scanTrack",
        "searchLibrary",
        "searchArtist",
        "searchAlbum",
        "searchTrack",
        "syncLibrary",
        "syncArtist",
    ];
}

/// Snapshot of a server-tracked job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Server-assigned identifier.
    pub id: JobId,
    /// What the job does.
    pub payload: JobPayload,
    /// Status at the time of the snapshot.
    pub status: JobStatus,
    /// Error text, set when the job failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Creation time, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a pending job snapshot.
    pub fn new(id: impl Into<JobId>, payload: JobPayload) -> Self {
        Self {
            id: id.into(),
            payload,
            status: JobStatus::Pending,
            error: None,
            created_at: None,
        }
    }

    /// Set the status of this snapshot.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark this snapshot as failed with the given error.
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self
    }
}
