//! Title adapters and registry.
//!
//! Notification titles are derived from the job payload kind. The queue
//! treats them as opaque text.

use std::collections::HashMap;
use std::sync::Arc;

use notify_core::{Job, JobPayload};

/// Turns a job of one payload kind into the text shown as a notification title.
pub trait TitleAdapter: Send + Sync + 'static {
    /// The payload kind this adapter titles.
    fn kind(&self) -> &str;

    /// Produce the title for a job.
    fn title(&self, job: &Job) -> String;
}

/// Title lookup keyed by payload kind.
///
/// Kinds nobody registered are titled with the kind tag itself.
#[derive(Default, Clone)]
pub struct TitleRegistry {
    adapters: HashMap<String, Arc<dyn TitleAdapter>>,
}

impl std::fmt::Debug for TitleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl TitleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Create a registry with an adapter for every known payload kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in JobPayload::KINDS {
            registry.register(FnTitle::new(kind, default_title));
        }
        registry
    }

    /// Register an adapter, replacing any previous one for the same kind.
    pub fn register<A: TitleAdapter>(&mut self, adapter: A) {
        let kind = adapter.kind().to_string();
        self.adapters.insert(kind, Arc::new(adapter));
    }

    /// Check if an adapter exists for a kind.
    pub fn has_adapter(&self, kind: &str) -> bool {
        self.adapters.contains_key(kind)
    }

    /// List all registered kinds.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.adapters.keys().map(|s| s.as_str()).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Title a job, falling back to its kind tag.
    pub fn title(&self, job: &Job) -> String {
        match self.adapters.get(job.payload.kind()) {
            Some(adapter) => adapter.title(job),
            None => job.payload.kind().to_string(),
        }
    }
}

/// A simple function-based title adapter.
pub struct FnTitle<F>
where
    F: Fn(&Job) -> String + Send + Sync + 'static,
{
    kind: String,
    title: F,
}

impl<F> FnTitle<F>
where
    F: Fn(&Job) -> String + Send + Sync + 'static,
{
    /// Create a new function-based adapter.
    pub fn new(kind: impl Into<String>, title: F) -> Self {
        Self {
            kind: kind.into(),
            title,
        }
    }
}

impl<F> TitleAdapter for FnTitle<F>
where
    F: Fn(&Job) -> String + Send + Sync + 'static,
{
    fn kind(&self) -> &str {
        &self.kind
    }

    fn title(&self, job: &Job) -> String {
        (self.title)(job)
    }
}

fn default_title(job: &Job) -> String {
    match &job.payload {
        JobPayload::ImportLyrics {
            track_id, provider, ..
        } => match provider {
            Some(provider) => format!("Importing lyrics for track {track_id} from {provider}"),
            None => format!("Importing lyrics for track {track_id}"),
        },
        JobPayload::CleanAlbum { album_id } => format!("Cleaning album {album_id}"),
        JobPayload::ScanLibrary => "Scanning library".to_string(),
        JobPayload::ScanArtist { artist_id } => format!("Scanning artist {artist_id}"),
        JobPayload::ScanAlbum { album_id } => format!("Scanning album {album_id}"),
        JobPayload::ScanTrack { track_id } => format!("Scanning track {track_id}"),
        JobPayload::SearchLibrary => "Searching library".to_string(),
        JobPayload::SearchArtist { artist_id } => format!("Searching artist {artist_id}"),
        JobPayload::SearchAlbum { album_id } => format!("Searching album {album_id}"),
        JobPayload::SearchTrack { track_id } => format!("Searching track {track_id}"),
        JobPayload::SyncLibrary => "Syncing library".to_string(),
        JobPayload::SyncArtist { artist_id } => format!("Syncing artist {artist_id}"),
    }
}
