use actors::{Notifier, NotifierConfig, NotifierError, TitleRegistry, start_notifier};
use notify_core::{AppEvent, EventBus, Job, JobId, JobPayload, JobStatus};

pub async fn setup_notifier() -> Result<Notifier, NotifierError> {
    let (notifier, _handle) =
        Notifier::spawn(NotifierConfig::default(), TitleRegistry::with_defaults()).await?;
    Ok(notifier)
}

pub async fn setup_wired(bus: &EventBus) -> Result<Notifier, NotifierError> {
    let (notifier, _handle) =
        start_notifier(bus, NotifierConfig::default(), TitleRegistry::with_defaults()).await?;
    Ok(notifier)
}

pub fn scan_artist(id: i64, status: JobStatus) -> Job {
    Job::new(id, JobPayload::ScanArtist { artist_id: 12 }).with_status(status)
}

pub fn job_start(job: Job) -> AppEvent {
    AppEvent::JobStart { job }
}

pub fn job_end(job: Job) -> AppEvent {
    AppEvent::JobEnd { job }
}

pub fn job_log(id: i64, log: &str) -> AppEvent {
    AppEvent::JobLog {
        job_id: JobId(id),
        log: log.to_string(),
    }
}
