#![allow(dead_code)]

use api::{AppEvent, EventBus, Job, JobPayload, JobStatus, TransportError};
use futures_util::future::BoxFuture;

pub fn scan_artist() -> JobPayload {
    JobPayload::ScanArtist { artist_id: 12 }
}

pub fn job_end(id: i64, status: JobStatus) -> AppEvent {
    AppEvent::JobEnd {
        job: Job::new(id, scan_artist()).with_status(status),
    }
}

/// A create call that succeeds with job `id`.
pub fn create_ok(
    id: i64,
) -> impl FnOnce(JobPayload) -> std::future::Ready<Result<Job, TransportError>> {
    move |payload| std::future::ready(Ok(Job::new(id, payload)))
}

/// A create call that publishes `events` on `bus` before the response
/// arrives, then succeeds with job `id`.
pub fn create_after(
    bus: &EventBus,
    events: Vec<AppEvent>,
    id: i64,
) -> impl FnOnce(JobPayload) -> BoxFuture<'static, Result<Job, TransportError>> {
    let bus = bus.clone();
    move |payload| {
        Box::pin(async move {
            for event in &events {
                bus.publish(event);
            }
            Ok(Job::new(id, payload))
        })
    }
}

pub fn server_error() -> TransportError {
    TransportError::Status {
        status: 500,
        body: "boom".to_string(),
    }
}
