//! Maps job lifecycle events onto queue operations.

use std::collections::HashMap;

use notify_core::{AppEvent, Durations, JobId, NotificationId, NotificationPatch, NotificationQueue, present};

use crate::titles::TitleRegistry;

/// Job-id to notification-id index for jobs in flight.
///
/// Events for jobs whose start was never observed are ignored.
#[derive(Debug, Default)]
pub struct Reconciler {
    index: HashMap<JobId, NotificationId>,
    last_log: HashMap<JobId, String>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notification currently tracking `job`, if any.
    pub fn notification_for(&self, job: JobId) -> Option<NotificationId> {
        self.index.get(&job).copied()
    }

    /// Number of jobs in flight.
    pub fn in_flight(&self) -> usize {
        self.index.len()
    }

    /// Apply one event to the queue. Returns `true` when the queue changed.
    pub fn apply(
        &mut self,
        event: &AppEvent,
        queue: &mut NotificationQueue,
        titles: &TitleRegistry,
        durations: &Durations,
    ) -> bool {
        match event {
            AppEvent::JobStart { job } => {
                let last_log = self.last_log.get(&job.id).map(String::as_str);
                let presentation = present(job, last_log, durations);
                let title = titles.title(job);

                if let Some(existing) = self.index.get(&job.id).copied()
                    && queue.update(existing, presentation.clone().into_patch(title.clone()))
                {
                    tracing::debug!(job = %job.id, notification = %existing, "duplicate start refreshed");
                    return true;
                }

                let notification = queue.push(presentation.into_draft(title), None);
                self.index.insert(job.id, notification.id);
                tracing::debug!(job = %job.id, notification = %notification.id, "job notification pushed");
                true
            }

            AppEvent::JobEnd { job } => {
                let Some(notification) = self.index.remove(&job.id) else {
                    tracing::debug!(job = %job.id, "end for untracked job ignored");
                    return false;
                };
                let last_log = self.last_log.remove(&job.id);
                let presentation = present(job, last_log.as_deref(), durations);
                let changed = queue.update(notification, presentation.into_patch(titles.title(job)));
                tracing::debug!(job = %job.id, status = %job.status, changed, "job notification settled");
                changed
            }

            AppEvent::JobLog { job_id, log } => {
                let Some(notification) = self.index.get(job_id).copied() else {
                    return false;
                };
                self.last_log.insert(*job_id, log.clone());
                queue.update(notification, NotificationPatch::new().message(Some(log.clone())))
            }
        }
    }
}
