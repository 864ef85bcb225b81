//! Runtime initialization for the notification timeline.

use std::time::Duration;

use actors::{Notifier, NotifierConfig, NotifierError, TitleRegistry, start_notifier};
use notify_core::{EventBus, JobPayload};
use tokio::task::JoinHandle;

use crate::client::{HttpJobClient, TransportError};
use crate::config::ClientConfig;
use crate::realtime::spawn_event_feed;
use crate::waiter::{WaitError, wait_for_job_completion_within};

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error(transparent)]
    Notifier(#[from] NotifierError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Everything a client needs: the bus, the notifier wired to it, the socket
/// feed publishing into it and the HTTP client issuing jobs.
#[derive(Debug)]
pub struct Runtime {
    pub bus: EventBus,
    pub notifier: Notifier,
    pub jobs: HttpJobClient,
    feed: JoinHandle<()>,
    actor: JoinHandle<()>,
}

impl Runtime {
    /// Issue a job and wait for it to end, optionally bounded by `timeout`.
    pub async fn run_job(&self, payload: JobPayload, timeout: Option<Duration>) -> Result<(), WaitError> {
        match timeout {
            Some(timeout) => {
                wait_for_job_completion_within(
                    &self.bus,
                    |payload| self.jobs.create_job(payload),
                    payload,
                    timeout,
                )
                .await
            }
            None => self.jobs.run_job(&self.bus, payload).await,
        }
    }

    /// Stop the socket feed and the notifier.
    pub async fn shutdown(self) {
        tracing::info!("Shutting down runtime");
        self.feed.abort();
        self.notifier.shutdown();
        if let Err(e) = self.actor.await {
            tracing::warn!("notifier did not stop cleanly: {e}");
        }
    }
}

/// Initialize the runtime.
///
/// Must be called from within a tokio runtime.
pub async fn init_runtime(
    client: ClientConfig,
    notifier: NotifierConfig,
) -> Result<Runtime, InitError> {
    tracing::info!(api = %client.api_url, "Initializing notification runtime...");

    let bus = EventBus::new();
    let jobs = HttpJobClient::new(&client)?;
    let (notifier, actor) = start_notifier(&bus, notifier, TitleRegistry::with_defaults()).await?;
    let feed = spawn_event_feed(client, bus.clone());

    tracing::info!("Notification runtime initialized");
    Ok(Runtime {
        bus,
        notifier,
        jobs,
        feed,
        actor,
    })
}
