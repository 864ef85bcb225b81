//! Turns "create a job" plus the event stream into one awaitable.
//!
//! The listener is registered before the create request is sent. Events that
//! arrive while the job id is still unknown are buffered, then drained in
//! arrival order once the id is known. Settlement happens exactly once and
//! always detaches the listener, including when the future is dropped early.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use notify_core::{AppEvent, EventBus, Job, JobId, JobPayload, Subscription};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::client::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    #[error("job creation failed: {0}")]
    Create(#[source] TransportError),

    #[error("job did not finish in time")]
    TimedOut,
}

enum Phase {
    AwaitingId(Vec<AppEvent>),
    IdKnown(JobId),
    Settled,
}

struct WaitState {
    phase: Phase,
    subscription: Option<Subscription>,
}

struct Waiter {
    state: Mutex<WaitState>,
    done: Notify,
}

impl Waiter {
    fn new() -> Self {
        Self {
            state: Mutex::new(WaitState {
                phase: Phase::AwaitingId(Vec::new()),
                subscription: None,
            }),
            done: Notify::new(),
        }
    }

    fn hold(&self, subscription: Subscription) {
        self.state.lock().subscription = Some(subscription);
    }

    fn on_event(&self, event: &AppEvent) {
        let mut state = self.state.lock();
        let matched = match &mut state.phase {
            Phase::AwaitingId(buffered) => {
                buffered.push(event.clone());
                false
            }
            Phase::IdKnown(id) => event.is_terminal_for(*id),
            Phase::Settled => false,
        };
        if matched {
            let subscription = self.settle(&mut state);
            drop(state);
            drop(subscription);
        }
    }

    /// Single `AwaitingId -> IdKnown` transition, draining the buffer.
    fn id_known(&self, id: JobId) {
        let mut state = self.state.lock();
        let buffered = match std::mem::replace(&mut state.phase, Phase::IdKnown(id)) {
            Phase::AwaitingId(buffered) => buffered,
            other => {
                state.phase = other;
                return;
            }
        };
        tracing::trace!(job = %id, buffered = buffered.len(), "draining buffered events");

        if buffered.iter().any(|event| event.is_terminal_for(id)) {
            let subscription = self.settle(&mut state);
            drop(state);
            drop(subscription);
        }
    }

    fn settle(&self, state: &mut WaitState) -> Option<Subscription> {
        state.phase = Phase::Settled;
        self.done.notify_one();
        state.subscription.take()
    }

    fn detach(&self) {
        let subscription = {
            let mut state = self.state.lock();
            state.phase = Phase::Settled;
            state.subscription.take()
        };
        drop(subscription);
    }
}

/// Detaches the listener however the wait ends.
struct DetachOnDrop<'a>(&'a Waiter);

impl Drop for DetachOnDrop<'_> {
    fn drop(&mut self) {
        self.0.detach();
    }
}

/// Issue a job with `create` and wait for its `jobEnd` on `bus`.
///
/// Resolves once the job reaches a terminal state, whether it succeeded or
/// failed. A create failure is returned as [`WaitError::Create`]. There is no
/// timeout: a job that never ends keeps this future pending. Use
/// [`wait_for_job_completion_within`] to bound the wait.
pub async fn wait_for_job_completion<F, Fut>(
    bus: &EventBus,
    create: F,
    payload: JobPayload,
) -> Result<(), WaitError>
where
    F: FnOnce(JobPayload) -> Fut,
    Fut: Future<Output = Result<Job, TransportError>>,
{
    let waiter = Arc::new(Waiter::new());
    let listener = Arc::clone(&waiter);
    waiter.hold(bus.listen(move |event| listener.on_event(event)));
    let _detach = DetachOnDrop(&waiter);

    let kind = payload.kind();
    let job = match create(payload).await {
        Ok(job) => job,
        Err(e) => {
            tracing::debug!(kind, "job creation failed: {e}");
            return Err(WaitError::Create(e));
        }
    };

    tracing::debug!(job = %job.id, kind, "waiting for job to end");
    waiter.id_known(job.id);
    waiter.done.notified().await;
    tracing::debug!(job = %job.id, "job ended");
    Ok(())
}

/// [`wait_for_job_completion`] bounded by `timeout`.
pub async fn wait_for_job_completion_within<F, Fut>(
    bus: &EventBus,
    create: F,
    payload: JobPayload,
    timeout: Duration,
) -> Result<(), WaitError>
where
    F: FnOnce(JobPayload) -> Fut,
    Fut: Future<Output = Result<Job, TransportError>>,
{
    tokio::time::timeout(timeout, wait_for_job_completion(bus, create, payload))
        .await
        .map_err(|_| WaitError::TimedOut)?
}
