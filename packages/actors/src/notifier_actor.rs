//! Notifier actor owning the notification queue, its countdown, and the
//! job index.
//!
//! Messages are handled one at a time, so every mutation completes (queue,
//! countdown and published head) before the next message is looked at.

use std::sync::Arc;

use chrono::Utc;
use notify_core::{Notification, NotificationQueue};
use ractor::{Actor, ActorProcessingErr, ActorRef};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::NotifierConfig;
use crate::messages::NotifierMessage;
use crate::reconciler::Reconciler;
use crate::timer::{AutoAdvance, Countdown, Transition};
use crate::titles::TitleRegistry;

/// What a renderer shows: the head and its countdown, if armed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentNotification {
    pub notification: Notification,
    pub countdown: Option<Countdown>,
}

/// State for the notifier actor.
pub struct NotifierActorState {
    queue: NotificationQueue,
    timer: AutoAdvance,
    /// The one outstanding sleeper, if armed.
    sleeper: Option<JoinHandle<()>>,
    reconciler: Reconciler,
    titles: Arc<TitleRegistry>,
    config: NotifierConfig,
    head_tx: watch::Sender<Option<CurrentNotification>>,
}

impl NotifierActorState {
    /// Re-evaluate the countdown and publish the head. Runs at the end of
    /// every queue-mutating message.
    fn settle(&mut self, myself: &ActorRef<NotifierMessage>) {
        let transition = self.timer.reevaluate(self.queue.head(), Utc::now());
        self.execute(transition, myself);
        self.publish_head();
    }

    fn execute(&mut self, transition: Transition, myself: &ActorRef<NotifierMessage>) {
        match transition {
            Transition::Stay => {}
            Transition::Disarm => {
                self.cancel_sleeper();
                tracing::debug!("countdown cancelled");
            }
            Transition::Arm { generation, delay } => {
                self.cancel_sleeper();
                let me = myself.clone();
                self.sleeper = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = me.send_message(NotifierMessage::Advance { generation });
                }));
                tracing::debug!(generation, delay_ms = delay.as_millis() as u64, "countdown armed");
            }
        }
    }

    fn cancel_sleeper(&mut self) {
        if let Some(sleeper) = self.sleeper.take() {
            sleeper.abort();
        }
    }

    fn current(&self) -> Option<CurrentNotification> {
        self.queue.head().map(|head| CurrentNotification {
            notification: head.clone(),
            countdown: self.timer.countdown().filter(|c| c.notification == head.id),
        })
    }

    fn publish_head(&self) {
        let next = self.current();
        self.head_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// Arguments for spawning the notifier actor.
pub struct NotifierArgs {
    pub config: NotifierConfig,
    pub titles: Arc<TitleRegistry>,
    pub head_tx: watch::Sender<Option<CurrentNotification>>,
}

/// Notifier actor that owns the notification timeline.
pub struct NotifierActor;

impl Actor for NotifierActor {
    type Msg = NotifierMessage;
    type State = NotifierActorState;
    type Arguments = NotifierArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!(
            default_duration_ms = ?args.config.default_duration_ms,
            done_ms = args.config.done_duration_ms,
            failed_ms = args.config.failed_duration_ms,
            "Starting notifier"
        );
        Ok(NotifierActorState {
            queue: NotificationQueue::new(),
            timer: AutoAdvance::new(),
            sleeper: None,
            reconciler: Reconciler::new(),
            titles: args.titles,
            config: args.config,
            head_tx: args.head_tx,
        })
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.cancel_sleeper();
        tracing::info!(pending = state.queue.len(), "Notifier stopped");
        Ok(())
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            NotifierMessage::Push { draft, reply } => {
                let notification = state.queue.push(draft, state.config.default_duration_ms);
                tracing::debug!(notification = %notification.id, title = %notification.title, "pushed");
                state.settle(&myself);
                let _ = reply.send(notification);
            }

            NotifierMessage::Update { id, patch } => {
                if state.queue.update(id, patch) {
                    state.settle(&myself);
                } else {
                    tracing::debug!(notification = %id, "update for absent notification ignored");
                }
            }

            NotifierMessage::Remove { id } => {
                if state.queue.remove(id) {
                    state.settle(&myself);
                }
            }

            NotifierMessage::Head { reply } => {
                let _ = reply.send(state.queue.head().cloned());
            }

            NotifierMessage::List { reply } => {
                let _ = reply.send(state.queue.iter().cloned().collect());
            }

            NotifierMessage::GetCountdown { reply } => {
                let _ = reply.send(state.timer.countdown());
            }

            NotifierMessage::Dismiss => {
                let transition = state.timer.dismiss(
                    state.queue.head(),
                    state.config.dismiss_delay_ms,
                    Utc::now(),
                );
                state.execute(transition, &myself);
                state.publish_head();
            }

            NotifierMessage::Event(event) => {
                let durations = state.config.durations();
                if state
                    .reconciler
                    .apply(&event, &mut state.queue, &state.titles, &durations)
                {
                    state.settle(&myself);
                }
            }

            NotifierMessage::Advance { generation } => {
                if let Some(id) = state.timer.fire(generation) {
                    state.sleeper = None;
                    if state.queue.head().is_some_and(|head| head.id == id) {
                        state.queue.pop_head();
                        tracing::debug!(notification = %id, "head retired");
                    }
                    state.settle(&myself);
                } else {
                    tracing::trace!(generation, "stale countdown ignored");
                }
            }

            NotifierMessage::Shutdown => {
                tracing::info!("Shutting down notifier");
                myself.stop(None);
                return Ok(());
            }
        }

        Ok(())
    }
}
