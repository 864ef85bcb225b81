//! Handle for the notifier actor and its wiring to the event bus.

use std::sync::Arc;

use notify_core::{
    AppEvent, EventBus, Notification, NotificationDraft, NotificationId, NotificationPatch,
    Subscription,
};
use ractor::{Actor, ActorRef, RpcReplyPort};
use tokio::sync::watch;

use crate::config::NotifierConfig;
use crate::messages::{NotifierError, NotifierMessage};
use crate::notifier_actor::{CurrentNotification, NotifierActor, NotifierArgs};
use crate::timer::Countdown;
use crate::titles::TitleRegistry;

/// Cloneable handle to a running notifier.
///
/// Each handle refers to its own actor; there is no global instance.
#[derive(Clone)]
pub struct Notifier {
    actor: ActorRef<NotifierMessage>,
    head_rx: watch::Receiver<Option<CurrentNotification>>,
    subscription: Option<Arc<Subscription>>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("actor", &self.actor.get_id())
            .field("wired", &self.subscription.is_some())
            .finish()
    }
}

impl Notifier {
    /// Spawn a notifier that is not attached to any bus. Events can still
    /// be fed with [`Notifier::publish`].
    pub async fn spawn(
        config: NotifierConfig,
        titles: TitleRegistry,
    ) -> Result<(Self, tokio::task::JoinHandle<()>), NotifierError> {
        let (head_tx, head_rx) = watch::channel(None);
        let args = NotifierArgs {
            config,
            titles: Arc::new(titles),
            head_tx,
        };

        let (actor, handle) = Actor::spawn(None, NotifierActor, args)
            .await
            .map_err(|e| NotifierError::Spawn(e.to_string()))?;

        Ok((
            Self {
                actor,
                head_rx,
                subscription: None,
            },
            handle,
        ))
    }

    /// Append a notification and return the stored record.
    pub async fn push(&self, draft: NotificationDraft) -> Result<Notification, NotifierError> {
        self.call(|reply| NotifierMessage::Push { draft, reply }).await
    }

    /// Merge `patch` into the notification with `id`. Absent ids are ignored.
    pub fn update(&self, id: NotificationId, patch: NotificationPatch) -> Result<(), NotifierError> {
        self.send(NotifierMessage::Update { id, patch })
    }

    /// Remove the notification with `id`. Absent ids are ignored.
    pub fn remove(&self, id: NotificationId) -> Result<(), NotifierError> {
        self.send(NotifierMessage::Remove { id })
    }

    /// Current head of the queue.
    pub async fn head(&self) -> Result<Option<Notification>, NotifierError> {
        self.call(|reply| NotifierMessage::Head { reply }).await
    }

    /// Every queued notification, head first.
    pub async fn notifications(&self) -> Result<Vec<Notification>, NotifierError> {
        self.call(|reply| NotifierMessage::List { reply }).await
    }

    /// Countdown armed for the head (`removeAt`), if any.
    pub async fn countdown(&self) -> Result<Option<Countdown>, NotifierError> {
        self.call(|reply| NotifierMessage::GetCountdown { reply }).await
    }

    /// Retire the head after the configured dismissal delay.
    pub fn dismiss(&self) -> Result<(), NotifierError> {
        self.send(NotifierMessage::Dismiss)
    }

    /// Feed a job event straight to the reconciler.
    pub fn publish(&self, event: AppEvent) -> Result<(), NotifierError> {
        self.send(NotifierMessage::Event(Box::new(event)))
    }

    /// Subscribe to head changes.
    pub fn watch_head(&self) -> watch::Receiver<Option<CurrentNotification>> {
        self.head_rx.clone()
    }

    /// Last published head, without a round trip to the actor.
    pub fn current(&self) -> Option<CurrentNotification> {
        self.head_rx.borrow().clone()
    }

    /// Check if this handle forwards bus events.
    pub fn is_wired(&self) -> bool {
        self.subscription.as_ref().is_some_and(|s| s.is_active())
    }

    /// Stop the actor and detach from the bus.
    pub fn shutdown(&self) {
        if let Some(subscription) = &self.subscription {
            subscription.unsubscribe();
        }
        let _ = self.actor.send_message(NotifierMessage::Shutdown);
    }

    fn send(&self, message: NotifierMessage) -> Result<(), NotifierError> {
        self.actor
            .send_message(message)
            .map_err(|_| NotifierError::Stopped)
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(RpcReplyPort<T>) -> NotifierMessage,
    ) -> Result<T, NotifierError> {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.send(build(tx.into()))?;
        rx.await.map_err(|_| NotifierError::Rpc)
    }
}

/// Start a notifier and wire it to `bus`.
///
/// Every event published on the bus afterwards is reconciled into the
/// notification queue, in arrival order.
pub async fn start_notifier(
    bus: &EventBus,
    config: NotifierConfig,
    titles: TitleRegistry,
) -> Result<(Notifier, tokio::task::JoinHandle<()>), NotifierError> {
    let (mut notifier, handle) = Notifier::spawn(config, titles).await?;

    let actor = notifier.actor.clone();
    let subscription = bus.listen(move |event| {
        if actor
            .send_message(NotifierMessage::Event(Box::new(event.clone())))
            .is_err()
        {
            tracing::warn!("notifier stopped, dropping {}", event.description());
        }
    });
    notifier.subscription = Some(Arc::new(subscription));

    tracing::info!("Notifier wired to event bus");
    Ok((notifier, handle))
}
