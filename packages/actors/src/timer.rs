//! Auto-advance timer state machine.
//!
//! Two states: Idle (no countdown) and Armed (one countdown for the current
//! head). The state machine only decides; the notifier actor owns the single
//! sleeper task and carries out each [`Transition`].

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use notify_core::{Notification, NotificationId};
use serde::Serialize;

/// Countdown for the head notification. `remove_at` is the public
/// dismissal timestamp a progress indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub notification: NotificationId,
    pub armed_at: DateTime<Utc>,
    pub remove_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl Countdown {
    /// Elapsed fraction of the countdown at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = (now - self.armed_at).num_milliseconds() as f64;
        (elapsed / self.duration_ms as f64).clamp(0.0, 1.0)
    }
}

/// What the actor must do after a re-evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changes.
    Stay,
    /// Cancel the outstanding sleeper, go Idle.
    Disarm,
    /// Cancel any outstanding sleeper, then schedule one firing `generation`
    /// after `delay`.
    Arm { generation: u64, delay: Duration },
}

/// What armed the current countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// The head's own duration. Follows later changes to that duration.
    Duration,
    /// A manual dismissal. Runs to completion whatever the head's duration.
    Dismiss,
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    generation: u64,
    countdown: Countdown,
    origin: Origin,
}

/// Idle/Armed state for the head of the queue.
#[derive(Debug, Default)]
pub struct AutoAdvance {
    armed: Option<Armed>,
    generation: u64,
}

impl AutoAdvance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current countdown, `None` while Idle.
    pub fn countdown(&self) -> Option<Countdown> {
        self.armed.map(|a| a.countdown)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Re-check the head after a queue mutation.
    ///
    /// A countdown for a notification that is no longer the head is
    /// cancelled. A countdown armed from the head's duration is cancelled
    /// when that duration becomes sticky or zero, and restarted when it
    /// changes. An Idle machine arms when the head has a positive duration.
    pub fn reevaluate(&mut self, head: Option<&Notification>, now: DateTime<Utc>) -> Transition {
        let Some(armed) = self.armed else {
            return self.arm_for(head, now).unwrap_or(Transition::Stay);
        };

        let same_head = head.filter(|h| h.id == armed.countdown.notification);
        match (same_head, armed.origin) {
            (Some(_), Origin::Dismiss) => Transition::Stay,
            (Some(h), Origin::Duration) if positive(h.duration) == Some(armed.countdown.duration_ms) => {
                Transition::Stay
            }
            _ => {
                self.armed = None;
                self.arm_for(head, now).unwrap_or(Transition::Disarm)
            }
        }
    }

    /// Arm a countdown for `head` regardless of its own duration, unless a
    /// countdown is already running.
    pub fn dismiss(&mut self, head: Option<&Notification>, delay_ms: u64, now: DateTime<Utc>) -> Transition {
        match head {
            Some(head) if self.armed.is_none() => self
                .arm(head.id, delay_ms, Origin::Dismiss, now)
                .unwrap_or(Transition::Stay),
            _ => Transition::Stay,
        }
    }

    /// Handle a sleeper firing. Returns the notification to pop when
    /// `generation` is the current countdown; stale firings return `None`.
    pub fn fire(&mut self, generation: u64) -> Option<NotificationId> {
        match self.armed {
            Some(armed) if armed.generation == generation => {
                self.armed = None;
                Some(armed.countdown.notification)
            }
            _ => None,
        }
    }

    fn arm_for(&mut self, head: Option<&Notification>, now: DateTime<Utc>) -> Option<Transition> {
        let head = head?;
        let duration_ms = positive(head.duration)?;
        self.arm(head.id, duration_ms, Origin::Duration, now)
    }

    /// `None` when `remove_at` is not representable; the head then behaves
    /// as sticky.
    fn arm(
        &mut self,
        notification: NotificationId,
        duration_ms: u64,
        origin: Origin,
        now: DateTime<Utc>,
    ) -> Option<Transition> {
        let remove_at = i64::try_from(duration_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .and_then(|delta| now.checked_add_signed(delta));
        let Some(remove_at) = remove_at else {
            tracing::warn!(notification = %notification, duration_ms, "duration out of range, not arming");
            return None;
        };

        self.generation += 1;
        self.armed = Some(Armed {
            generation: self.generation,
            countdown: Countdown {
                notification,
                armed_at: now,
                remove_at,
                duration_ms,
            },
            origin,
        });
        Some(Transition::Arm {
            generation: self.generation,
            delay: Duration::from_millis(duration_ms),
        })
    }
}

fn positive(duration: Option<u64>) -> Option<u64> {
    duration.filter(|ms| *ms > 0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use notify_core::{NotificationDraft, NotificationPatch, NotificationQueue};

    fn queue_with(durations: &[Option<u64>]) -> NotificationQueue {
        let mut queue = NotificationQueue::new();
        for (i, d) in durations.iter().enumerate() {
            let draft = NotificationDraft::new(format!("n{i}"));
            let draft = match d {
                Some(ms) => draft.with_duration(*ms),
                None => draft.sticky(),
            };
            queue.push(draft, None);
        }
        queue
    }

    #[test]
    fn arms_for_finite_head() {
        let queue = queue_with(&[Some(1000)]);
        let mut timer = AutoAdvance::new();
        let now = Utc::now();

        let t = timer.reevaluate(queue.head(), now);
        assert_eq!(
            t,
            Transition::Arm {
                generation: 1,
                delay: Duration::from_millis(1000)
            }
        );
        let countdown = timer.countdown().unwrap();
        assert_eq!(countdown.remove_at - countdown.armed_at, TimeDelta::milliseconds(1000));
        assert_eq!(countdown.notification, queue.head().unwrap().id);
    }

    #[test]
    fn sticky_and_zero_heads_stay_idle() {
        let mut timer = AutoAdvance::new();
        let sticky = queue_with(&[None]);
        assert_eq!(timer.reevaluate(sticky.head(), Utc::now()), Transition::Stay);
        let zero = queue_with(&[Some(0)]);
        assert_eq!(timer.reevaluate(zero.head(), Utc::now()), Transition::Stay);
        assert!(timer.countdown().is_none());
        assert_eq!(timer.reevaluate(None, Utc::now()), Transition::Stay);
    }

    #[test]
    fn repeated_reevaluation_keeps_one_countdown() {
        let mut queue = queue_with(&[Some(1000)]);
        let mut timer = AutoAdvance::new();
        assert!(matches!(timer.reevaluate(queue.head(), Utc::now()), Transition::Arm { .. }));

        queue.push(NotificationDraft::new("second").with_duration(500), None);
        assert_eq!(timer.reevaluate(queue.head(), Utc::now()), Transition::Stay);
        assert_eq!(timer.reevaluate(queue.head(), Utc::now()), Transition::Stay);
    }

    #[test]
    fn removing_armed_head_rearms_for_next() {
        let mut queue = queue_with(&[Some(1000), Some(200)]);
        let mut timer = AutoAdvance::new();
        timer.reevaluate(queue.head(), Utc::now());

        let first = queue.head().unwrap().id;
        queue.remove(first);
        let t = timer.reevaluate(queue.head(), Utc::now());
        assert_eq!(
            t,
            Transition::Arm {
                generation: 2,
                delay: Duration::from_millis(200)
            }
        );
        // The old generation is no longer honoured.
        assert_eq!(timer.fire(1), None);
        assert!(timer.is_armed());
    }

    #[test]
    fn removing_armed_head_before_sticky_disarms() {
        let mut queue = queue_with(&[Some(1000), None]);
        let mut timer = AutoAdvance::new();
        timer.reevaluate(queue.head(), Utc::now());

        let first = queue.head().unwrap().id;
        queue.remove(first);
        assert_eq!(timer.reevaluate(queue.head(), Utc::now()), Transition::Disarm);
        assert!(!timer.is_armed());
    }

    #[test]
    fn fire_returns_armed_notification_once() {
        let queue = queue_with(&[Some(10)]);
        let mut timer = AutoAdvance::new();
        timer.reevaluate(queue.head(), Utc::now());

        assert_eq!(timer.fire(1), queue.head().map(|n| n.id));
        assert_eq!(timer.fire(1), None);
        assert!(timer.countdown().is_none());
    }

    #[test]
    fn dismiss_arms_sticky_head_but_never_double_arms() {
        let queue = queue_with(&[None]);
        let mut timer = AutoAdvance::new();

        assert!(matches!(timer.dismiss(queue.head(), 1000, Utc::now()), Transition::Arm { .. }));
        assert_eq!(timer.dismiss(queue.head(), 1000, Utc::now()), Transition::Stay);
        // Re-evaluating a dismissed sticky head keeps the countdown.
        assert_eq!(timer.reevaluate(queue.head(), Utc::now()), Transition::Stay);
        assert_eq!(timer.dismiss(None, 1000, Utc::now()), Transition::Stay);
    }

    #[test]
    fn head_turning_sticky_disarms() {
        let mut queue = queue_with(&[Some(1000)]);
        let mut timer = AutoAdvance::new();
        timer.reevaluate(queue.head(), Utc::now());

        let id = queue.head().unwrap().id;
        queue.update(id, NotificationPatch::new().duration(None));
        assert_eq!(timer.reevaluate(queue.head(), Utc::now()), Transition::Disarm);
        assert!(timer.countdown().is_none());
        assert_eq!(timer.fire(1), None);

        queue.update(id, NotificationPatch::new().duration(Some(0)));
        assert_eq!(timer.reevaluate(queue.head(), Utc::now()), Transition::Stay);
    }

    #[test]
    fn changed_duration_restarts_countdown() {
        let mut queue = queue_with(&[Some(5000)]);
        let mut timer = AutoAdvance::new();
        timer.reevaluate(queue.head(), Utc::now());

        let id = queue.head().unwrap().id;
        queue.update(id, NotificationPatch::new().duration(Some(1000)));
        assert_eq!(
            timer.reevaluate(queue.head(), Utc::now()),
            Transition::Arm {
                generation: 2,
                delay: Duration::from_millis(1000)
            }
        );
        assert_eq!(timer.countdown().unwrap().duration_ms, 1000);

        // Unrelated updates leave the countdown alone.
        queue.update(id, NotificationPatch::new().message(Some("still here".into())));
        assert_eq!(timer.reevaluate(queue.head(), Utc::now()), Transition::Stay);
    }

    #[test]
    fn dismissal_survives_duration_changes() {
        let mut queue = queue_with(&[None]);
        let mut timer = AutoAdvance::new();
        timer.dismiss(queue.head(), 1000, Utc::now());

        let id = queue.head().unwrap().id;
        queue.update(id, NotificationPatch::new().duration(Some(5000)));
        assert_eq!(timer.reevaluate(queue.head(), Utc::now()), Transition::Stay);
        assert_eq!(timer.countdown().unwrap().duration_ms, 1000);
    }

    #[test]
    fn unrepresentable_duration_stays_idle() {
        let mut timer = AutoAdvance::new();
        for ms in [u64::MAX, u64::MAX / 2, i64::MAX as u64] {
            let queue = queue_with(&[Some(ms)]);
            assert_eq!(timer.reevaluate(queue.head(), Utc::now()), Transition::Stay);
            assert_eq!(timer.dismiss(queue.head(), ms, Utc::now()), Transition::Stay);
            assert!(!timer.is_armed());
        }
    }

    #[test]
    fn progress_is_clamped() {
        let now = Utc::now();
        let countdown = Countdown {
            notification: NotificationId::new(),
            armed_at: now,
            remove_at: now + TimeDelta::milliseconds(1000),
            duration_ms: 1000,
        };
        assert_eq!(countdown.progress(now), 0.0);
        assert_eq!(countdown.progress(now + TimeDelta::milliseconds(250)), 0.25);
        assert_eq!(countdown.progress(now + TimeDelta::milliseconds(5000)), 1.0);
        assert_eq!(countdown.progress(now - TimeDelta::milliseconds(5)), 0.0);
    }
}
