//! Ordered notification queue. The head is the only visible entry.

use std::collections::VecDeque;

use crate::{Notification, NotificationDraft, NotificationId, NotificationPatch};

/// FIFO collection of notifications.
///
/// Order is insertion order except for explicit removal. Nothing re-sorts.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    entries: VecDeque<Notification>,
}

impl NotificationQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification built from `draft` and return the stored record.
    ///
    /// When the draft leaves the duration unspecified, `default_duration`
    /// (milliseconds, `None` = sticky) is used.
    pub fn push(&mut self, draft: NotificationDraft, default_duration: Option<u64>) -> Notification {
        let notification = Notification {
            id: NotificationId::new(),
            title: draft.title,
            message: draft.message,
            status: draft.status,
            duration: draft.duration.unwrap_or(default_duration),
        };
        self.entries.push_back(notification.clone());
        notification
    }

    /// Merge `patch` into the notification with `id`. Returns `false` when
    /// no such notification exists.
    pub fn update(&mut self, id: NotificationId, patch: NotificationPatch) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove the notification with `id` wherever it sits. Returns `false`
    /// when no such notification exists.
    pub fn remove(&mut self, id: NotificationId) -> bool {
        match self.entries.iter().position(|n| n.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Peek at the current head.
    pub fn head(&self) -> Option<&Notification> {
        self.entries.front()
    }

    /// Pop the current head.
    pub fn pop_head(&mut self) -> Option<Notification> {
        self.entries.pop_front()
    }

    /// Look up a notification by id.
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use crate::NotificationStatus;

    fn titles(queue: &NotificationQueue) -> Vec<&str> {
        queue.iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn push_applies_default_duration_only_when_omitted() {
        let mut queue = NotificationQueue::new();
        let defaulted = queue.push(NotificationDraft::new("a"), Some(3000));
        let explicit = queue.push(NotificationDraft::new("b").with_duration(10), Some(3000));
        let sticky = queue.push(NotificationDraft::new("c").sticky(), Some(3000));

        assert_eq!(defaulted.duration, Some(3000));
        assert_eq!(explicit.duration, Some(10));
        assert_eq!(sticky.duration, None);
        assert_ne!(defaulted.id, explicit.id);
        assert_eq!(queue.head().map(|n| n.id), Some(defaulted.id));
        assert_eq!(titles(&queue), ["a", "b", "c"]);
    }

    #[test]
    fn update_keeps_unnamed_fields() {
        let mut queue = NotificationQueue::new();
        let pushed = queue.push(
            NotificationDraft::new("Scanning library")
                .with_message("step 1")
                .with_status(NotificationStatus::Loading)
                .sticky(),
            None,
        );

        assert!(queue.update(pushed.id, NotificationPatch::new().status(NotificationStatus::Success)));

        let stored = queue.get(pushed.id).unwrap();
        assert_eq!(stored.title, "Scanning library");
        assert_eq!(stored.message.as_deref(), Some("step 1"));
        assert_eq!(stored.status, NotificationStatus::Success);
        assert_eq!(stored.duration, None);
    }

    #[test]
    fn update_can_clear_optional_fields() {
        let mut queue = NotificationQueue::new();
        let pushed = queue.push(NotificationDraft::new("x").with_message("m"), Some(5));
        queue.update(pushed.id, NotificationPatch::new().message(None).duration(None));
        let stored = queue.get(pushed.id).unwrap();
        assert_eq!(stored.message, None);
        assert!(stored.is_sticky());
    }

    #[test]
    fn update_of_absent_id_is_a_no_op() {
        let mut queue = NotificationQueue::new();
        let pushed = queue.push(NotificationDraft::new("x"), None);
        queue.remove(pushed.id);
        assert!(!queue.update(pushed.id, NotificationPatch::new().title("y")));
        assert!(queue.is_empty());
    }

    #[test]
    fn remove_anywhere_preserves_order() {
        let mut queue = NotificationQueue::new();
        let a = queue.push(NotificationDraft::new("a"), None);
        let b = queue.push(NotificationDraft::new("b"), None);
        queue.push(NotificationDraft::new("c"), None);

        assert!(queue.remove(b.id));
        assert_eq!(titles(&queue), ["a", "c"]);
        assert!(queue.remove(a.id));
        assert_eq!(titles(&queue), ["c"]);
    }

    #[test]
    fn remove_twice_equals_remove_once() {
        let mut queue = NotificationQueue::new();
        let a = queue.push(NotificationDraft::new("a"), None);
        queue.push(NotificationDraft::new("b"), None);

        assert!(queue.remove(a.id));
        let after_first: Vec<_> = queue.iter().cloned().collect();
        assert!(!queue.remove(a.id));
        let after_second: Vec<_> = queue.iter().cloned().collect();
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn pop_head_advances_in_insertion_order() {
        let mut queue = NotificationQueue::new();
        queue.push(NotificationDraft::new("a"), None);
        queue.push(NotificationDraft::new("b"), None);
        assert_eq!(queue.pop_head().map(|n| n.title), Some("a".into()));
        assert_eq!(queue.head().map(|n| n.title.as_str()), Some("b"));
        assert_eq!(queue.len(), 1);
    }
}
