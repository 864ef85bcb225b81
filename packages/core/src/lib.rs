//! Core domain types for the job notification timeline.
//!
//! This crate contains shared types used across all packages:
//! - Job, JobPayload and JobStatus as observed on the wire
//! - AppEvent and the EventBus that fans events out to listeners
//! - Notification records and the NotificationQueue that orders them
//! - The status-to-presentation table

mod bus;
mod events;
mod job;
mod notification;
mod presentation;
mod queue;

pub use bus::{EventBus, Subscription};
pub use events::{AppEvent, DecodeError};
pub use job::{Job, JobId, JobPayload, JobStatus};
pub use notification::{
    Notification, NotificationDraft, NotificationId, NotificationPatch, NotificationStatus,
};
pub use presentation::{Durations, Presentation, present};
pub use queue::NotificationQueue;
