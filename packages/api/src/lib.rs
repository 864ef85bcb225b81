//! Client runtime for the job notification timeline.
//!
//! This crate contains:
//! - The completion waiter (issue a job, await its `jobEnd`)
//! - The HTTP job client
//! - The WebSocket event feed that publishes onto the event bus
//! - Runtime initialization wiring all of the above to the notifier

mod client;
mod config;
mod init;
mod realtime;
mod waiter;

pub use client::{HttpJobClient, TransportError};
pub use config::{ClientConfig, ConfigError};
pub use init::{InitError, Runtime, init_runtime};
pub use realtime::{dispatch_frame, spawn_event_feed};
pub use waiter::{WaitError, wait_for_job_completion, wait_for_job_completion_within};

// Re-export core types for convenience
pub use notify_core::{AppEvent, EventBus, Job, JobId, JobPayload, JobStatus, Subscription};
