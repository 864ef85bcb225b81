//! Actor system for the notification timeline.
//!
//! This crate provides the Ractor-based notifier that owns the notification
//! queue, the auto-advance countdown and the job-to-notification index.
//!
//! # Architecture
//!
//! - `NotifierActor` - Owns all timeline state; handles one message at a time
//! - `AutoAdvance` - Idle/Armed countdown state machine for the queue head
//! - `Reconciler` - Maps job lifecycle events onto queue operations
//! - `TitleRegistry` - Titles notifications by payload kind
//!
//! # Usage
//!
//! ```ignore
//! use actors::{NotifierConfig, TitleRegistry, start_notifier};
//! use notify_core::EventBus;
//!
//! let bus = EventBus::new();
//! let (notifier, _handle) =
//!     start_notifier(&bus, NotifierConfig::default(), TitleRegistry::with_defaults()).await?;
//!
//! // Events published on the bus now drive the queue.
//! let current = notifier.head().await?;
//! ```

mod config;
mod messages;
mod notifier;
mod notifier_actor;
mod reconciler;
mod timer;
mod titles;

pub use config::{ConfigError, NotifierConfig};
pub use messages::{NotifierError, NotifierMessage};
pub use notifier::{Notifier, start_notifier};
pub use notifier_actor::{CurrentNotification, NotifierActor};
pub use reconciler::Reconciler;
pub use timer::{AutoAdvance, Countdown, Transition};
pub use titles::{FnTitle, TitleAdapter, TitleRegistry};

/// Re-export ractor types for convenience.
pub use ractor::{ActorRef, concurrency};
