//! `jobwatch`: terminal front end for the job notification timeline.

use std::time::Duration;

use actors::{CurrentNotification, NotifierConfig};
use anyhow::{Context, Result};
use api::{ClientConfig, Runtime, init_runtime};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use notify_core::JobPayload;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// jobwatch - Follow background jobs as notifications
#[derive(Parser)]
#[command(name = "jobwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current notification every time it changes
    Watch,

    /// Create a job and wait until it ends
    Run {
        /// Job payload as JSON, e.g. '{"type":"scanArtist","artistId":12}'
        payload: String,

        /// Give up waiting after this many seconds
        #[arg(long, value_name = "SECONDS")]
        timeout_secs: Option<u64>,
    },

    /// List the job kinds the API accepts
    Kinds,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if let Commands::Kinds = cli.command {
        for kind in JobPayload::KINDS {
            println!("{kind}");
        }
        return Ok(());
    }

    let client = ClientConfig::from_env()?;
    let notifier = NotifierConfig::from_env()?;
    let runtime = init_runtime(client, notifier).await?;

    let result = match cli.command {
        Commands::Watch => watch_timeline(&runtime).await,
        Commands::Run {
            payload,
            timeout_secs,
        } => run_job(&runtime, &payload, timeout_secs.map(Duration::from_secs)).await,
        Commands::Kinds => Ok(()),
    };

    runtime.shutdown().await;
    result
}

async fn watch_timeline(runtime: &Runtime) -> Result<()> {
    let mut head = runtime.notifier.watch_head();
    loop {
        tokio::select! {
            changed = head.changed() => {
                changed.context("notifier stopped")?;
                print_head(&mut head);
            }
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

async fn run_job(runtime: &Runtime, payload: &str, timeout: Option<Duration>) -> Result<()> {
    let payload: JobPayload = serde_json::from_str(payload).context("invalid job payload")?;
    tracing::info!(kind = payload.kind(), "Submitting job");

    let mut head = runtime.notifier.watch_head();
    let job = runtime.run_job(payload, timeout);
    tokio::pin!(job);

    loop {
        tokio::select! {
            result = &mut job => {
                result?;
                tracing::info!("Job finished");
                return Ok(());
            }
            changed = head.changed() => {
                changed.context("notifier stopped")?;
                print_head(&mut head);
            }
        }
    }
}

fn print_head(head: &mut watch::Receiver<Option<CurrentNotification>>) {
    let current = head.borrow_and_update().clone();
    if let Some(current) = current {
        println!("{}", render(&current, Utc::now()));
    }
}

/// One status line for the head, with countdown progress when armed.
fn render(current: &CurrentNotification, now: DateTime<Utc>) -> String {
    let notification = &current.notification;
    let mut line = format!("[{}] {}", notification.status, notification.title);
    if let Some(message) = &notification.message {
        line.push_str(" - ");
        line.push_str(message);
    }
    if let Some(countdown) = &current.countdown {
        line.push_str(&format!(" ({:.0}%)", countdown.progress(now) * 100.0));
    }
    line
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use actors::Countdown;
    use chrono::TimeDelta;
    use notify_core::{Notification, NotificationId, NotificationStatus};

    fn notification(message: Option<&str>) -> Notification {
        Notification {
            id: NotificationId::new(),
            title: "Scanning artist 12".into(),
            message: message.map(str::to_string),
            status: NotificationStatus::Loading,
            duration: None,
        }
    }

    #[test]
    fn renders_sticky_notification() {
        let current = CurrentNotification {
            notification: notification(Some("Processing B")),
            countdown: None,
        };
        assert_eq!(
            render(&current, Utc::now()),
            "[loading] Scanning artist 12 - Processing B"
        );
    }

    #[test]
    fn renders_countdown_progress() {
        let notification = notification(None);
        let now = Utc::now();
        let current = CurrentNotification {
            countdown: Some(Countdown {
                notification: notification.id,
                armed_at: now,
                remove_at: now + TimeDelta::milliseconds(1000),
                duration_ms: 1000,
            }),
            notification,
        };
        assert_eq!(
            render(&current, now + TimeDelta::milliseconds(500)),
            "[loading] Scanning artist 12 (50%)"
        );
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::parse_from(["jobwatch", "run", r#"{"type":"scanLibrary"}"#, "--timeout-secs", "30"]);
        match cli.command {
            Commands::Run {
                payload,
                timeout_secs,
            } => {
                assert_eq!(payload, r#"{"type":"scanLibrary"}"#);
                assert_eq!(timeout_secs, Some(30));
            }
            _ => panic!("expected run"),
        }
    }
}
