//! Live job events from the API's WebSocket.

use std::time::Duration;

use futures_util::StreamExt;
use notify_core::EventBus;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{error, info, warn};
use url::Url;

use crate::client::TransportError;
use crate::config::ClientConfig;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Spawn the event feed as a background task.
///
/// Each text frame is decoded as an `AppEvent` and published on `bus`.
/// Undecodable frames are skipped. The socket is reopened with exponential
/// backoff until the task is aborted.
pub fn spawn_event_feed(config: ClientConfig, bus: EventBus) -> JoinHandle<()> {
    tokio::spawn(async move {
        let url = match config.socket_url() {
            Ok(url) => url,
            Err(e) => {
                error!("event feed disabled: {e}");
                return;
            }
        };

        info!(host = url.host_str().unwrap_or_default(), path = url.path(), "event feed starting");

        let mut backoff = INITIAL_BACKOFF;
        loop {
            match connect_and_stream(&url, &bus).await {
                Ok(frames) => {
                    info!(frames, "event socket closed");
                    backoff = INITIAL_BACKOFF;
                }
                Err(e) => {
                    warn!(backoff_secs = backoff.as_secs(), "event socket failed: {e}");
                }
            }

            tokio::time::sleep(backoff).await;
            backoff = next_backoff(backoff, config.max_reconnect_delay);
        }
    })
}

/// Returns the number of frames received once the socket closes.
async fn connect_and_stream(url: &Url, bus: &EventBus) -> Result<u64, TransportError> {
    let (mut socket, _) = connect_async(url.as_str()).await?;
    info!("event socket connected");

    let mut frames = 0;
    while let Some(message) = socket.next().await {
        match message {
            Ok(Message::Text(text)) => {
                frames += 1;
                dispatch_frame(bus, text.as_str());
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("event socket read failed: {e}");
                break;
            }
        }
    }
    Ok(frames)
}

/// Decode one frame and publish it. Malformed frames are logged and dropped.
pub fn dispatch_frame(bus: &EventBus, frame: &str) {
    if let Err(e) = bus.publish_frame(frame) {
        warn!("skipping undecodable frame: {e}");
    }
}

fn next_backoff(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}
