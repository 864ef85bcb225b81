//! HTTP client for the job API.

use notify_core::{EventBus, Job, JobPayload};
use url::Url;

use crate::config::{ClientConfig, ConfigError};
use crate::waiter::{WaitError, wait_for_job_completion};

/// Failure of a request to the job API or its socket.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Url(#[from] ConfigError),

    #[error("socket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Issues jobs over `POST {api_url}/jobs`.
#[derive(Debug, Clone)]
pub struct HttpJobClient {
    http: reqwest::Client,
    jobs_url: Url,
    access_token: Option<String>,
}

impl HttpJobClient {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("jobwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            jobs_url: config.jobs_url()?,
            access_token: config.access_token.clone(),
        })
    }

    /// Create a job and return the server's record of it.
    ///
    /// Any non-2xx response is a [`TransportError::Status`] carrying the body.
    pub async fn create_job(&self, payload: JobPayload) -> Result<Job, TransportError> {
        let kind = payload.kind();
        let mut request = self.http.post(self.jobs_url.clone()).json(&payload);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(kind, status = status.as_u16(), "job creation rejected");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let job: Job = response.json().await?;
        tracing::debug!(job = %job.id, kind, status = %job.status, "job created");
        Ok(job)
    }

    /// Create a job and wait until its `jobEnd` arrives on `bus`.
    pub async fn run_job(&self, bus: &EventBus, payload: JobPayload) -> Result<(), WaitError> {
        wait_for_job_completion(bus, |payload| self.create_job(payload), payload).await
    }
}
