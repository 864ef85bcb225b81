//! Client configuration for the job API and its event socket.

use std::time::Duration;

use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3000/api/";
const DEFAULT_MAX_RECONNECT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid client config: {0}")]
    Invalid(String),
}

/// Where the job API lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL; always ends with `/` so endpoints join beneath it.
    pub api_url: Url,
    /// Bearer token sent with requests and on the socket handshake.
    pub access_token: Option<String>,
    /// Upper bound for the socket reconnect backoff.
    pub max_reconnect_delay: Duration,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize(api_url)?,
            access_token: None,
            max_reconnect_delay: Duration::from_secs(DEFAULT_MAX_RECONNECT_SECS),
        })
    }

    /// Build a config from environment variables.
    ///
    /// - `JOBWATCH_API_URL` (default: `http://localhost:3000/api/`)
    /// - `JOBWATCH_ACCESS_TOKEN` (optional)
    /// - `JOBWATCH_MAX_RECONNECT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let raw_url = get("JOBWATCH_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::Invalid(format!("JOBWATCH_API_URL={raw_url}: {e}")))?;

        let mut config = Self::new(api_url)?;
        config.access_token = get("JOBWATCH_ACCESS_TOKEN");

        if let Some(secs) = get("JOBWATCH_MAX_RECONNECT_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| {
                ConfigError::Invalid(format!("JOBWATCH_MAX_RECONNECT_SECS={secs} is not a second count"))
            })?;
            if secs == 0 {
                return Err(ConfigError::Invalid(
                    "JOBWATCH_MAX_RECONNECT_SECS must be positive".to_string(),
                ));
            }
            config.max_reconnect_delay = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_max_reconnect_delay(mut self, delay: Duration) -> Self {
        self.max_reconnect_delay = delay;
        self
    }

    /// `{api_url}/jobs`
    pub fn jobs_url(&self) -> Result<Url, ConfigError> {
        self.endpoint("jobs")
    }

    /// `{api_url}/socket` with a `ws`/`wss` scheme and the access token as
    /// the `accessToken` query parameter.
    pub fn socket_url(&self) -> Result<Url, ConfigError> {
        let mut url = self.endpoint("socket")?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| ConfigError::Invalid(format!("cannot derive socket url from {}", self.api_url)))?;
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair("accessToken", token);
        }
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        self.api_url
            .join(path)
            .map_err(|e| ConfigError::Invalid(format!("cannot join {path} onto {}: {e}", self.api_url)))
    }
}

fn normalize(mut url: Url) -> Result<Url, ConfigError> {
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigError::Invalid(format!(
                "unsupported api url scheme `{other}`"
            )));
        }
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
