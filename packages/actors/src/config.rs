//! Notifier configuration.

use notify_core::Durations;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid notifier config: {0}")]
    Invalid(String),
}

/// Timing knobs for the notification timeline, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Duration applied to pushed notifications that do not specify one.
    /// `None` keeps them until removed.
    pub default_duration_ms: Option<u64>,
    /// Lifetime of a notification once its job is done.
    pub done_duration_ms: u64,
    /// Lifetime of a notification once its job failed.
    pub failed_duration_ms: u64,
    /// Delay before a manually dismissed head is removed.
    pub dismiss_delay_ms: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        let durations = Durations::default();
        Self {
            default_duration_ms: None,
            done_duration_ms: durations.done_ms,
            failed_duration_ms: durations.failed_ms,
            dismiss_delay_ms: 1000,
        }
    }
}

impl NotifierConfig {
    /// Build a config from environment variables.
    ///
    /// - `NOTIFY_DEFAULT_DURATION_MS` (`sticky` or a number, default: sticky)
    /// - `NOTIFY_DONE_DURATION_MS` (default: 1000)
    /// - `NOTIFY_FAILED_DURATION_MS` (default: 5000)
    /// - `NOTIFY_DISMISS_DELAY_MS` (default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).and_then(non_empty);
        let defaults = Self::default();

        let default_duration_ms = match get("NOTIFY_DEFAULT_DURATION_MS") {
            None => defaults.default_duration_ms,
            Some(v) if v.eq_ignore_ascii_case("sticky") => None,
            Some(v) => Some(parse_ms("NOTIFY_DEFAULT_DURATION_MS", &v)?),
        };

        let ms_or = |key: &str, fallback: u64| -> Result<u64, ConfigError> {
            match get(key) {
                Some(v) => parse_ms(key, &v),
                None => Ok(fallback),
            }
        };

        Ok(Self {
            default_duration_ms,
            done_duration_ms: ms_or("NOTIFY_DONE_DURATION_MS", defaults.done_duration_ms)?,
            failed_duration_ms: ms_or("NOTIFY_FAILED_DURATION_MS", defaults.failed_duration_ms)?,
            dismiss_delay_ms: ms_or("NOTIFY_DISMISS_DELAY_MS", defaults.dismiss_delay_ms)?,
        })
    }

    /// Set the default duration for pushes that omit one.
    pub fn with_default_duration(mut self, duration_ms: Option<u64>) -> Self {
        self.default_duration_ms = duration_ms;
        self
    }

    /// Set the terminal durations.
    pub fn with_durations(mut self, done_ms: u64, failed_ms: u64) -> Self {
        self.done_duration_ms = done_ms;
        self.failed_duration_ms = failed_ms;
        self
    }

    /// Set the manual dismissal delay.
    pub fn with_dismiss_delay(mut self, delay_ms: u64) -> Self {
        self.dismiss_delay_ms = delay_ms;
        self
    }

    /// Terminal durations for the presentation table.
    pub fn durations(&self) -> Durations {
        Durations {
            done_ms: self.done_duration_ms,
            failed_ms: self.failed_duration_ms,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_ms(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(format!("{key}={value} is not a millisecond count")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = NotifierConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, NotifierConfig::default());
        assert_eq!(config.durations(), Durations::default());
    }

    #[test]
    fn reads_overrides() {
        let config = NotifierConfig::from_lookup(lookup(&[
            ("NOTIFY_DEFAULT_DURATION_MS", "2500"),
            ("NOTIFY_DONE_DURATION_MS", " 200 "),
            ("NOTIFY_FAILED_DURATION_MS", "300"),
            ("NOTIFY_DISMISS_DELAY_MS", ""),
        ]))
        .unwrap();
        assert_eq!(config.default_duration_ms, Some(2500));
        assert_eq!(config.done_duration_ms, 200);
        assert_eq!(config.failed_duration_ms, 300);
        assert_eq!(config.dismiss_delay_ms, 1000);
    }

    #[test]
    fn sticky_keyword_disables_default_duration() {
        let config =
            NotifierConfig::from_lookup(lookup(&[("NOTIFY_DEFAULT_DURATION_MS", "Sticky")]))
                .unwrap();
        assert_eq!(config.default_duration_ms, None);
    }

    #[test]
    fn rejects_non_numeric_values() {
        let err = NotifierConfig::from_lookup(lookup(&[("NOTIFY_DONE_DURATION_MS", "1s")]));
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }
}
