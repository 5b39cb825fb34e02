//! Runtime settings for talking to subtitle sites.
//!
//! Values come from environment variables, falling back to defaults that
//! suit the public sites; a settings record can also be built directly.

use core::time::Duration;
use std::env;

/// Desktop browser User-Agent. Some sites refuse downloads without one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Network and streaming settings shared by every source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeConfig {
    /// Per-request timeout in seconds
    pub http_timeout_secs: u64,
    /// Timeout for availability probes in seconds
    pub probe_timeout_secs: u64,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Capacity of the streaming search channel
    pub stream_buffer: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: 30,
            probe_timeout_secs: 20,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            stream_buffer: 10,
        }
    }
}

impl ScrapeConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `BETTERCOPE_HTTP_TIMEOUT_SECS`: request timeout (default: 30, minimum 1)
    /// - `BETTERCOPE_PROBE_TIMEOUT_SECS`: availability probe timeout (default: 20, minimum 1)
    /// - `BETTERCOPE_USER_AGENT`: User-Agent header (default: a desktop browser)
    /// - `BETTERCOPE_STREAM_BUFFER`: streaming channel capacity (default: 10, minimum 1)
    ///
    /// Unparsable values fall back to their default.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let http_timeout_secs = env::var("BETTERCOPE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(defaults.http_timeout_secs)
            .max(1);
        let probe_timeout_secs = env::var("BETTERCOPE_PROBE_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(defaults.probe_timeout_secs)
            .max(1);
        let user_agent = env::var("BETTERCOPE_USER_AGENT")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .unwrap_or(defaults.user_agent);
        let stream_buffer = env::var("BETTERCOPE_STREAM_BUFFER")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(defaults.stream_buffer)
            .max(1);
        Self {
            http_timeout_secs,
            probe_timeout_secs,
            user_agent,
            stream_buffer,
        }
    }

    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}
