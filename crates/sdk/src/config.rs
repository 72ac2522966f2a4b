//! Configuration types for the research client.

use std::time::Duration;
use url::Url;

pub const YAHOO_BASE_URL: &str = "https://query2.finance.yahoo.com/";
pub const YAHOO_SESSION_URL: &str = "https://fc.yahoo.com/";
pub const SEC_WWW_URL: &str = "https://www.sec.gov/";
pub const SEC_DATA_URL: &str = "https://data.sec.gov/";

/// Configuration for the research client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Yahoo Finance API host (quoteSummary, search, crumb).
    pub yahoo_base_url: Url,
    /// Page that hands out the Yahoo session cookie.
    pub yahoo_session_url: Url,
    /// SEC website (company ticker map, archives).
    pub sec_www_url: Url,
    /// SEC data API (submissions).
    pub sec_data_url: Url,
    /// User agent sent to Yahoo.
    pub user_agent: String,
    /// User agent sent to SEC, which requires a contact address.
    pub sec_user_agent: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry configuration.
    pub retry_config: RetryConfig,
}

/// Retry policy for rate limiting, server errors and timeouts.
///
/// Yahoo answers bursts with 429 and SEC with 503, so both are retried
/// with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: f64,
    pub retry_on_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::with_max_retries(3)
    }
}

impl RetryConfig {
    /// Default backoff schedule with `max_retries` attempts after the first.
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            retry_on_status_codes: vec![429, 500, 502, 503, 504],
        }
    }

    /// Fail on the first error.
    pub fn no_retry() -> Self {
        Self::with_max_retries(0)
    }

    /// Delay before retry number `attempt` (0-based), capped at `max_backoff`.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let secs = self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);
        Duration::from_secs_f64(secs.min(self.max_backoff.as_secs_f64()))
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status_codes.contains(&status)
    }
}
