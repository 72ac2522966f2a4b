//! Error types for the research client.

use serde::Deserialize;
use stock_research_core::ResearchError;

/// Result type for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

/// Error types that can occur when fetching research data.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Yahoo refused to issue a session crumb.
    #[error("Could not obtain Yahoo session crumb: {0}")]
    Crumb(String),

    /// Ticker, CIK or document not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Building a report from the fetched data failed.
    #[error(transparent)]
    Research(#[from] ResearchError),
}

impl SdkError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// True for a 401 from Yahoo, which means the crumb went stale.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    /// Create an API error from a status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<YahooErrorEnvelope>(body)
            .ok()
            .and_then(YahooErrorEnvelope::description)
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    trimmed.to_string()
                }
            });

        Self::Api { status, message }
    }
}

/// Yahoo error bodies look like `{"quoteSummary": {"error": {..}}}` or
/// `{"finance": {"error": {..}}}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooErrorEnvelope {
    quote_summary: Option<YahooErrorHolder>,
    finance: Option<YahooErrorHolder>,
}

#[derive(Debug, Deserialize)]
struct YahooErrorHolder {
    error: Option<YahooErrorBody>,
}

#[derive(Debug, Deserialize)]
struct YahooErrorBody {
    code: Option<String>,
    description: Option<String>,
}

impl YahooErrorEnvelope {
    fn description(self) -> Option<String> {
        let body = self
            .quote_summary
            .and_then(|h| h.error)
            .or_else(|| self.finance.and_then(|h| h.error))?;
        body.description.or(body.code)
    }
}
