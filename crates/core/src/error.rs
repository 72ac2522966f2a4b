// Error types shared by the research building blocks

use crate::dcf::DcfError;
use thiserror::Error;

pub type ResearchResult<T> = Result<T, ResearchError>;

#[derive(Debug, Error)]
pub enum ResearchError {
    /// A field the calculation cannot do without was absent from the API response
    #[error("Could not find {field} for {ticker}")]
    MissingField { ticker: String, field: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("DCF error: {0}")]
    Dcf(#[from] DcfError),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResearchError {
    pub fn missing(ticker: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            ticker: ticker.into(),
            field: field.into(),
        }
    }
}
