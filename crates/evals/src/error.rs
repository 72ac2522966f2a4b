// Error types for the structure checks

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid rule file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid baseline: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type EvalResult<T> = Result<T, EvalError>;
