use thiserror::Error;

#[derive(Error, Debug)]
pub enum LensError {
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{source_name} responded with HTTP {status}")]
    StatusError { source_name: &'static str, status: u16 },

    #[error("{source_name} did not answer within {millis} ms")]
    TimeoutError { source_name: &'static str, millis: u128 },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl LensError {
    /// True for failures where the upstream could not be reached or refused to answer.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            LensError::RequestError(_) | LensError::StatusError { .. } | LensError::TimeoutError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LensError>;

impl From<String> for LensError {
    fn from(s: String) -> Self {
        LensError::Unknown(s)
    }
}

impl From<&str> for LensError {
    fn from(s: &str) -> Self {
        LensError::Unknown(s.to_string())
    }
}
