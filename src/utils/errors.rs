use thiserror::Error;

/// Main error type for the client shell
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("UI error: {0}")]
    UIError(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Failure of a single exchange with the answering service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned status {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ExchangeError {
    /// Descriptive detail supplied by the server, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ExchangeError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ExchangeError::Malformed(err.to_string())
        } else {
            ExchangeError::Network(err.to_string())
        }
    }
}

/// Tab-scoped storage failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
