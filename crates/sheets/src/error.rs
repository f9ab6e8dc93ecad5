use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the Google APIs.
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("google api replied {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("access token error: {0}")]
    Token(String),
    #[error("invalid service account credentials: {0}")]
    Credentials(String),
}
