//! Error handling for the application

use thiserror::Error;

/// Rate-source errors. These are always recovered locally: the bank is
/// omitted from the run and recorded in the failure list.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Unexpected status code: {0}")]
    BadStatus(u16),

    #[error("Invalid extraction pattern: {0}")]
    InvalidPattern(String),
}

/// Store-related errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization failed: {0}")]
    Serialize(String),
}

/// Notification delivery errors
#[derive(Error, Debug, Clone)]
pub enum NotifyError {
    #[error("Webhook request failed: {0}")]
    WebhookFailed(String),

    #[error("Webhook returned status {0}")]
    WebhookStatus(u16),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Source error: {0}")]
    SourceError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Notification error: {0}")]
    NotifyError(String),

    #[error("No rates collected for any tracked bank")]
    NoDataCollected,
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::SourceError(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::StoreError(err.to_string())
    }
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        AppError::NotifyError(err.to_string())
    }
}
