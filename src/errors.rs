use slack_morphism::errors::SlackClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WhisperError {
    #[error("Failed to parse Slack event: {0}")]
    ParseError(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to interact with AWS services: {0}")]
    AwsError(String),

    #[error("Failed to persist whisper store: {0}")]
    StorageError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("{0}")]
    GeneralError(String),
}

impl From<SlackClientError> for WhisperError {
    fn from(error: SlackClientError) -> Self {
        WhisperError::ApiError(error.to_string())
    }
}

impl From<reqwest::Error> for WhisperError {
    fn from(error: reqwest::Error) -> Self {
        WhisperError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for WhisperError {
    fn from(error: serde_json::Error) -> Self {
        WhisperError::StorageError(format!("serialization: {error}"))
    }
}

impl From<std::io::Error> for WhisperError {
    fn from(error: std::io::Error) -> Self {
        WhisperError::StorageError(error.to_string())
    }
}

impl From<anyhow::Error> for WhisperError {
    fn from(error: anyhow::Error) -> Self {
        WhisperError::GeneralError(error.to_string())
    }
}
