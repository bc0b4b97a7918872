use thiserror::Error;

/// Failure taxonomy at the client boundary. Every public operation folds
/// these into an `ApiResponse` failure envelope instead of surfacing them
/// to callers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Business(String),

    #[error("Invalid input: {0}")]
    Validation(String),
}

impl From<String> for ApiError {
    fn from(message: String) -> Self {
        ApiError::Business(message)
    }
}

impl From<&str> for ApiError {
    fn from(message: &str) -> Self {
        ApiError::Business(message.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
