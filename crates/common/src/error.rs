use thiserror::Error;
use serde::Serialize;

/// Common error type for the intent server with clear taxonomy
#[derive(Error, Debug)]
pub enum Error {
    /// Client request errors (4xx)
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Model lifecycle errors
    #[error("Model loading failed: {0}")]
    ModelLoadFailed(String),

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO and serialization errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic anyhow error for flexibility
    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Get HTTP status code for the error
    pub fn status_code(&self) -> u16 {
        match self {
            // 4xx Client Errors
            Error::BadRequest(_) => 400,
            Error::NotFound(_) => 404,

            // 5xx Server Errors
            Error::ModelLoadFailed(_) => 503,
            Error::PredictionFailed(_) => 500,
            Error::Internal(_) => 500,
            Error::ConfigError(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::Anyhow(_) => 500,
        }
    }

    /// Get error type for metrics/logging
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::BadRequest(_) => "bad_request",
            Error::NotFound(_) => "not_found",
            Error::ModelLoadFailed(_) => "model_load_failed",
            Error::PredictionFailed(_) => "prediction_failed",
            Error::Internal(_) => "internal",
            Error::ConfigError(_) => "config_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::Anyhow(_) => "unknown",
        }
    }

    /// Whether the error was caused by the caller rather than the server
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Error response for HTTP API
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        ErrorResponse {
            error: ErrorDetail {
                message: err.to_string(),
                r#type: err.error_type().to_string(),
                code: err.status_code(),
                request_id: None,
            },
        }
    }
}

impl ErrorResponse {
    /// Attach the correlation id of the failed request
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.error.request_id = Some(request_id.into());
        self
    }
}

pub type Result<T> = std::result::Result<T, Error>;
