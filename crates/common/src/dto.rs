use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::labels::ClassLabel;

/// Sentence prefix for every classification result
pub const RESULT_PREFIX: &str = "I have identified your question to be in the category: ";

/// Body of `POST /create-entry` and `POST /create-entry-oos`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRequest {
    pub message: String,
}

impl EntryRequest {
    /// Parse a raw request body.
    ///
    /// Anything that is not a JSON object with a string `message` field is a
    /// client error, whatever the reason serde gives.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| Error::BadRequest(format!("Invalid request body: {}", e)))?;

        // serde would also build the struct from a sequence like `["hi"]`
        if !value.is_object() {
            return Err(Error::BadRequest("Request body must be a JSON object".to_string()));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::BadRequest(format!("Invalid request body: {}", e)))
    }
}

/// Successful classification response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryResponse {
    pub result: String,
}

impl EntryResponse {
    pub fn for_label(label: ClassLabel) -> Self {
        Self {
            result: format!("{}{}", RESULT_PREFIX, label),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub models_loaded: usize,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}
