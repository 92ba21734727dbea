//! Uniform error body returned for every failed request.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub messages: Vec<String>,
}

impl ErrorResponse {
    /// Build a body stamped with the current UTC time; `error` is the status reason phrase.
    pub fn new(status: StatusCode, messages: Vec<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            messages,
        }
    }
}
