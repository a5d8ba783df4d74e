//! # Error Types
//!
//! Error response body shared by Event Mosaic HTTP services.
//!
//! Every 4xx/5xx answer carries the same JSON shape so that the map front-end
//! can render failures without knowing which service produced them:
//!
//! ```json
//! {
//!   "timestamp": "2025-06-20T12:00:00Z",
//!   "status": 404,
//!   "error": "Not Found",
//!   "message": "Event with ID 42 not found",
//!   "path": "/api/v1/events/42"
//! }
//! ```

use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error body returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// When the error was produced
    pub timestamp: DateTime<Utc>,
    /// HTTP status code
    pub status: u16,
    /// Reason phrase of the status code
    pub error: String,
    /// Human readable description
    pub message: String,
    /// Request path that failed
    pub path: String,
}

impl ErrorResponse {
    pub fn new(status: u16, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status,
            error: reason_phrase(status).to_string(),
            message: message.into(),
            path: path.into(),
        }
    }
}

/// Canonical reason phrase of `status`, `"Error"` for codes without one
pub fn reason_phrase(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Error")
}
