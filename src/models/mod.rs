//! Data models representing database entities and API payloads.

use serde::Serialize;

/// Facility model
pub mod facility;
/// Keyfob (druppel) model
pub mod keyfob;
/// Scan log model
pub mod scan;

/// Envelope returned by mutating endpoints.
///
/// ```json
/// { "message": "Keyfob initialized successfully", "result": { "keyfob_id": 42 } }
/// ```
#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub message: String,
    pub result: T,
}

impl<T> MessageResponse<T> {
    pub fn new(message: impl Into<String>, result: T) -> Self {
        Self {
            message: message.into(),
            result,
        }
    }
}
