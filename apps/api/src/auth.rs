//! Access Guard — a single static shared credential on the `X-API-Key`
//! header gates the administration endpoints.

use axum::http::HeaderMap;

use crate::errors::AppError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects with `Forbidden` unless the presented header matches the
/// configured secret. Called before any administration logic runs.
pub fn require_api_key(headers: &HeaderMap, expected: &str) -> Result<(), AppError> {
    let presented = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if presented == expected {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
