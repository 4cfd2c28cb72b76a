//! HTTP handlers for the bible study API.

pub mod fallback;
pub mod health;
pub mod metrics;
pub mod scripture;
pub mod study;

pub use health::health_check;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use serde::de::DeserializeOwned;
use service_core::error::AppError;

/// Unwrap a query string, reporting malformed ones as a JSON 400.
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid query string: {}", e)))
}

/// Decode an optional JSON object body.
///
/// An empty body, invalid JSON, a non-object or `{}` all count as "no body".
/// A JSON object with wrongly typed fields is a 400.
pub(crate) fn json_body<T: DeserializeOwned>(body: &Bytes) -> Result<Option<T>, AppError> {
    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => return Ok(None),
    };

    match value {
        serde_json::Value::Object(map) if !map.is_empty() => {
            serde_json::from_value(serde_json::Value::Object(map))
                .map(Some)
                .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid request body: {}", e)))
        }
        _ => Ok(None),
    }
}
