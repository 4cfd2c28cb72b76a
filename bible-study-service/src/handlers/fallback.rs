//! Unmatched paths and methods still answer with a JSON `error` body.

use service_core::error::AppError;

pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Not found"))
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
