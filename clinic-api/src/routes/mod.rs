/// API route handlers
///
/// - `health`: liveness probe (public)
/// - `auth`: login (public) and registration (ADMIN)
/// - `users`, `beds`, `departments`: read-only resource listings
///
/// Resource handlers check the HTTP method first with [`ensure_method`],
/// then validate parameters, then run one parameterized query through the
/// pool. Storage failures become a generic 500.

pub mod auth;
pub mod beds;
pub mod departments;
pub mod health;
pub mod users;

use axum::http::Method;

use crate::error::{ApiError, ApiResult};

/// Rejects `method` with 405 unless it is one of `allowed`
pub fn ensure_method(method: &Method, allowed: &[Method]) -> ApiResult<()> {
    if allowed.contains(method) {
        Ok(())
    } else {
        Err(ApiError::MethodNotAllowed {
            method: method.clone(),
            allowed: allowed.to_vec(),
        })
    }
}
