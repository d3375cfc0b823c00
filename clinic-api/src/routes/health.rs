/// Health check endpoint
///
/// Public liveness probe for load balancers and orchestrators. It acquires
/// a connection, runs `SELECT NOW()`, and releases the connection. Failures
/// are reported in the body and status code; the handler itself never
/// errors.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// `200 OK`:
///
/// ```json
/// {
///   "status": "healthy",
///   "database": "connected",
///   "timestamp": "2024-05-01T09:30:00.123456Z",
///   "version": "0.1.0"
/// }
/// ```
///
/// `500 Internal Server Error`:
///
/// ```json
/// {
///   "status": "unhealthy",
///   "database": "disconnected",
///   "timestamp": "2024-05-01T09:30:00.123456Z",
///   "version": "0.1.0",
///   "error": "Database unreachable"
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use clinic_shared::db::pool::{get_pool_stats, health_check as probe_database};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Connected,
    Disconnected,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub database: DatabaseStatus,

    /// Database clock when healthy, server clock otherwise
    pub timestamp: DateTime<Utc>,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match probe_database(&state.db).await {
        Ok(timestamp) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: ServiceStatus::Healthy,
                database: DatabaseStatus::Connected,
                timestamp,
                version: env!("CARGO_PKG_VERSION").to_string(),
                error: None,
            }),
        ),
        Err(err) => {
            let stats = get_pool_stats(&state.db);
            tracing::error!(
                error = %err,
                pool_size = stats.size,
                pool_idle = stats.idle,
                "Health check failed"
            );

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: ServiceStatus::Unhealthy,
                    database: DatabaseStatus::Disconnected,
                    timestamp: Utc::now(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    error: Some("Database unreachable".to_string()),
                }),
            )
        }
    }
}
