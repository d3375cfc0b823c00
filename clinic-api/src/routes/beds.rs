/// Bed endpoints
///
/// ```text
/// GET /beds[?status=available|occupied|maintenance|reserved]
/// GET /beds/:id
/// Authorization: Bearer <token>
/// ```
///
/// Listings are ordered by `bed_number`. An unknown `status` value is
/// rejected with 400 before any query runs; an empty one means no filter.

use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    http::Method,
    Json,
};
use clinic_shared::{
    db::pool::with_connection,
    models::bed::{Bed, BedStatus},
};
use serde::Deserialize;
use uuid::Uuid;

use super::ensure_method;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

const ALLOWED: &[Method] = &[Method::GET];

/// Query string for `GET /beds`
#[derive(Debug, Default, Deserialize)]
pub struct BedFilter {
    pub status: Option<String>,
}

impl BedFilter {
    /// Parses the status filter; blank means none
    pub fn status(&self) -> ApiResult<Option<BedStatus>> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                let expected: Vec<&str> = BedStatus::ALL.iter().map(BedStatus::as_str).collect();
                ApiError::BadRequest(format!(
                    "Invalid status filter {:?}; expected one of: {}",
                    raw,
                    expected.join(", ")
                ))
            }),
        }
    }
}

pub async fn list_beds(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<BedFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<Bed>>> {
    ensure_method(&method, ALLOWED)?;

    let Query(filter) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let status = filter.status()?;

    let beds = with_connection(&state.db, move |mut conn| async move { Bed::list(&mut *conn, status).await })
        .await
        .map_err(|e| ApiError::Internal(format!("Error fetching beds: {}", e)))?;

    Ok(Json(beds))
}

pub async fn get_bed(
    State(state): State<AppState>,
    method: Method,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Bed>> {
    ensure_method(&method, ALLOWED)?;

    let Path(id) = id.map_err(|_| ApiError::BadRequest("Bed id must be a UUID".to_string()))?;

    let bed = with_connection(&state.db, move |mut conn| async move { Bed::find_by_id(&mut *conn, id).await })
        .await
        .map_err(|e| ApiError::Internal(format!("Error fetching bed {}: {}", id, e)))?;

    bed.map(Json)
        .ok_or_else(|| ApiError::NotFound("Bed not found".to_string()))
}
