/// Department listing
///
/// ```text
/// GET /departments
/// Authorization: Bearer <token>
/// ```

use axum::{extract::State, http::Method, Json};
use clinic_shared::{db::pool::with_connection, models::department::Department};

use super::ensure_method;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

const ALLOWED: &[Method] = &[Method::GET];

/// Lists departments ordered by name
pub async fn list_departments(State(state): State<AppState>, method: Method) -> ApiResult<Json<Vec<Department>>> {
    ensure_method(&method, ALLOWED)?;

    let departments = with_connection(&state.db, |mut conn| async move { Department::list(&mut *conn).await })
        .await
        .map_err(|e| ApiError::Internal(format!("Error fetching departments: {}", e)))?;

    Ok(Json(departments))
}
