/// User listing
///
/// ```text
/// GET /users
/// Authorization: Bearer <token>
/// ```
///
/// Returns every user (without password hashes), newest first.

use axum::{extract::State, http::Method, Extension, Json};
use clinic_shared::{
    auth::principal::Principal,
    db::pool::with_connection,
    models::user::User,
};

use super::ensure_method;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

const ALLOWED: &[Method] = &[Method::GET];

pub async fn list_users(
    State(state): State<AppState>,
    method: Method,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<User>>> {
    ensure_method(&method, ALLOWED)?;

    let users = with_connection(&state.db, |mut conn| async move { User::list(&mut *conn).await })
        .await
        .map_err(|e| ApiError::Internal(format!("Error fetching users: {}", e)))?;

    tracing::debug!(requested_by = %principal.user_id, count = users.len(), "Listed users");
    Ok(Json(users))
}
