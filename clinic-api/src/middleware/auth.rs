/// Authentication interceptor
///
/// Resolves the bearer token into a [`Principal`] and inserts it into the
/// request extensions before continuing. Missing, malformed and expired
/// tokens end the request with 401 and the handler is never called.
///
/// Role checks are not done here; handlers that need them call
/// [`require_role`](clinic_shared::auth::authorization::require_role).

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use clinic_shared::auth::principal::{authenticate, Principal};
use tracing::{debug, warn};

use crate::{app::AppState, error::ApiError};

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal: Principal = authenticate(req.headers(), state.jwt_secret()).map_err(|err| {
        warn!(
            method = %req.method(),
            path = %req.uri().path(),
            error = %err,
            "Rejected unauthenticated request"
        );
        ApiError::from(err)
    })?;

    debug!(user_id = %principal.user_id, role = %principal.role, "Authenticated request");

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}
