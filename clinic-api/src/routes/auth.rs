/// Authentication endpoints
///
/// - `POST /auth/login`: exchange email and password for an access token
/// - `POST /auth/register`: create a staff account (ADMIN only)
///
/// Both endpoints answer every other method with 405.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode},
    Extension, Json,
};
use clinic_shared::{
    auth::{
        authorization::require_role,
        jwt::{create_token, Claims},
        password::{hash_password, verify_password},
        principal::Principal,
    },
    db::pool::{with_connection, PoolError},
    models::user::{CreateUser, Role, User, UserCredentials},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ensure_method;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};

const ALLOWED: &[Method] = &[Method::POST];

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,

    pub user: User,
}

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,

    /// One of ADMIN, DOCTOR, NURSE, FRONTDESK, STAFF; defaults to STAFF
    pub role: Option<String>,

    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    pub department: Option<String>,
}

impl RegisterRequest {
    fn role(&self) -> ApiResult<Role> {
        match self.role.as_deref() {
            None => Ok(Role::Staff),
            Some(raw) => raw.parse().map_err(|_| {
                ApiError::Validation(vec![ValidationErrorDetail {
                    field: "role".to_string(),
                    message: "Role must be one of ADMIN, DOCTOR, NURSE, FRONTDESK, STAFF".to_string(),
                }])
            }),
        }
    }
}

/// Logs a user in
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {"email": "nurse@clinic.test", "password": "..."}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: body missing or invalid
/// - `401 Unauthorized`: unknown email or wrong password
/// - `403 Forbidden`: account deactivated
pub async fn login(
    State(state): State<AppState>,
    method: Method,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    ensure_method(&method, ALLOWED)?;

    let Json(req) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    req.validate()?;

    let email = req.email.trim().to_lowercase();
    let lookup = email.clone();
    let credentials = with_connection(&state.db, |mut conn| async move {
        UserCredentials::find_by_email(&mut *conn, &lookup).await
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Error fetching user: {}", e)))?;

    // Same answer for unknown email and wrong password
    let Some(credentials) = credentials else {
        tracing::info!(email = %email, "Login failed: unknown email");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    let password = req.password;
    let hash = credentials.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Password verification task failed: {}", e)))??;

    if !matches {
        tracing::info!(user_id = %credentials.id, "Login failed: wrong password");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    if !credentials.is_active {
        tracing::info!(user_id = %credentials.id, "Login refused: account deactivated");
        return Err(ApiError::Forbidden("Account is deactivated".to_string()));
    }

    let user = credentials.into_user();
    let claims = Claims::for_user(&user, state.token_lifetime());
    let token = create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
    Ok(Json(LoginResponse { token, user }))
}

/// Registers a new account
///
/// ```text
/// POST /auth/register
/// Authorization: Bearer <admin token>
/// Content-Type: application/json
///
/// {
///   "email": "new.nurse@clinic.test",
///   "password": "at-least-8",
///   "first_name": "Ana",
///   "last_name": "Lima",
///   "role": "NURSE"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: body missing or invalid
/// - `401 Unauthorized`: caller's account no longer exists
/// - `403 Forbidden`: caller is not an active ADMIN
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    method: Method,
    Extension(principal): Extension<Principal>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    ensure_method(&method, ALLOWED)?;
    require_role(&principal, &[Role::Admin])?;

    let Json(req) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    req.validate()?;
    let role = req.role()?;

    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))??;

    let data = CreateUser {
        email: req.email.trim().to_lowercase(),
        password_hash,
        first_name: req.first_name,
        last_name: req.last_name,
        role,
        department: req.department,
        created_by: Some(principal.user_id),
    };

    let user = with_connection(&state.db, |mut conn| async move { User::create(&mut *conn, data).await })
        .await
        .map_err(|err| match err {
            PoolError::Query(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                ApiError::Conflict("User already exists".to_string())
            }
            // created_by points at the caller, whose account is gone
            PoolError::Query(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                tracing::warn!(user_id = %principal.user_id, "Register attempted with a token for a deleted account");
                ApiError::Unauthorized("Account no longer exists".to_string())
            }
            other => ApiError::Internal(format!("Error creating user: {}", other)),
        })?;

    tracing::info!(
        user_id = %user.id,
        role = %user.role,
        created_by = %principal.user_id,
        "Registered user"
    );

    Ok((StatusCode::CREATED, Json(user)))
}
