/// JWT token generation and validation
///
/// Access tokens are HS256-signed and carry enough of the user row to build
/// a [`Principal`](super::principal::Principal) without touching the
/// database on every request.
///
/// # Security
///
/// - **Algorithm**: HS256 only; tokens with any other `alg` are rejected
/// - **Expiration**: 24 hours unless configured otherwise
/// - **Validation**: signature, `exp`, `nbf` and issuer
/// - **Secret**: at least 32 bytes, supplied by configuration
///
/// # Example
///
/// ```
/// use clinic_shared::auth::jwt::{create_token, validate_token, Claims};
/// use clinic_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-test-secret-that-is-32-bytes-long!";
/// let claims = Claims::new(Uuid::new_v4(), "nurse@clinic.test", Role::Nurse);
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.role, Role::Nurse);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{Role, User};

/// Value of the `iss` claim on every token this service issues
pub const ISSUER: &str = "clinic-api";

/// Default access token lifetime
pub const DEFAULT_EXPIRATION_HOURS: i64 = 24;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Token is not valid yet")]
    NotYetValid,

    #[error("Invalid issuer")]
    InvalidIssuer,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// JWT claims
///
/// `sub` is the user id. The remaining custom claims mirror the user row at
/// the time of login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    /// Account was active when the token was issued
    pub active: bool,

    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    /// Creates claims for an active account with the default lifetime
    pub fn new(user_id: Uuid, email: impl Into<String>, role: Role) -> Self {
        Self::with_expiration(user_id, email, role, Duration::hours(DEFAULT_EXPIRATION_HOURS))
    }

    /// Creates claims with a custom lifetime
    ///
    /// A negative duration produces an already-expired token, which is
    /// handy in tests.
    pub fn with_expiration(user_id: Uuid, email: impl Into<String>, role: Role, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            email: email.into(),
            role,
            first_name: String::new(),
            last_name: String::new(),
            active: true,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Builds claims from a user row
    pub fn for_user(user: &User, expires_in: Duration) -> Self {
        let mut claims = Self::with_expiration(user.id, user.email.clone(), Role::from_db(&user.role), expires_in);
        claims.first_name = user.first_name.clone();
        claims.last_name = user.last_name.clone();
        claims.active = user.is_active;
        claims
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs `claims` with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Validates signature, expiry, not-before and issuer, then returns the claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            ErrorKind::ImmatureSignature => JwtError::NotYetValid,
            ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
            _ => JwtError::Invalid(e.to_string()),
        })
}
