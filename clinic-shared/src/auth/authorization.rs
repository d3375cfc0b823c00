/// Role checks for handlers
///
/// The authentication interceptor only establishes identity. Handlers that
/// need more call [`require_role`] with the roles they accept.

use super::principal::Principal;
use crate::models::user::Role;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthzError {
    /// Account was deactivated when the token was issued
    #[error("Account is deactivated")]
    Inactive,

    #[error("Insufficient permissions: role {actual} is not one of {required:?}")]
    InsufficientRole { required: Vec<Role>, actual: Role },
}

/// Succeeds when the principal is active and holds one of `allowed`
pub fn require_role(principal: &Principal, allowed: &[Role]) -> Result<(), AuthzError> {
    if !principal.is_active {
        return Err(AuthzError::Inactive);
    }

    if !allowed.contains(&principal.role) {
        return Err(AuthzError::InsufficientRole {
            required: allowed.to_vec(),
            actual: principal.role,
        });
    }

    Ok(())
}
