/// Authentication and authorization
///
/// # Modules
///
/// - [`jwt`]: HS256 access token issue and validation
/// - [`password`]: Argon2id password hashing
/// - [`principal`]: bearer-token extraction and the authenticated [`Principal`](principal::Principal)
/// - [`authorization`]: role checks performed inside handlers

pub mod authorization;
pub mod jwt;
pub mod password;
pub mod principal;
