/// Request interceptors
///
/// - `auth`: bearer-token authentication, attaches the `Principal`
///
/// Interceptors are `axum::middleware::from_fn_with_state` functions that
/// receive the request and a `Next` continuation. Cross-origin handling is
/// tower-http's `CorsLayer`, built in [`crate::app::cors_layer`]. Ordering
/// is fixed in [`crate::app::compose`]: CORS wraps authentication, and
/// authentication wraps the resource handlers.

pub mod auth;
