/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use clinic_api::{app::{build_router, AppState}, config::Config};
/// use clinic_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(&config.database.pool_config()?)?;
/// let state = AppState::new(pool, config)?;
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::ApiError,
    middleware::auth::require_auth,
    routes,
};
use axum::{
    http::{header, HeaderValue, Method, Uri},
    middleware,
    routing::{any, get},
    Router,
};
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through Axum's `State` extractor. The pool is
/// built once by `main` and injected here; handlers never create their own.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Cross-origin policy wrapped around every route
    pub cors: CorsLayer,
}

impl AppState {
    /// Creates application state
    ///
    /// # Errors
    ///
    /// Fails if `CORS_ALLOWED_ORIGIN` is not a valid header value.
    pub fn new(db: PgPool, config: Config) -> anyhow::Result<Self> {
        let cors = cors_layer(&config.api.cors_allowed_origin)?;

        Ok(Self {
            db,
            config: Arc::new(config),
            cors,
        })
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Lifetime of newly issued access tokens
    pub fn token_lifetime(&self) -> Duration {
        Duration::hours(self.config.jwt.expiration_hours)
    }
}

/// Builds the complete router
///
/// ```text
/// /
/// ├── GET  /health            # liveness probe (public)
/// ├── POST /auth/login        # issue access token (public)
/// ├── POST /auth/register     # create account (ADMIN)
/// ├── GET  /users             # list users
/// ├── GET  /beds              # list beds, ?status= filter
/// ├── GET  /beds/:id          # one bed
/// └── GET  /departments       # list departments
/// ```
///
/// Resource routes accept every method and reject unsupported ones
/// themselves, so the 405 body and `Allow` header stay under our control.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/login", any(routes::auth::login));

    let protected = Router::new()
        .route("/auth/register", any(routes::auth::register))
        .route("/users", any(routes::users::list_users))
        .route("/beds", any(routes::beds::list_beds))
        .route("/beds/:id", any(routes::beds::get_bed))
        .route("/departments", any(routes::departments::list_departments));

    compose(public, protected, state)
}

/// Assembles the interceptor chain around two sets of routes
///
/// Outermost to innermost:
///
/// 1. Tracing (tower-http `TraceLayer`)
/// 2. CORS: answers preflight requests and decorates every response
/// 3. Authentication: `protected` routes only
/// 4. Handler
///
/// `public` routes skip step 3.
pub fn compose(public: Router<AppState>, protected: Router<AppState>, state: AppState) -> Router {
    let protected = protected.route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(not_found)
        .layer(state.cors.clone())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Builds the CORS layer for `allowed_origin`
///
/// `*` allows any origin. Anything else is a single exact origin, e.g.
/// `https://clinic.example.org`.
pub fn cors_layer(allowed_origin: &str) -> anyhow::Result<CorsLayer> {
    if allowed_origin == "*" {
        return Ok(CorsLayer::permissive());
    }

    let origin: HeaderValue = allowed_origin
        .parse()
        .map_err(|e| anyhow::anyhow!("CORS_ALLOWED_ORIGIN is not a valid header value: {}", e))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(86400)))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Endpoint not found: {}", uri.path()))
}
