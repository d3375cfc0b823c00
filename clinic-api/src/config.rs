/// Configuration management for the API server
///
/// Configuration comes from environment variables (and an optional `.env`
/// file in development). Database credentials have no built-in fallback:
/// either `DATABASE_URL` or the discrete `DB_*` variables must be set.
///
/// # Environment Variables
///
/// | Variable | Default | Notes |
/// |---|---|---|
/// | `API_HOST` | `0.0.0.0` | |
/// | `API_PORT` | `8080` | |
/// | `CORS_ALLOWED_ORIGIN` | `*` | value of `Access-Control-Allow-Origin` |
/// | `DATABASE_URL` | | takes precedence over `DB_*` |
/// | `DB_HOST`, `DB_NAME`, `DB_USER`, `DB_PASSWORD` | | required without `DATABASE_URL` |
/// | `DB_PORT` | `5432` | |
/// | `DB_TLS` | `true` | |
/// | `DB_TLS_REJECT_UNAUTHORIZED` | `true` | `false` accepts self-signed certificates |
/// | `DB_TLS_ROOT_CERT` | | PEM trust root |
/// | `DB_MAX_CONNECTIONS` | `10` | |
/// | `DB_MIN_CONNECTIONS` | `0` | |
/// | `DB_ACQUIRE_TIMEOUT_SECONDS` | `10` | |
/// | `DB_IDLE_TIMEOUT_SECONDS` | `30` | |
/// | `DB_RUN_MIGRATIONS` | `false` | |
/// | `JWT_SECRET` | | required, at least 32 characters |
/// | `JWT_EXPIRATION_HOURS` | `24` | |
/// | `LOG_FORMAT` | `pretty` | `json` for structured output |
///
/// # Example
///
/// ```no_run
/// use clinic_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::{bail, Context};
use clinic_shared::db::pool::{ConnectTarget, PoolConfig, TlsPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub log_format: LogFormat,
}

/// HTTP listener and CORS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Value sent as `Access-Control-Allow-Origin`
    pub cors_allowed_origin: String,
}

/// Database connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection string, if given
    pub url: Option<String>,

    pub host: Option<String>,
    pub port: u16,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,

    pub tls: bool,
    pub tls_reject_unauthorized: bool,
    pub tls_root_cert: Option<PathBuf>,

    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,

    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

// Keeps credentials out of logs
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("tls", &self.tls)
            .field("tls_reject_unauthorized", &self.tls_reject_unauthorized)
            .field("tls_root_cert", &self.tls_root_cert)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_seconds", &self.acquire_timeout_seconds)
            .field("idle_timeout_seconds", &self.idle_timeout_seconds)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

/// JWT configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing secret, at least 32 characters
    pub secret: String,

    /// Access token lifetime
    pub expiration_hours: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format {:?} (expected pretty or json)", other),
        }
    }
}

const MIN_JWT_SECRET_LEN: usize = 32;

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable that is missing or malformed.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars().collect())
    }

    /// Loads configuration from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> anyhow::Result<Self> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string);

        let database = DatabaseConfig {
            url: get("DATABASE_URL"),
            host: get("DB_HOST"),
            port: parse_or(&vars, "DB_PORT", 5432)?,
            name: get("DB_NAME"),
            user: get("DB_USER"),
            password: get("DB_PASSWORD"),
            tls: parse_bool_or(&vars, "DB_TLS", true)?,
            tls_reject_unauthorized: parse_bool_or(&vars, "DB_TLS_REJECT_UNAUTHORIZED", true)?,
            tls_root_cert: get("DB_TLS_ROOT_CERT").map(PathBuf::from),
            max_connections: parse_or(&vars, "DB_MAX_CONNECTIONS", 10)?,
            min_connections: parse_or(&vars, "DB_MIN_CONNECTIONS", 0)?,
            acquire_timeout_seconds: parse_or(&vars, "DB_ACQUIRE_TIMEOUT_SECONDS", 10)?,
            idle_timeout_seconds: parse_or(&vars, "DB_IDLE_TIMEOUT_SECONDS", 30)?,
            run_migrations: parse_bool_or(&vars, "DB_RUN_MIGRATIONS", false)?,
        };
        // Fail early on missing credentials rather than at first query
        database.connect_target()?;

        let jwt_secret = get("JWT_SECRET").context("JWT_SECRET environment variable is required")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            bail!("JWT_SECRET must be at least {} characters long", MIN_JWT_SECRET_LEN);
        }
        let expiration_hours: i64 = parse_or(&vars, "JWT_EXPIRATION_HOURS", 24)?;
        if expiration_hours <= 0 {
            bail!("JWT_EXPIRATION_HOURS must be positive");
        }

        Ok(Self {
            api: ApiConfig {
                host: get("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&vars, "API_PORT", 8080)?,
                cors_allowed_origin: get("CORS_ALLOWED_ORIGIN").unwrap_or_else(|| "*".to_string()),
            },
            database,
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_hours,
            },
            log_format: get("LOG_FORMAT").map(|v| v.parse::<LogFormat>()).transpose()?.unwrap_or(LogFormat::Pretty),
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

impl DatabaseConfig {
    /// Resolves where to connect, preferring `DATABASE_URL`
    pub fn connect_target(&self) -> anyhow::Result<ConnectTarget> {
        if let Some(url) = &self.url {
            return Ok(ConnectTarget::Url(url.clone()));
        }

        let missing: Vec<&str> = [
            ("DB_HOST", self.host.is_none()),
            ("DB_NAME", self.name.is_none()),
            ("DB_USER", self.user.is_none()),
            ("DB_PASSWORD", self.password.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        match (&self.host, &self.name, &self.user, &self.password) {
            (Some(host), Some(name), Some(user), Some(password)) => Ok(ConnectTarget::Discrete {
                host: host.clone(),
                port: self.port,
                database: name.clone(),
                user: user.clone(),
                password: password.clone(),
            }),
            _ => bail!(
                "database is not configured: set DATABASE_URL or {}",
                missing.join(", ")
            ),
        }
    }

    /// Builds the pool configuration
    pub fn pool_config(&self) -> anyhow::Result<PoolConfig> {
        Ok(PoolConfig {
            target: self.connect_target()?,
            tls: TlsPolicy {
                enabled: self.tls,
                reject_unauthorized: self.tls_reject_unauthorized,
                root_cert: self.tls_root_cert.clone(),
            },
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            acquire_timeout_seconds: self.acquire_timeout_seconds,
            idle_timeout_seconds: Some(self.idle_timeout_seconds),
            test_before_acquire: true,
        })
    }
}

fn parse_or<T>(vars: &HashMap<String, String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(raw) => raw.parse().with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}

fn parse_bool_or(vars: &HashMap<String, String>, key: &str, default: bool) -> anyhow::Result<bool> {
    match vars.get(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if v.is_empty() => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => bail!("{} must be a boolean, got {:?}", key, v),
        },
    }
}
