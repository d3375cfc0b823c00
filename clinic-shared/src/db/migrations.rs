/// Database migration runner
///
/// Migrations live in `clinic-shared/migrations/` as reversible pairs
/// (`{version}_{name}.up.sql` / `{version}_{name}.down.sql`) and are embedded
/// into the binary at compile time.
///
/// Production schemas are normally managed out of band, so the API server
/// only applies them when `DB_RUN_MIGRATIONS=true`. The database-backed
/// tests always apply them.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPool;
use tracing::{info, warn};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Migration status information
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Number of migrations recorded as applied
    pub applied_migrations: usize,

    /// Highest applied version
    pub latest_version: Option<i64>,

    /// Whether every embedded migration has been applied
    pub is_up_to_date: bool,
}

/// Applies all pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    info!(embedded = MIGRATOR.iter().count(), "Running database migrations");

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("Database migrations completed");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Migration failed");
            Err(e)
        }
    }
}

/// Reports which migrations have been applied
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let versions: Vec<i64> = sqlx::query_scalar(
        "SELECT version FROM _sqlx_migrations WHERE success = TRUE ORDER BY version",
    )
    .fetch_all(pool)
    .await?;

    let expected = MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .count();

    Ok(MigrationStatus {
        applied_migrations: versions.len(),
        latest_version: versions.last().copied(),
        is_up_to_date: versions.len() >= expected,
    })
}
