//! Database pool setup and migrations

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;

use crewdesk_core::Config;

/// Connect to Postgres and run pending migrations.
pub async fn setup_database(config: &Config) -> Result<PgPool, anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .connect(&config.database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

    run_migrations(&pool).await?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database pool ready"
    );
    Ok(pool)
}

/// Apply migrations from the workspace-level migrations directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    let migrations_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load migrations: {}", e))?;
    migrator
        .run(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    tracing::info!("Database migrations applied");
    Ok(())
}
