use db_pool::{create_pool as create_pg_pool, DbConfig as DbPoolConfig};
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::{Pool, Postgres};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn init_pool(database_url: &str) -> Result<Pool<Postgres>, sqlx::Error> {
    let cfg = DbPoolConfig::with_url("chat-service", database_url);
    cfg.log_config();
    create_pg_pool(cfg).await
}

/// Apply embedded migrations (idempotent)
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}
