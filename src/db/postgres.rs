use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

/// Delay between migration attempts while the database is unreachable
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(15);

/// Whether the embedded migrations have been applied, shared by every clone
#[derive(Debug, Clone, Default)]
pub struct SchemaStatus(Arc<AtomicBool>);

impl SchemaStatus {
    pub fn is_migrated(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn mark_migrated(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Creates a PostgreSQL connection pool
///
/// Connections are opened lazily, so the server can start while the
/// database is down and pick it up once it becomes reachable.
pub fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(4))
        .connect_lazy(database_url)?;

    Ok(pool)
}

/// Applies the embedded schema migrations and records success in `schema`
pub async fn run_migrations(pool: &PgPool, schema: &SchemaStatus) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    schema.mark_migrated();
    Ok(())
}

/// Retries migrations until they succeed
///
/// Used when the database was unreachable at startup.
pub async fn migrate_when_available(pool: PgPool, schema: SchemaStatus) {
    let mut interval = tokio::time::interval(RECONNECT_INTERVAL);
    loop {
        interval.tick().await;
        match run_migrations(&pool, &schema).await {
            Ok(()) => {
                tracing::info!("Database connected, migrations applied");
                return;
            }
            Err(e) => tracing::warn!(error = %e, "Database still unavailable"),
        }
    }
}
