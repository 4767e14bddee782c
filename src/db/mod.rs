pub mod memory;
pub mod postgres;
pub mod redis;
pub mod users;

pub use memory::InMemoryUserStore;
pub use postgres::{create_pool, migrate_when_available, run_migrations, SchemaStatus};
pub use self::redis::create_redis_client;
pub use self::redis::Cache;
pub use self::redis::CacheKey;
pub use self::redis::CacheWriterHandle;
pub use users::{PgUserStore, UserStore};

#[cfg(test)]
pub use users::MockUserStore;
