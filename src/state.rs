use std::sync::Arc;

use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    config::Config,
    db::{
        create_pool, create_redis_client, migrate_when_available, run_migrations, Cache,
        CacheWriterHandle, InMemoryUserStore, PgUserStore, SchemaStatus, UserStore,
    },
    models::User,
    services::{
        catalog::{MovieCatalog, TmdbCatalog},
        movies::MovieBrowser,
        ratings::RatingService,
        recommendations::RecommendationService,
        users::UserListService,
    },
};

/// Process-wide resources, created once at startup and released on shutdown
pub struct AppState {
    pub users: UserListService,
    pub ratings: RatingService,
    pub recommendations: RecommendationService,
    pub movies: MovieBrowser,
    background: Mutex<Background>,
}

/// Resources that need explicit teardown
#[derive(Default)]
struct Background {
    cache_writer: Option<CacheWriterHandle>,
    pg_store: Option<PgUserStore>,
    migration_retry: Option<JoinHandle<()>>,
}

impl AppState {
    /// Builds state from already-constructed collaborators
    pub fn new(catalog: Arc<dyn MovieCatalog>, store: Arc<dyn UserStore>) -> Arc<Self> {
        Arc::new(Self::assemble(catalog, store, Background::default()))
    }

    fn assemble(
        catalog: Arc<dyn MovieCatalog>,
        store: Arc<dyn UserStore>,
        background: Background,
    ) -> Self {
        Self {
            users: UserListService::new(store.clone()),
            ratings: RatingService::new(store),
            recommendations: RecommendationService::new(catalog.clone()),
            movies: MovieBrowser::new(catalog),
            background: Mutex::new(background),
        }
    }

    /// Connects the cache, user store and catalog described by `config`
    ///
    /// Neither Redis nor PostgreSQL being down prevents startup: without Redis
    /// the catalog runs uncached, and an unreachable database keeps
    /// user routes answering 503 until it comes up.
    pub async fn init(config: &Config) -> anyhow::Result<Arc<Self>> {
        let mut background = Background::default();

        let cache = match &config.redis_url {
            Some(url) => match Cache::connect(create_redis_client(url)?).await {
                Ok((cache, handle)) => {
                    tracing::info!("Redis cache connected");
                    background.cache_writer = Some(handle);
                    Some(cache)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Redis unreachable, catalog responses will not be cached");
                    None
                }
            },
            None => None,
        };

        let store: Arc<dyn UserStore> = match &config.database_url {
            Some(url) => {
                let pool = create_pool(url)?;
                let schema = SchemaStatus::default();
                if let Err(e) = run_migrations(&pool, &schema).await {
                    tracing::warn!(
                        error = %e,
                        "Database unavailable at startup, user routes will answer 503 until it is reachable"
                    );
                    background.migration_retry =
                        Some(tokio::spawn(migrate_when_available(pool.clone(), schema.clone())));
                }
                let store = PgUserStore::new(pool, schema);
                background.pg_store = Some(store.clone());
                Arc::new(store)
            }
            None => {
                let store = InMemoryUserStore::new();
                let seeds = config.seed_users();
                for (username, name) in &seeds {
                    store.insert(User::new(username.as_str(), name.as_str())).await;
                }
                tracing::warn!(
                    seeded_users = seeds.len(),
                    "DATABASE_URL not set, using the in-memory store: only SEED_USERS exist and nothing survives a restart"
                );
                Arc::new(store)
            }
        };

        let catalog: Arc<dyn MovieCatalog> = Arc::new(TmdbCatalog::new(
            cache,
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
        ));

        tracing::info!(
            catalog = catalog.name(),
            user_store = store.name(),
            "Application state initialized"
        );

        Ok(Arc::new(Self::assemble(catalog, store, background)))
    }

    /// Flushes pending cache writes and closes database connections
    pub async fn shutdown(&self) {
        let mut background = self.background.lock().await;

        if let Some(task) = background.migration_retry.take() {
            task.abort();
        }
        if let Some(handle) = background.cache_writer.take() {
            handle.shutdown().await;
        }
        if let Some(store) = background.pg_store.take() {
            store.close().await;
        }

        tracing::info!("Application state shut down");
    }
}
