//! Movie catalog abstraction
//!
//! The recommendation pipeline only talks to the external movie metadata
//! service through [`MovieCatalog`], so tests can substitute a mock and the
//! TMDB client stays a thin, swappable adapter.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::{
    error::AppResult,
    models::{MovieDetail, MovieSummary},
};

pub mod tmdb;

pub use tmdb::TmdbCatalog;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Full detail of one movie, including genres and credits
    async fn movie_detail(&self, id: &str) -> AppResult<MovieDetail>;

    /// Titles the catalog suggests for viewers of `id`
    async fn recommendations(&self, id: &str) -> AppResult<Vec<MovieSummary>>;

    /// Currently popular titles
    async fn popular_movies(&self) -> AppResult<Vec<MovieSummary>>;

    /// Raw JSON of a catalog resource such as `search/movie`, for browsing
    async fn browse(&self, path: &str, params: &[(String, String)]) -> AppResult<Value>;

    /// Catalog name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Runs `fetch` for every id as its own task and joins them in input order.
///
/// A failed or panicked fetch yields `None` in its slot; it never fails the
/// batch.
pub async fn fan_out<T, F, Fut>(
    catalog: &Arc<dyn MovieCatalog>,
    ids: &[String],
    fetch: F,
) -> Vec<Option<T>>
where
    T: Send + 'static,
    F: Fn(Arc<dyn MovieCatalog>, String) -> Fut,
    Fut: Future<Output = AppResult<T>> + Send + 'static,
{
    let tasks: Vec<_> = ids
        .iter()
        .map(|id| {
            let task = tokio::spawn(fetch(catalog.clone(), id.clone()));
            (id, task)
        })
        .collect();

    let mut results = Vec::with_capacity(tasks.len());
    let mut failures = 0usize;

    for (id, task) in tasks {
        match task.await {
            Ok(Ok(value)) => results.push(Some(value)),
            Ok(Err(e)) => {
                tracing::debug!(movie_id = %id, error = %e, catalog = catalog.name(), "Catalog lookup failed");
                failures += 1;
                results.push(None);
            }
            Err(e) => {
                tracing::error!(movie_id = %id, error = %e, "Catalog lookup task failed");
                failures += 1;
                results.push(None);
            }
        }
    }

    if failures > 0 {
        tracing::warn!(
            success_count = results.len() - failures,
            error_count = failures,
            "Partial catalog fetch failure"
        );
    }

    results
}

/// Fetches details for every id concurrently
pub async fn fetch_details(
    catalog: &Arc<dyn MovieCatalog>,
    ids: &[String],
) -> Vec<Option<MovieDetail>> {
    fan_out(catalog, ids, |catalog, id| async move {
        catalog.movie_detail(&id).await
    })
    .await
}

/// Fetches the recommendation feed of every id concurrently
pub async fn fetch_recommendation_feeds(
    catalog: &Arc<dyn MovieCatalog>,
    ids: &[String],
) -> Vec<Option<Vec<MovieSummary>>> {
    fan_out(catalog, ids, |catalog, id| async move {
        catalog.recommendations(&id).await
    })
    .await
}
