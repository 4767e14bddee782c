/// Read-through caching over an optional [`Cache`](crate::db::Cache).
///
/// On a hit the cached value is returned. On a miss the block is awaited, its
/// value queued for a background write, and returned. A failed cache read is
/// logged and handled as a miss so the cache can never turn a successful
/// upstream fetch into an error. With no cache configured the block runs
/// directly.
///
/// # Arguments
/// * `$cache`: an `Option<Cache>`.
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) for the value.
/// * `$ttl`: time-to-live in seconds.
/// * `$block`: a future producing `AppResult<T>`.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, CacheKey::Popular, POPULAR_TTL, async move {
///     fetch_popular().await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let fetch = $block;
        match &$cache {
            Some(cache) => {
                let hit = match cache.get_from_cache(&key).await {
                    Ok(hit) => hit,
                    Err(e) => {
                        tracing::warn!(error = %e, key = %key, "Cache read failed, fetching upstream");
                        None
                    }
                };
                match hit {
                    Some(cached) => Ok(cached),
                    None => {
                        let value = fetch.await?;
                        cache.set_in_background(&key, &value, $ttl);
                        Ok(value)
                    }
                }
            }
            None => fetch.await,
        }
    }};
}
