use std::collections::HashSet;

use crate::models::{MovieDetail, MovieSummary};

/// Shortest runtime, in minutes, worth recommending
pub const MIN_RUNTIME: u32 = 70;
/// Lowest catalog rating worth recommending
pub const MIN_RATING: f64 = 6.5;

/// Unions per-title recommendation feeds into a deduplicated candidate list.
///
/// Watched, watchlisted and adult titles are excluded here, before any detail
/// lookups are spent on them. Failed feeds (`None`) contribute nothing.
/// First-seen order is kept.
pub fn assemble_pool(
    feeds: Vec<Option<Vec<MovieSummary>>>,
    watched: &HashSet<&str>,
    watchlist: &HashSet<&str>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut pool = Vec::new();

    for title in feeds.into_iter().flatten().flatten() {
        if title.adult
            || watched.contains(title.id.as_str())
            || watchlist.contains(title.id.as_str())
        {
            continue;
        }
        if seen.insert(title.id.clone()) {
            pool.push(title.id);
        }
    }

    pool
}

/// Keeps a fully resolved candidate on the scoring path.
///
/// Unknown runtime and rating count as 0, so they fail.
pub fn passes_filter(movie: &MovieDetail) -> bool {
    !movie.adult
        && movie.runtime.unwrap_or(0) >= MIN_RUNTIME
        && movie.rating.unwrap_or(0.0) >= MIN_RATING
}

/// Keeps a popular title on the no-history path.
///
/// Unknown runtime counts as [`MIN_RUNTIME`] here, unlike [`passes_filter`].
pub fn passes_popular_filter(movie: &MovieSummary) -> bool {
    !movie.adult
        && movie.runtime.unwrap_or(MIN_RUNTIME) >= MIN_RUNTIME
        && movie.rating.unwrap_or(0.0) >= MIN_RATING
}
