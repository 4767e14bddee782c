//! Content-based movie recommendations
//!
//! Pipeline for a user with watch history:
//! 1. Fetch details and recommendation feeds of every watched movie (fan-out)
//! 2. Build a [`TasteProfile`] from the resolved details
//! 3. Union the feeds into a candidate pool, excluding known and adult titles
//! 4. Fetch candidate details (fan-out), filter, score and rank them
//!
//! Users without history get the popular titles instead, unscored.
//!
//! Catalog failures only ever shrink the result; nothing here returns an error.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    models::{Recommendation, User},
    services::catalog::{fetch_details, fetch_recommendation_feeds, MovieCatalog},
};

pub mod candidates;
pub mod profile;
pub mod ranker;
pub mod scorer;

pub use candidates::{MIN_RATING, MIN_RUNTIME};
pub use profile::TasteProfile;
pub use ranker::MAX_RESULTS;
pub use scorer::DIRECTOR_WEIGHT;

use candidates::{assemble_pool, passes_filter, passes_popular_filter};
use ranker::rank;
use scorer::affinity;

pub struct RecommendationService {
    catalog: Arc<dyn MovieCatalog>,
}

impl RecommendationService {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self { catalog }
    }

    /// Ranked suggestions for `user`, at most [`MAX_RESULTS`]
    pub async fn recommend(&self, user: &User) -> Vec<Recommendation> {
        let watched = unique_in_order(&user.logged);

        if watched.is_empty() {
            tracing::info!(username = %user.username, "No watch history, using popular titles");
            return self.popular(&user.watchlist).await;
        }

        self.personalized(&watched, &user.watchlist).await
    }

    async fn personalized(&self, watched: &[String], watchlist: &[String]) -> Vec<Recommendation> {
        let (watched_details, feeds) = tokio::join!(
            fetch_details(&self.catalog, watched),
            fetch_recommendation_feeds(&self.catalog, watched),
        );

        let profile = TasteProfile::build(watched_details.iter().map(Option::as_ref));

        let watched_set: HashSet<&str> = watched.iter().map(String::as_str).collect();
        let watchlist_set: HashSet<&str> = watchlist.iter().map(String::as_str).collect();
        let pool = assemble_pool(feeds, &watched_set, &watchlist_set);

        let candidates = fetch_details(&self.catalog, &pool).await;

        let scored: Vec<Recommendation> = candidates
            .into_iter()
            .flatten()
            .filter(|movie| passes_filter(movie))
            .filter_map(|movie| {
                let score = affinity(&profile, &movie);
                (score > 0).then(|| Recommendation::scored(movie, score))
            })
            .collect();

        tracing::info!(
            watched = watched.len(),
            genres = profile.genre_counts.len(),
            directors = profile.director_counts.len(),
            actors = profile.actor_counts.len(),
            pool = pool.len(),
            scored = scored.len(),
            "Scored recommendation candidates"
        );

        rank(scored)
    }

    async fn popular(&self, watchlist: &[String]) -> Vec<Recommendation> {
        let titles = match self.catalog.popular_movies().await {
            Ok(titles) => titles,
            Err(e) => {
                tracing::warn!(error = %e, catalog = self.catalog.name(), "Popular movies unavailable");
                return Vec::new();
            }
        };

        titles
            .into_iter()
            .filter(|title| !watchlist.contains(&title.id))
            .filter(passes_popular_filter)
            .take(MAX_RESULTS)
            .map(Recommendation::popular)
            .collect()
    }
}

/// Drops repeated ids, keeping first occurrences in order
fn unique_in_order(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_support::{movie, summary};
    use super::*;
    use crate::{
        error::AppError,
        models::{MovieDetail, MovieSummary},
        services::catalog::MockMovieCatalog,
    };
    use std::collections::HashMap;

    #[derive(Default)]
    struct Fixture {
        details: HashMap<String, MovieDetail>,
        feeds: HashMap<String, Vec<MovieSummary>>,
        popular: Option<Vec<MovieSummary>>,
    }

    impl Fixture {
        fn detail(mut self, movie: MovieDetail) -> Self {
            self.details.insert(movie.id.clone(), movie);
            self
        }

        fn feed(mut self, id: &str, titles: &[&str]) -> Self {
            self.feeds
                .insert(id.to_string(), titles.iter().map(|t| summary(t)).collect());
            self
        }

        fn popular(mut self, titles: Vec<MovieSummary>) -> Self {
            self.popular = Some(titles);
            self
        }

        /// Mock catalog where any id missing from the fixture fails to resolve
        fn service(self) -> RecommendationService {
            let Fixture {
                details,
                feeds,
                popular,
            } = self;

            let mut mock = MockMovieCatalog::new();
            mock.expect_name().return_const("mock");
            mock.expect_movie_detail().returning(move |id| {
                details
                    .get(id)
                    .cloned()
                    .ok_or_else(|| AppError::ExternalApi(format!("no detail for {}", id)))
            });
            mock.expect_recommendations().returning(move |id| {
                feeds
                    .get(id)
                    .cloned()
                    .ok_or_else(|| AppError::ExternalApi(format!("no feed for {}", id)))
            });
            mock.expect_popular_movies().returning(move || {
                popular
                    .clone()
                    .ok_or_else(|| AppError::ExternalApi("popular unavailable".to_string()))
            });

            RecommendationService::new(Arc::new(mock))
        }
    }

    fn user(logged: &[&str], watchlist: &[&str]) -> User {
        let mut user = User::new("alice", "Alice");
        user.logged = logged.iter().map(|id| id.to_string()).collect();
        user.watchlist = watchlist.iter().map(|id| id.to_string()).collect();
        user
    }

    fn ids(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.id.as_str()).collect()
    }

    fn action_fan() -> MovieDetail {
        movie("M1")
            .genres(&[28])
            .director("D1")
            .cast(&["A1", "A2", "A3", "A4", "A5"])
            .build()
    }

    #[tokio::test]
    async fn test_empty_history_returns_first_fifteen_popular() {
        let popular = (1..=20).map(|i| summary(&i.to_string())).collect();
        let service = Fixture::default().popular(popular).service();

        let recs = service.recommend(&user(&[], &[])).await;

        assert_eq!(recs.len(), 15);
        assert_eq!(recs[0].id, "1");
        assert_eq!(recs[14].id, "15");
        assert!(recs.iter().all(|r| r.score == 0 && r.director == "Unknown"));
    }

    #[tokio::test]
    async fn test_empty_history_applies_popular_filters() {
        let mut adult = summary("2");
        adult.adult = true;
        let mut low = summary("3");
        low.rating = Some(5.0);
        let mut short = summary("4");
        short.runtime = Some(45);
        let service = Fixture::default()
            .popular(vec![summary("1"), adult, low, short, summary("5")])
            .service();

        let recs = service.recommend(&user(&[], &["5"])).await;

        assert_eq!(ids(&recs), vec!["1"]);
    }

    #[tokio::test]
    async fn test_empty_history_with_popular_failure_is_empty() {
        let service = Fixture::default().service();

        let recs = service.recommend(&user(&[], &[])).await;

        assert!(recs.is_empty());
    }

    #[tokio::test]
    async fn test_shared_genre_and_director_score() {
        let candidate = movie("C1").genres(&[28]).director("D1").build();
        let service = Fixture::default()
            .detail(action_fan())
            .detail(candidate)
            .feed("M1", &["C1"])
            .service();

        let recs = service.recommend(&user(&["M1"], &[])).await;

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, "C1");
        assert_eq!(recs[0].score, 3);
        assert_eq!(recs[0].director, "D1");
        assert_eq!(recs[0].rating, 7.0);
    }

    #[tokio::test]
    async fn test_short_candidate_excluded_despite_affinity() {
        let short = movie("C1").genres(&[28]).director("D1").runtime(60).build();
        let service = Fixture::default()
            .detail(action_fan())
            .detail(short)
            .feed("M1", &["C1"])
            .service();

        let recs = service.recommend(&user(&["M1"], &[])).await;

        assert!(recs.is_empty());
    }

    #[tokio::test]
    async fn test_watchlisted_candidate_excluded() {
        let best = movie("C1")
            .genres(&[28])
            .director("D1")
            .cast(&["A1", "A2", "A3"])
            .build();
        let other = movie("C2").genres(&[28]).build();
        let service = Fixture::default()
            .detail(action_fan())
            .detail(best)
            .detail(other)
            .feed("M1", &["C1", "C2"])
            .service();

        let recs = service.recommend(&user(&["M1"], &["C1"])).await;

        assert_eq!(ids(&recs), vec!["C2"]);
    }

    #[tokio::test]
    async fn test_failed_history_lookup_builds_profile_from_the_rest() {
        let comedy = movie("C1").genres(&[35]).build();
        let action = movie("C2").genres(&[28]).build();
        let service = Fixture::default()
            .detail(movie("M2").genres(&[35]).build())
            .detail(comedy)
            .detail(action)
            .feed("M1", &["C2"])
            .feed("M2", &["C1"])
            .service();

        // M1 detail lookup fails, so its Action genre never enters the profile
        let recs = service.recommend(&user(&["M1", "M2"], &[])).await;

        assert_eq!(ids(&recs), vec!["C1"]);
        assert_eq!(recs[0].score, 1);
    }

    #[tokio::test]
    async fn test_zero_affinity_candidates_dropped() {
        let unrelated = movie("C1").genres(&[99]).director("D9").build();
        let service = Fixture::default()
            .detail(action_fan())
            .detail(unrelated)
            .feed("M1", &["C1"])
            .service();

        let recs = service.recommend(&user(&["M1"], &[])).await;

        assert!(recs.is_empty());
    }

    #[tokio::test]
    async fn test_watched_titles_never_recommended() {
        let second = movie("M2").genres(&[28]).director("D1").build();
        let service = Fixture::default()
            .detail(action_fan())
            .detail(second)
            .feed("M1", &["M2", "M1"])
            .feed("M2", &["M1"])
            .service();

        let recs = service.recommend(&user(&["M1", "M2"], &[])).await;

        assert!(recs.is_empty());
    }

    #[tokio::test]
    async fn test_failed_feed_and_candidate_lookups_shrink_result() {
        let service = Fixture::default()
            .detail(action_fan())
            .detail(movie("C1").genres(&[28]).build())
            .feed("M1", &["C1", "C404"])
            .service();

        // M2 has neither detail nor feed; C404 has no detail
        let recs = service.recommend(&user(&["M1", "M2"], &[])).await;

        assert_eq!(ids(&recs), vec!["C1"]);
    }

    #[tokio::test]
    async fn test_ranked_unique_and_capped() {
        let mut fixture = Fixture::default().detail(action_fan());
        let mut feed = Vec::new();
        for i in 0..30u32 {
            let id = format!("C{}", i);
            let candidate = if i % 3 == 0 {
                movie(&id).genres(&[28]).director("D1").rating(6.5 + f64::from(i) / 10.0)
            } else {
                movie(&id).genres(&[28]).rating(6.5 + f64::from(i) / 10.0)
            };
            fixture = fixture.detail(candidate.build());
            feed.push(id);
        }
        let feed_refs: Vec<&str> = feed.iter().map(String::as_str).collect();
        let mut doubled = feed_refs.clone();
        doubled.extend(feed_refs.iter().rev());
        let service = fixture.feed("M1", &doubled).service();

        let recs = service.recommend(&user(&["M1", "M1"], &[])).await;

        assert_eq!(recs.len(), MAX_RESULTS);
        let unique: HashSet<&str> = ids(&recs).into_iter().collect();
        assert_eq!(unique.len(), recs.len());
        assert!(recs.iter().all(|r| r.score > 0));
        for pair in recs.windows(2) {
            assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].rating >= pair[1].rating)
            );
        }
        // Director matches (score 3) outrank genre-only matches (score 1)
        assert_eq!(recs[0].id, "C27");
        assert_eq!(recs[0].score, 3);
    }

    #[test]
    fn test_unique_in_order() {
        let ids: Vec<String> = ["3", "1", "3", "2", "1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(unique_in_order(&ids), vec!["3", "1", "2"]);
    }
}
