//! TMDB (The Movie Database) catalog client
//!
//! API Flow:
//! 1. Detail: /movie/{id}?append_to_response=credits → genres, runtime, cast, crew
//! 2. Recommendations: /movie/{id}/recommendations → first page of suggested titles
//! 3. Popular: /movie/popular → first page of popular titles
//! 4. Browse: any other read-only path, passed through as raw JSON

use crate::{
    cached,
    db::{
        redis::{BROWSE_TTL, MOVIE_DETAIL_TTL, POPULAR_TTL, RECOMMENDATIONS_TTL},
        Cache, CacheKey,
    },
    error::{AppError, AppResult},
    models::{MovieDetail, MovieSummary, TmdbMovie, TmdbPage},
    services::catalog::MovieCatalog,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

const LANGUAGE: &str = "en-US";

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
}

impl TmdbCatalog {
    pub fn new(cache: Option<Cache>, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// Issues an authenticated GET and decodes the JSON body
    async fn get_json<T, P>(&self, path: &str, params: &P) -> AppResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB resource not found: {}", path)));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {} for {}: {}",
                status, path, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn fetch_page(&self, path: &str) -> AppResult<Vec<MovieSummary>> {
        let page: TmdbPage = self
            .get_json(path, &[("language", LANGUAGE), ("page", "1")])
            .await?;
        Ok(page.into_summaries())
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn movie_detail(&self, id: &str) -> AppResult<MovieDetail> {
        cached!(
            self.cache,
            CacheKey::MovieDetail(id.to_string()),
            MOVIE_DETAIL_TTL,
            async move {
                let movie: TmdbMovie = self
                    .get_json(
                        &format!("/movie/{}", id),
                        &[("append_to_response", "credits")],
                    )
                    .await?;
                Ok::<_, AppError>(MovieDetail::from(movie))
            }
        )
    }

    async fn recommendations(&self, id: &str) -> AppResult<Vec<MovieSummary>> {
        cached!(
            self.cache,
            CacheKey::Recommendations(id.to_string()),
            RECOMMENDATIONS_TTL,
            async move {
                let titles = self
                    .fetch_page(&format!("/movie/{}/recommendations", id))
                    .await?;

                tracing::debug!(
                    movie_id = %id,
                    results = titles.len(),
                    "Recommendation feed fetched"
                );

                Ok::<_, AppError>(titles)
            }
        )
    }

    async fn popular_movies(&self) -> AppResult<Vec<MovieSummary>> {
        cached!(self.cache, CacheKey::Popular, POPULAR_TTL, async move {
            let titles = self.fetch_page("/movie/popular").await?;
            tracing::info!(results = titles.len(), "Popular movies fetched");
            Ok::<_, AppError>(titles)
        })
    }

    async fn browse(&self, path: &str, params: &[(String, String)]) -> AppResult<Value> {
        cached!(
            self.cache,
            CacheKey::Browse(browse_key(path, params)),
            BROWSE_TTL,
            async move {
                let body: Value = self.get_json(&format!("/{}", path), params).await?;
                tracing::debug!(path = %path, "Catalog resource proxied");
                Ok::<_, AppError>(body)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

/// Stable cache key for a proxied request; `params` arrive sorted
fn browse_key(path: &str, params: &[(String, String)]) -> String {
    let query: Vec<String> = params
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    format!("{}?{}", path, query.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    type Params = Query<HashMap<String, String>>;

    fn authorized(params: &HashMap<String, String>) -> bool {
        params.get("api_key").map(String::as_str) == Some("test_key")
    }

    async fn movie(Path(id): Path<String>, Query(params): Params) -> impl IntoResponse {
        if !authorized(&params) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        if id == "404" {
            return (StatusCode::NOT_FOUND, Json(json!({"status_code": 34}))).into_response();
        }
        let with_credits = params.get("append_to_response").map(String::as_str) == Some("credits");
        let mut body = json!({
            "id": id.parse::<u64>().unwrap_or_default(),
            "title": "Heat",
            "genres": [{"id": 80, "name": "Crime"}],
            "vote_average": 7.9,
            "runtime": 170,
            "adult": false
        });
        if with_credits {
            body["credits"] = json!({
                "cast": [{"name": "Al Pacino"}, {"name": "Robert De Niro"}],
                "crew": [{"name": "Michael Mann", "job": "Director"}]
            });
        }
        Json(body).into_response()
    }

    async fn recommendations(Path(id): Path<String>, Query(params): Params) -> impl IntoResponse {
        if !authorized(&params) || params.get("page").map(String::as_str) != Some("1") {
            return StatusCode::BAD_REQUEST.into_response();
        }
        Json(json!({
            "page": 1,
            "results": [{"id": 1000 + id.parse::<u64>().unwrap_or_default(), "title": "Collateral", "adult": false}]
        }))
        .into_response()
    }

    async fn popular(Query(params): Params) -> impl IntoResponse {
        if !authorized(&params) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Json(json!({
            "page": 1,
            "results": [
                {"id": 1, "title": "One", "vote_average": 7.0},
                {"id": 2, "title": "Two", "vote_average": 6.0, "adult": true}
            ]
        }))
        .into_response()
    }

    async fn search(Query(params): Params) -> impl IntoResponse {
        if !authorized(&params) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Json(json!({
            "page": 1,
            "query": params.get("query"),
            "results": [{"id": 949, "title": "Heat", "media_type": "movie"}]
        }))
        .into_response()
    }

    async fn server_error() -> impl IntoResponse {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Serves a minimal TMDB lookalike on an ephemeral port
    async fn spawn_fake_tmdb() -> String {
        let app = Router::new()
            .route("/search/movie", get(search))
            .route("/trending/movie/week", get(server_error))
            .route("/movie/popular", get(popular))
            .route("/movie/:id", get(movie))
            .route("/movie/:id/recommendations", get(recommendations));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_movie_detail_includes_credits() {
        let url = spawn_fake_tmdb().await;
        let catalog = TmdbCatalog::new(None, "test_key".to_string(), url);

        let detail = catalog.movie_detail("949").await.unwrap();

        assert_eq!(detail.id, "949");
        assert_eq!(detail.director.as_deref(), Some("Michael Mann"));
        assert_eq!(detail.top_billed().count(), 2);
        assert_eq!(detail.runtime, Some(170));
    }

    #[tokio::test]
    async fn test_movie_detail_error_status() {
        let url = spawn_fake_tmdb().await;
        let catalog = TmdbCatalog::new(None, "test_key".to_string(), url);

        let result = catalog.movie_detail("404").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_bad_api_key_is_an_error() {
        let url = spawn_fake_tmdb().await;
        let catalog = TmdbCatalog::new(None, "wrong".to_string(), url);

        assert!(catalog.popular_movies().await.is_err());
    }

    #[tokio::test]
    async fn test_recommendations_first_page() {
        let url = spawn_fake_tmdb().await;
        let catalog = TmdbCatalog::new(None, "test_key".to_string(), url);

        let titles = catalog.recommendations("949").await.unwrap();

        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].id, "1949");
    }

    #[tokio::test]
    async fn test_popular_movies() {
        let url = spawn_fake_tmdb().await;
        let catalog = TmdbCatalog::new(None, "test_key".to_string(), url);

        let titles = catalog.popular_movies().await.unwrap();

        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].rating, Some(7.0));
        assert!(titles[1].adult);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let catalog = TmdbCatalog::new(
            None,
            "test_key".to_string(),
            "http://127.0.0.1:9".to_string(),
        );

        assert!(catalog.movie_detail("1").await.is_err());
    }

    #[tokio::test]
    async fn test_browse_forwards_query_and_api_key() {
        let url = spawn_fake_tmdb().await;
        let catalog = TmdbCatalog::new(None, "test_key".to_string(), url);
        let params = vec![("query".to_string(), "heat".to_string())];

        let body = catalog.browse("search/movie", &params).await.unwrap();

        assert_eq!(body["query"], "heat");
        assert_eq!(body["results"][0]["title"], "Heat");
    }

    #[tokio::test]
    async fn test_browse_upstream_failures() {
        let url = spawn_fake_tmdb().await;
        let catalog = TmdbCatalog::new(None, "test_key".to_string(), url);

        let missing = catalog.browse("person/does-not-exist/credits", &[]).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        let broken = catalog.browse("trending/movie/week", &[]).await;
        assert!(matches!(broken, Err(AppError::ExternalApi(_))));
    }

    #[test]
    fn test_browse_key_includes_params() {
        let params = vec![
            ("page".to_string(), "2".to_string()),
            ("region".to_string(), "IN".to_string()),
        ];

        assert_eq!(browse_key("discover/movie", &params), "discover/movie?page=2&region=IN");
        assert_eq!(browse_key("movie/550", &[]), "movie/550?");
    }
}
