use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    middleware::{
        database::require_database,
        request_id::{make_span_with_request_id, request_id_middleware},
    },
    state::AppState,
};

pub mod extract;
pub mod movies;
pub mod ratings;
pub mod recommendations;
pub mod users;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/api/health", get(health_check))
        .route("/api/movies/proxy/tmdb/*path", get(movies::proxy_tmdb))
        .nest("/api/user", user_routes(state.clone()))
        .nest("/api/ratings", rating_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(allowed_origins))
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// Routes under /api/user, all backed by the user store
fn user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/add-to-watchlist", post(users::add_to_watchlist))
        .route("/remove-from-watchlist", post(users::remove_from_watchlist))
        .route("/get-logged", get(users::get_logged))
        .route("/get-watchlist", get(users::get_watchlist))
        .route("/recommended-movies", post(recommendations::recommend))
        .route_layer(middleware::from_fn_with_state(state, require_database))
}

/// Routes under /api/ratings; rating a movie logs it as watched
fn rating_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/add-rating", post(ratings::add_rating))
        .route("/edit-rating", put(ratings::edit_rating))
        .route("/delete-rating", delete(ratings::delete_rating))
        .route("/get-ratings/:movie_id", get(ratings::get_ratings))
        .route_layer(middleware::from_fn_with_state(state, require_database))
}

/// Any origin is allowed when none are configured
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([CONTENT_TYPE, AUTHORIZATION]))
        .max_age(Duration::from_secs(60 * 60))
}

async fn welcome() -> &'static str {
    "Welcome to the Flick Deck API!"
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let database = if state.users.is_ready().await {
        "connected"
    } else {
        "disconnected"
    };

    (StatusCode::OK, Json(json!({ "ok": true, "database": database })))
}
