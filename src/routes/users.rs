use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::MovieList,
    routes::extract::{movie_id_text, JsonBody},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct MovieListRequest {
    pub username: Option<String>,
    pub movie_id: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: Option<String>,
}

pub async fn add_to_watchlist(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<MovieListRequest>,
) -> AppResult<Json<Value>> {
    let movie_id = movie_id_text(request.movie_id.as_ref());
    state
        .users
        .add_to_watchlist(request.username.as_deref(), movie_id.as_deref())
        .await?;
    Ok(Json(json!({ "message": "Movie added to watchlist successfully" })))
}

pub async fn remove_from_watchlist(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<MovieListRequest>,
) -> AppResult<Json<Value>> {
    let movie_id = movie_id_text(request.movie_id.as_ref());
    state
        .users
        .remove_from_watchlist(request.username.as_deref(), movie_id.as_deref())
        .await?;
    Ok(Json(json!({ "message": "Movie removed from watchlist successfully" })))
}

pub async fn get_logged(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsernameQuery>,
) -> AppResult<Json<Value>> {
    let username = query.username.unwrap_or_default();
    let logged = state.users.list(&username, MovieList::Logged).await?;
    Ok(Json(json!({ "logged": logged })))
}

pub async fn get_watchlist(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsernameQuery>,
) -> AppResult<Json<Value>> {
    let username = query.username.unwrap_or_default();
    let watchlist = state.users.list(&username, MovieList::Watchlist).await?;
    Ok(Json(json!({ "watchlist": watchlist })))
}
