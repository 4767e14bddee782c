use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::Rating,
    routes::extract::{movie_id_text, JsonBody},
    services::ratings::RatingInput,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub username: Option<String>,
    pub movie_id: Option<Value>,
    pub rating: Option<f64>,
    pub review: Option<String>,
    pub watched_date: Option<String>,
}

impl RatingRequest {
    fn input<'a>(&'a self, movie_id: Option<&'a str>) -> RatingInput<'a> {
        RatingInput {
            username: self.username.as_deref(),
            movie_id,
            stars: self.rating,
            review: self.review.as_deref(),
            watched_date: self.watched_date.as_deref(),
        }
    }
}

pub async fn add_rating(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<RatingRequest>,
) -> AppResult<Json<Value>> {
    let movie_id = movie_id_text(request.movie_id.as_ref());
    let rating = state.ratings.add(request.input(movie_id.as_deref())).await?;
    Ok(Json(json!({ "message": "Rating added successfully", "rating": rating })))
}

pub async fn edit_rating(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<RatingRequest>,
) -> AppResult<Json<Value>> {
    let movie_id = movie_id_text(request.movie_id.as_ref());
    let rating = state.ratings.edit(request.input(movie_id.as_deref())).await?;
    Ok(Json(json!({ "message": "Rating updated successfully", "rating": rating })))
}

pub async fn delete_rating(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<RatingRequest>,
) -> AppResult<Json<Value>> {
    let movie_id = movie_id_text(request.movie_id.as_ref());
    state
        .ratings
        .delete(request.username.as_deref(), movie_id.as_deref())
        .await?;
    Ok(Json(json!({ "message": "Rating deleted successfully" })))
}

pub async fn get_ratings(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Vec<Rating>>> {
    let ratings = state.ratings.for_movie(&movie_id).await?;
    Ok(Json(ratings))
}
