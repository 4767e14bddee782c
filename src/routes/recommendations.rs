use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::Recommendation,
    routes::extract::JsonBody,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
}

/// Handler for the recommended-movies endpoint
///
/// Only request problems (missing username, unknown user) are errors; catalog
/// failures just produce fewer or no recommendations.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    JsonBody(request): JsonBody<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let username = request
        .username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Username is required".to_string()))?;

    let user = state.users.get_user(&username).await?;

    tracing::info!(
        request_id = %request_id,
        username = %username,
        logged = user.logged.len(),
        watchlist = user.watchlist.len(),
        "Processing recommendation request"
    );

    let recommendations = state.recommendations.recommend(&user).await;

    tracing::info!(
        request_id = %request_id,
        count = recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(RecommendationResponse { recommendations }))
}
