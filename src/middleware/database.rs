use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, state::AppState};

/// Short-circuits with 503 while the user store cannot serve requests
pub async fn require_database(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if state.users.is_ready().await {
        return next.run(request).await;
    }

    AppError::Unavailable("Database unavailable. Please ensure the database is running.".to_string())
        .into_response()
}
