use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc};

use crate::{error::AppResult, state::AppState};

/// Proxies a read-only catalog request, e.g. `/api/movies/proxy/tmdb/search/movie?query=heat`
pub async fn proxy_tmdb(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Query(query): Query<BTreeMap<String, String>>,
) -> AppResult<Json<Value>> {
    let body = state.movies.browse(&path, query).await?;
    Ok(Json(body))
}
