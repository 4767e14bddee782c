use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    services::catalog::MovieCatalog,
};

/// Catalog resources the browsing proxy may read
const BROWSABLE_ROOTS: &[&str] = &["movie", "search", "trending", "discover", "person", "genre"];

/// Read-only pass-through to the movie catalog for browsing pages
pub struct MovieBrowser {
    catalog: Arc<dyn MovieCatalog>,
}

/// Checks a client path such as `movie/550/credits` segment by segment
fn validate_path(path: &str) -> AppResult<String> {
    let path = path.trim_matches('/');
    let segments: Vec<&str> = path.split('/').collect();

    let allowed_root = segments
        .first()
        .is_some_and(|root| BROWSABLE_ROOTS.contains(root));
    let clean_segments = segments.iter().all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    });

    if !allowed_root || !clean_segments {
        return Err(AppError::InvalidInput(format!("Unsupported catalog path: {}", path)));
    }

    Ok(path.to_string())
}

impl MovieBrowser {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self { catalog }
    }

    /// Fetches `path` with the client's query parameters
    ///
    /// The catalog credentials are added downstream, so any client-sent
    /// `api_key` is dropped.
    pub async fn browse(&self, path: &str, query: BTreeMap<String, String>) -> AppResult<Value> {
        let path = validate_path(path)?;
        let params: Vec<(String, String)> = query
            .into_iter()
            .filter(|(name, _)| name != "api_key")
            .collect();

        self.catalog.browse(&path, &params).await
    }
}
