use std::collections::HashSet;

use crate::models::Recommendation;

/// Maximum number of recommendations returned to the client
pub const MAX_RESULTS: usize = 15;

/// Orders by score then rating (both descending), drops repeated ids keeping
/// the first in that order, and truncates to [`MAX_RESULTS`].
pub fn rank(mut recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    recommendations.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.rating.total_cmp(&a.rating))
    });

    let mut seen = HashSet::new();
    recommendations
        .into_iter()
        .filter(|rec| seen.insert(rec.id.clone()))
        .take(MAX_RESULTS)
        .collect()
}
