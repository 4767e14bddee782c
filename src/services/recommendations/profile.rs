use std::collections::HashMap;

use crate::models::MovieDetail;

/// Affinity counts aggregated from a user's watched movies
///
/// Built fresh for every request and dropped with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TasteProfile {
    pub genre_counts: HashMap<u32, u32>,
    pub director_counts: HashMap<String, u32>,
    pub actor_counts: HashMap<String, u32>,
}

impl TasteProfile {
    /// Aggregates every resolved movie; unresolved lookups contribute nothing
    pub fn build<'a>(movies: impl IntoIterator<Item = Option<&'a MovieDetail>>) -> Self {
        let mut profile = Self::default();

        for movie in movies.into_iter().flatten() {
            for genre in &movie.genres {
                *profile.genre_counts.entry(genre.id).or_default() += 1;
            }
            if let Some(director) = &movie.director {
                *profile.director_counts.entry(director.clone()).or_default() += 1;
            }
            for actor in movie.top_billed() {
                *profile.actor_counts.entry(actor.to_string()).or_default() += 1;
            }
        }

        profile
    }

    pub fn is_empty(&self) -> bool {
        self.genre_counts.is_empty()
            && self.director_counts.is_empty()
            && self.actor_counts.is_empty()
    }

    pub fn genre(&self, genre_id: u32) -> u32 {
        self.genre_counts.get(&genre_id).copied().unwrap_or(0)
    }

    pub fn director(&self, name: &str) -> u32 {
        self.director_counts.get(name).copied().unwrap_or(0)
    }

    pub fn actor(&self, name: &str) -> u32 {
        self.actor_counts.get(name).copied().unwrap_or(0)
    }
}
