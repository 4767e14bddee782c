use serde::{Deserialize, Serialize};

/// Number of top-billed cast members that count towards taste and affinity
pub const TOP_BILLED: usize = 5;

/// Placeholder director name when no crew member is credited as "Director"
pub const UNKNOWN_DIRECTOR: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastMember {
    pub name: String,
}

/// Full catalog record for a single movie, including credits
///
/// Optional fields stay optional here; each caller decides how a missing
/// value is defaulted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: String,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub genres: Vec<Genre>,
    /// First crew member whose job is "Director"
    pub director: Option<String>,
    /// Cast in billing order
    pub cast: Vec<CastMember>,
    pub rating: Option<f64>,
    /// Runtime in minutes
    pub runtime: Option<u32>,
    pub adult: bool,
}

impl MovieDetail {
    /// Names of the first [`TOP_BILLED`] cast members, in billing order
    pub fn top_billed(&self) -> impl Iterator<Item = &str> {
        self.cast.iter().take(TOP_BILLED).map(|c| c.name.as_str())
    }
}

/// Entry of a catalog listing (popular movies, per-title recommendations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: String,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub rating: Option<f64>,
    pub runtime: Option<u32>,
    pub adult: bool,
}

/// A movie suggested to the user, as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: String,
    pub director: String,
    pub rating: f64,
    pub score: u32,
}

impl Recommendation {
    pub fn scored(movie: MovieDetail, score: u32) -> Self {
        Self {
            id: movie.id,
            title: movie.title.unwrap_or_else(|| "Untitled".to_string()),
            poster_path: movie.poster_path,
            release_date: movie.release_date.unwrap_or_else(|| "N/A".to_string()),
            director: movie
                .director
                .unwrap_or_else(|| UNKNOWN_DIRECTOR.to_string()),
            rating: movie.rating.unwrap_or_default(),
            score,
        }
    }

    /// Unscored entry used when there is no watch history to score against
    pub fn popular(movie: MovieSummary) -> Self {
        Self {
            id: movie.id,
            title: movie.title.unwrap_or_else(|| "Untitled".to_string()),
            poster_path: movie.poster_path,
            release_date: movie.release_date.unwrap_or_else(|| "N/A".to_string()),
            director: UNKNOWN_DIRECTOR.to_string(),
            rating: movie.rating.unwrap_or_default(),
            score: 0,
        }
    }
}
