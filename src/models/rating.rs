use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Longest review accepted, in characters
pub const MAX_REVIEW_LEN: usize = 500;

pub const MIN_STARS: f64 = 0.5;
pub const MAX_STARS: f64 = 5.0;

/// A user's star rating and optional review of a watched movie
///
/// At most one rating exists per `(username, movie_id)`, and a rated movie is
/// always on the user's logged list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Rating {
    pub username: String,
    pub movie_id: String,
    /// Stars in half steps from [`MIN_STARS`] to [`MAX_STARS`]
    pub rating: f64,
    pub review: String,
    pub watched_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Whether `stars` is a half-step value inside the star range
pub fn valid_stars(stars: f64) -> bool {
    (MIN_STARS..=MAX_STARS).contains(&stars) && (stars * 2.0).fract() == 0.0
}
