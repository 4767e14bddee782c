use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's profile with their watched and watchlist movie ids
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct User {
    pub username: String,
    pub name: String,
    /// Ids of movies the user has logged as watched
    pub logged: Vec<String>,
    /// Ids of movies the user wants to watch later
    pub watchlist: Vec<String>,
    pub joined: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            logged: Vec::new(),
            watchlist: Vec::new(),
            joined: Utc::now(),
        }
    }
}

/// Which of the two per-user movie lists an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieList {
    Logged,
    Watchlist,
}

impl MovieList {
    /// The list a movie leaves when it is added to this one
    pub fn opposite(self) -> Self {
        match self {
            MovieList::Logged => MovieList::Watchlist,
            MovieList::Watchlist => MovieList::Logged,
        }
    }

    /// Column name in the `users` table
    pub fn column(self) -> &'static str {
        match self {
            MovieList::Logged => "logged",
            MovieList::Watchlist => "watchlist",
        }
    }
}

/// Trims a client-supplied movie id, rejecting blank ones
pub fn normalize_movie_id(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
