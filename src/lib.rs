//! Flick Deck API
//!
//! REST backend for a movie-tracking app: per-user watched and watchlist
//! movie lists, plus content-based recommendations scored from the user's
//! watch history against TMDB metadata.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::Config;
pub use routes::create_router;
pub use state::AppState;
