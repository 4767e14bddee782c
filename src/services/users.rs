use std::sync::Arc;

use crate::{
    db::UserStore,
    error::{AppError, AppResult},
    models::{normalize_movie_id, MovieList, User},
};

/// Watched and watchlist operations on behalf of a user
pub struct UserListService {
    store: Arc<dyn UserStore>,
}

pub(crate) fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// Validates a `(username, movie_id)` pair from a request body
pub(crate) fn require_target(username: Option<&str>, movie_id: Option<&str>) -> AppResult<(String, String)> {
    let username = username.filter(|u| !u.is_empty());
    let movie_id = movie_id.and_then(normalize_movie_id);

    match (username, movie_id) {
        (Some(username), Some(movie_id)) => Ok((username.to_string(), movie_id)),
        _ => Err(AppError::InvalidInput(
            "Username and movie ID are required".to_string(),
        )),
    }
}

impl UserListService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn get_user(&self, username: &str) -> AppResult<User> {
        self.store
            .find_user(username)
            .await?
            .ok_or_else(user_not_found)
    }

    pub async fn list(&self, username: &str, list: MovieList) -> AppResult<Vec<String>> {
        let user = self.get_user(username).await?;
        Ok(match list {
            MovieList::Logged => user.logged,
            MovieList::Watchlist => user.watchlist,
        })
    }

    /// Adds a movie to the watchlist, taking it off the logged list
    pub async fn add_to_watchlist(
        &self,
        username: Option<&str>,
        movie_id: Option<&str>,
    ) -> AppResult<()> {
        let (username, movie_id) = require_target(username, movie_id)?;

        if !self
            .store
            .move_to_list(&username, MovieList::Watchlist, &movie_id)
            .await?
        {
            return Err(user_not_found());
        }

        tracing::info!(username = %username, movie_id = %movie_id, "Movie added to watchlist");
        Ok(())
    }

    /// Removes a movie from the watchlist; it must currently be on it
    pub async fn remove_from_watchlist(
        &self,
        username: Option<&str>,
        movie_id: Option<&str>,
    ) -> AppResult<()> {
        let (username, movie_id) = require_target(username, movie_id)?;

        let watchlist = self.list(&username, MovieList::Watchlist).await?;
        if !watchlist.contains(&movie_id) {
            return Err(AppError::InvalidInput("Movie not in watchlist".to_string()));
        }

        if !self
            .store
            .remove_from_list(&username, MovieList::Watchlist, &movie_id)
            .await?
        {
            return Err(user_not_found());
        }

        tracing::info!(username = %username, movie_id = %movie_id, "Movie removed from watchlist");
        Ok(())
    }

    pub async fn is_ready(&self) -> bool {
        self.store.is_ready().await
    }
}
