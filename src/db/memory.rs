use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    db::UserStore,
    error::AppResult,
    models::{MovieList, Rating, User},
};

/// In-process user store, used when no database is configured
///
/// Nothing survives a restart; users only exist when seeded or inserted.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    /// Oldest first
    ratings: Arc<RwLock<Vec<Rating>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user
    pub async fn insert(&self, user: User) {
        let mut users = self.users.write().await;
        users.insert(user.username.clone(), user);
    }
}

fn list_mut(user: &mut User, list: MovieList) -> &mut Vec<String> {
    match list {
        MovieList::Logged => &mut user.logged,
        MovieList::Watchlist => &mut user.watchlist,
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_user(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn move_to_list(
        &self,
        username: &str,
        list: MovieList,
        movie_id: &str,
    ) -> AppResult<bool> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(username) else {
            return Ok(false);
        };

        list_mut(user, list.opposite()).retain(|id| id != movie_id);
        let target = list_mut(user, list);
        if !target.iter().any(|id| id == movie_id) {
            target.push(movie_id.to_string());
        }
        Ok(true)
    }

    async fn remove_from_list(
        &self,
        username: &str,
        list: MovieList,
        movie_id: &str,
    ) -> AppResult<bool> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(username) else {
            return Ok(false);
        };

        list_mut(user, list).retain(|id| id != movie_id);
        Ok(true)
    }

    async fn insert_rating(&self, rating: &Rating) -> AppResult<bool> {
        let mut ratings = self.ratings.write().await;
        if ratings
            .iter()
            .any(|r| r.username == rating.username && r.movie_id == rating.movie_id)
        {
            return Ok(false);
        }
        ratings.push(rating.clone());
        Ok(true)
    }

    async fn update_rating(
        &self,
        username: &str,
        movie_id: &str,
        stars: f64,
        review: &str,
    ) -> AppResult<Option<Rating>> {
        let mut ratings = self.ratings.write().await;
        Ok(ratings
            .iter_mut()
            .find(|r| r.username == username && r.movie_id == movie_id)
            .map(|rating| {
                rating.rating = stars;
                rating.review = review.to_string();
                rating.clone()
            }))
    }

    async fn delete_rating(&self, username: &str, movie_id: &str) -> AppResult<bool> {
        let mut ratings = self.ratings.write().await;
        let before = ratings.len();
        ratings.retain(|r| !(r.username == username && r.movie_id == movie_id));
        Ok(ratings.len() < before)
    }

    async fn ratings_for_movie(&self, movie_id: &str) -> AppResult<Vec<Rating>> {
        let ratings = self.ratings.read().await;
        Ok(ratings
            .iter()
            .rev()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect())
    }

    async fn is_ready(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
