//! Star ratings and reviews
//!
//! Rating a movie is how a user logs it as watched: adding a rating puts the
//! movie on the logged list (and takes it off the watchlist), and deleting
//! the rating takes it off the logged list again.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::{
    db::UserStore,
    error::{AppError, AppResult},
    models::{normalize_movie_id, valid_stars, MovieList, Rating, MAX_REVIEW_LEN},
    services::users::{require_target, user_not_found},
};

/// Fields of an add or edit request, as sent by the client
#[derive(Debug, Default, Clone)]
pub struct RatingInput<'a> {
    pub username: Option<&'a str>,
    pub movie_id: Option<&'a str>,
    pub stars: Option<f64>,
    pub review: Option<&'a str>,
    /// `YYYY-MM-DD`; today when absent
    pub watched_date: Option<&'a str>,
}

pub struct RatingService {
    store: Arc<dyn UserStore>,
}

fn rating_not_found() -> AppError {
    AppError::NotFound("Rating not found".to_string())
}

fn require_stars(stars: Option<f64>) -> AppResult<f64> {
    match stars {
        Some(stars) if valid_stars(stars) => Ok(stars),
        Some(_) => Err(AppError::InvalidInput(
            "Rating must be between 0.5 and 5 in half-star steps".to_string(),
        )),
        None => Err(AppError::InvalidInput("Rating is required".to_string())),
    }
}

fn require_review(review: Option<&str>) -> AppResult<String> {
    let review = review.unwrap_or_default().trim();
    if review.chars().count() > MAX_REVIEW_LEN {
        return Err(AppError::InvalidInput(format!(
            "Review must be at most {} characters",
            MAX_REVIEW_LEN
        )));
    }
    Ok(review.to_string())
}

fn parse_watched_date(value: Option<&str>) -> AppResult<NaiveDate> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidInput("Invalid watched date".to_string())),
        None => Ok(Utc::now().date_naive()),
    }
}

impl RatingService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Rates a movie for the first time and logs it as watched
    pub async fn add(&self, input: RatingInput<'_>) -> AppResult<Rating> {
        let (username, movie_id) = require_target(input.username, input.movie_id)?;
        let stars = require_stars(input.stars)?;
        let review = require_review(input.review)?;
        let watched_date = parse_watched_date(input.watched_date)?;

        if self.store.find_user(&username).await?.is_none() {
            return Err(user_not_found());
        }

        let rating = Rating {
            username,
            movie_id,
            rating: stars,
            review,
            watched_date,
            created_at: Utc::now(),
        };

        if !self.store.insert_rating(&rating).await? {
            return Err(AppError::InvalidInput(
                "You have already rated this movie".to_string(),
            ));
        }

        if !self
            .store
            .move_to_list(&rating.username, MovieList::Logged, &rating.movie_id)
            .await?
        {
            return Err(user_not_found());
        }

        tracing::info!(
            username = %rating.username,
            movie_id = %rating.movie_id,
            stars = rating.rating,
            "Movie rated and logged"
        );
        Ok(rating)
    }

    /// Changes stars and review of an existing rating
    pub async fn edit(&self, input: RatingInput<'_>) -> AppResult<Rating> {
        let (username, movie_id) = require_target(input.username, input.movie_id)?;
        let stars = require_stars(input.stars)?;
        let review = require_review(input.review)?;

        let rating = self
            .store
            .update_rating(&username, &movie_id, stars, &review)
            .await?
            .ok_or_else(rating_not_found)?;

        tracing::info!(username = %username, movie_id = %movie_id, stars, "Rating updated");
        Ok(rating)
    }

    /// Deletes a rating and takes the movie off the logged list
    pub async fn delete(&self, username: Option<&str>, movie_id: Option<&str>) -> AppResult<()> {
        let (username, movie_id) = require_target(username, movie_id)?;

        if !self.store.delete_rating(&username, &movie_id).await? {
            return Err(rating_not_found());
        }

        self.store
            .remove_from_list(&username, MovieList::Logged, &movie_id)
            .await?;

        tracing::info!(username = %username, movie_id = %movie_id, "Rating deleted, movie unlogged");
        Ok(())
    }

    /// Every user's rating of a movie, newest first
    pub async fn for_movie(&self, movie_id: &str) -> AppResult<Vec<Rating>> {
        let movie_id = normalize_movie_id(movie_id)
            .ok_or_else(|| AppError::InvalidInput("Movie ID is required".to_string()))?;

        self.store.ratings_for_movie(&movie_id).await
    }
}
