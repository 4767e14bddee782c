use sqlx::PgPool;

use crate::{
    db::postgres::SchemaStatus,
    error::{AppError, AppResult},
    models::{MovieList, Rating, User},
};

/// Persistence for users, their movie lists and their ratings
///
/// Both lists have set semantics: adding an id that is already present is a
/// no-op, and a movie moves out of the opposite list when it is added.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, username: &str) -> AppResult<Option<User>>;

    /// Adds `movie_id` to `list` and removes it from the opposite list.
    /// Returns `false` when the user does not exist.
    async fn move_to_list(&self, username: &str, list: MovieList, movie_id: &str)
        -> AppResult<bool>;

    /// Removes `movie_id` from `list`. Returns `false` when the user does not exist.
    async fn remove_from_list(
        &self,
        username: &str,
        list: MovieList,
        movie_id: &str,
    ) -> AppResult<bool>;

    /// Stores a new rating. Returns `false` when the user already rated the movie.
    async fn insert_rating(&self, rating: &Rating) -> AppResult<bool>;

    /// Changes stars and review of an existing rating, `None` when there is none
    async fn update_rating(
        &self,
        username: &str,
        movie_id: &str,
        stars: f64,
        review: &str,
    ) -> AppResult<Option<Rating>>;

    /// Returns `false` when there was no rating to delete
    async fn delete_rating(&self, username: &str, movie_id: &str) -> AppResult<bool>;

    /// All ratings of a movie, newest first
    async fn ratings_for_movie(&self, movie_id: &str) -> AppResult<Vec<Rating>>;

    /// Whether the backing store can currently serve requests
    async fn is_ready(&self) -> bool;

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
    schema: SchemaStatus,
}

const RATING_COLUMNS: &str = "username, movie_id, rating, review, watched_date, created_at";

impl PgUserStore {
    pub fn new(pool: PgPool, schema: SchemaStatus) -> Self {
        Self { pool, schema }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Connectivity failures surface as 503 rather than 500
fn map_db_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::warn!(error = %e, "Database unreachable");
            AppError::Unavailable("Database unavailable".to_string())
        }
        other => AppError::Database(other),
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_user(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT username, name, logged, watchlist, joined FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn move_to_list(
        &self,
        username: &str,
        list: MovieList,
        movie_id: &str,
    ) -> AppResult<bool> {
        let target = list.column();
        let other = list.opposite().column();
        let sql = format!(
            "UPDATE users SET \
                {target} = CASE WHEN $2 = ANY({target}) THEN {target} ELSE array_append({target}, $2) END, \
                {other} = array_remove({other}, $2) \
             WHERE username = $1"
        );

        let result = sqlx::query(&sql)
            .bind(username)
            .bind(movie_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_from_list(
        &self,
        username: &str,
        list: MovieList,
        movie_id: &str,
    ) -> AppResult<bool> {
        let column = list.column();
        let sql = format!("UPDATE users SET {column} = array_remove({column}, $2) WHERE username = $1");

        let result = sqlx::query(&sql)
            .bind(username)
            .bind(movie_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_rating(&self, rating: &Rating) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO ratings (username, movie_id, rating, review, watched_date, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (username, movie_id) DO NOTHING",
        )
        .bind(&rating.username)
        .bind(&rating.movie_id)
        .bind(rating.rating)
        .bind(&rating.review)
        .bind(rating.watched_date)
        .bind(rating.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_rating(
        &self,
        username: &str,
        movie_id: &str,
        stars: f64,
        review: &str,
    ) -> AppResult<Option<Rating>> {
        let sql = format!(
            "UPDATE ratings SET rating = $3, review = $4 \
             WHERE username = $1 AND movie_id = $2 \
             RETURNING {RATING_COLUMNS}"
        );

        sqlx::query_as::<_, Rating>(&sql)
            .bind(username)
            .bind(movie_id)
            .bind(stars)
            .bind(review)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn delete_rating(&self, username: &str, movie_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM ratings WHERE username = $1 AND movie_id = $2")
            .bind(username)
            .bind(movie_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn ratings_for_movie(&self, movie_id: &str) -> AppResult<Vec<Rating>> {
        let sql = format!(
            "SELECT {RATING_COLUMNS} FROM ratings WHERE movie_id = $1 ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, Rating>(&sql)
            .bind(movie_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    /// Reachable and migrated; tables may not exist before migrations ran
    async fn is_ready(&self) -> bool {
        self.schema.is_migrated() && sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
