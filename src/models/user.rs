use sqlx::{FromRow, SqlitePool};

use super::now_timestamp;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("email already registered")]
    EmailTaken,
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for CreateUserError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                CreateUserError::EmailTaken
            }
            e => CreateUserError::Database(e),
        }
    }
}

impl User {
    /// Insert a user and return the stored row. The UNIQUE constraint on
    /// `email` decides duplicates, so there is no separate lookup first.
    pub async fn create(
        pool: &SqlitePool,
        email: &str,
        password_hash: &str,
    ) -> Result<User, CreateUserError> {
        let user = sqlx::query_as(
            "INSERT INTO users (email, password_hash, created_at) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(email)
        .bind(password_hash)
        .bind(now_timestamp())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
