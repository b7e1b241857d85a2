use sqlx::SqlitePool;
use thiserror::Error;
use time::OffsetDateTime;

use crate::auth::repo_types::User;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("username already taken")]
    UniqueViolation,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl User {
    /// Find a user by username.
    pub async fn find_by_username(
        db: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    /// Insert a new user. A duplicate username surfaces as `RepoError::UniqueViolation`.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        password_hash: &str,
    ) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?1, ?2, ?3)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::UniqueViolation
            }
            _ => RepoError::Db(e),
        })
    }
}
