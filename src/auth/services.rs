use anyhow::Context;
use axum::extract::FromRef;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::{
    password::{hash_password, password_matches},
    repo::RepoError,
    repo_types::User,
};
use crate::state::AppState;

/// Failure taxonomy of the register/login flow. The `Display` text is what the client sees.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username and password are required")]
    Validation,

    #[error("Username already exists")]
    Conflict,

    /// Shared by "unknown username" and "wrong password" so neither can be told apart.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

/// Register/login against the credential store it was built with.
#[derive(Clone)]
pub struct AuthService {
    db: SqlitePool,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        AuthService::new(state.db.clone())
    }
}

impl AuthService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        require_credentials(username, password)?;

        let existing = User::find_by_username(&self.db, username)
            .await
            .context("look up username")
            .map_err(AuthError::Internal)?;
        if existing.is_some() {
            warn!(%username, "username already registered");
            return Err(AuthError::Conflict);
        }

        let hash = hash_blocking(password.to_owned()).await?;
        let user = self.insert_user(username, &hash).await?;

        info!(user_id = user.id, username = %user.username, "user registered");
        Ok(())
    }

    /// A concurrent registration may have taken the name since the lookup in `register`.
    async fn insert_user(&self, username: &str, hash: &str) -> Result<User, AuthError> {
        User::create(&self.db, username, hash)
            .await
            .map_err(|e| match e {
                RepoError::UniqueViolation => {
                    warn!(%username, "username taken by concurrent registration");
                    AuthError::Conflict
                }
                RepoError::Db(e) => AuthError::Internal(anyhow::Error::new(e).context("insert user")),
            })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        require_credentials(username, password)?;

        let user = match User::find_by_username(&self.db, username)
            .await
            .context("look up username")
            .map_err(AuthError::Internal)?
        {
            Some(u) => u,
            None => {
                warn!(%username, "login unknown username");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let ok = verify_blocking(password.to_owned(), user.password_hash.clone()).await?;
        if !ok {
            warn!(%username, user_id = user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = user.id, username = %user.username, "user logged in");
        Ok(user)
    }
}

fn require_credentials(username: &str, password: &str) -> Result<(), AuthError> {
    if username.is_empty() || password.is_empty() {
        debug!("missing username or password");
        return Err(AuthError::Validation);
    }
    Ok(())
}

// Argon2 is CPU-bound; keep it off the async workers.
async fn hash_blocking(password: String) -> Result<String, AuthError> {
    let digest = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("hash task failed")
        .map_err(AuthError::Internal)?;
    digest.map_err(|e| AuthError::Internal(e.into()))
}

async fn verify_blocking(password: String, stored: String) -> Result<bool, AuthError> {
    let matched = tokio::task::spawn_blocking(move || password_matches(&password, &stored))
        .await
        .context("verify task failed")
        .map_err(AuthError::Internal)?;
    matched.map_err(|e| AuthError::Internal(e.into()))
}
