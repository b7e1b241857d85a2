use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse, PublicUser, RegisterRequest},
        services::{AuthError, AuthService},
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
}

#[instrument(skip(auth, payload))]
pub async fn register(
    State(auth): State<AuthService>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AuthError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "unreadable register body");
        AuthError::Validation
    })?;

    auth.register(&payload.username, &payload.password).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Registration successful".into(),
    }))
}

#[instrument(skip(auth, payload))]
pub async fn login(
    State(auth): State<AuthService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "unreadable login body");
        AuthError::Validation
    })?;

    let user = auth.login(&payload.username, &payload.password).await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".into(),
        user: PublicUser::from(user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use axum::{http::StatusCode, response::IntoResponse};
    use http_body_util::BodyExt;

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn creds(username: &str, password: &str) -> (String, String) {
        (username.to_string(), password.to_string())
    }

    async fn do_register(auth: &AuthService, (username, password): (String, String)) -> axum::response::Response {
        register(
            State(auth.clone()),
            Ok(Json(RegisterRequest { username, password })),
        )
        .await
        .into_response()
    }

    async fn do_login(auth: &AuthService, (username, password): (String, String)) -> axum::response::Response {
        login(
            State(auth.clone()),
            Ok(Json(LoginRequest { username, password })),
        )
        .await
        .into_response()
    }

    #[tokio::test]
    async fn register_success_does_not_echo_the_user() {
        let auth = AuthService::new(memory_pool().await);
        let res = do_register(&auth, creds("alice", "secret1")).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["success"], true);
        assert!(body["message"].is_string());
        assert!(body.get("user").is_none());
    }

    #[tokio::test]
    async fn duplicate_register_is_conflict() {
        let auth = AuthService::new(memory_pool().await);
        do_register(&auth, creds("alice", "secret1")).await;
        let res = do_register(&auth, creds("alice", "other")).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body = body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Username already exists");
    }

    #[tokio::test]
    async fn login_returns_public_user_without_hash() {
        let auth = AuthService::new(memory_pool().await);
        do_register(&auth, creds("alice", "secret1")).await;
        let res = do_login(&auth, creds("alice", "secret1")).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["username"], "alice");
        assert!(body["user"]["id"].is_i64());
        assert!(body["user"]["created_at"].is_string());
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn login_failures_share_one_message() {
        let auth = AuthService::new(memory_pool().await);
        do_register(&auth, creds("alice", "secret1")).await;

        let wrong = do_login(&auth, creds("alice", "wrong")).await;
        let unknown = do_login(&auth, creds("bob", "anything")).await;
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(wrong).await, body_json(unknown).await);
    }

    #[tokio::test]
    async fn empty_fields_are_bad_request() {
        let auth = AuthService::new(memory_pool().await);
        let res = do_register(&auth, creds("", "x")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert_eq!(body["message"], "Username and password are required");
    }
}
