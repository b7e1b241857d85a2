use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::services::AuthError;
use crate::pdf::extractor::ExtractionError;
use crate::resumes::generator::GenerationError;

pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Body of every failed request: `{"success": false, "message": "..."}`.
#[derive(Debug, Serialize)]
pub struct Failure {
    pub success: bool,
    pub message: String,
}

pub fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(Failure {
            success: false,
            message: message.into(),
        }),
    )
        .into_response()
}

/// Errors of the non-auth routes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("resume generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("pdf extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                warn!(message = %msg, "bad request");
                failure(StatusCode::BAD_REQUEST, msg)
            }
            AppError::NotFound(msg) => failure(StatusCode::NOT_FOUND, msg),
            AppError::Generation(e) => {
                error!(error = %e, "resume generation failed");
                failure(StatusCode::BAD_GATEWAY, "Failed to generate resume")
            }
            AppError::Extraction(e) => {
                warn!(error = %e, "pdf extraction failed");
                failure(StatusCode::UNPROCESSABLE_ENTITY, "Failed to parse PDF")
            }
            AppError::Storage(e) => {
                error!(error = ?e, "storage error");
                failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store file")
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Validation => StatusCode::BAD_REQUEST,
            AuthError::Conflict => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Internal(e) => {
                error!(error = ?e, "auth internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        failure(status, self.to_string())
    }
}

/// Converts a handler panic into a 500 response so the process keeps serving.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(panic = %detail, "request handler panicked");
    failure(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn auth_errors_map_to_status_and_message() {
        let res = AuthError::Conflict.into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body = body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Username already exists");

        let res = AuthError::Internal(anyhow::anyhow!("disk on fire")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(res).await;
        assert_eq!(body["message"], INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn internal_details_are_not_leaked() {
        let res = AppError::Storage(anyhow::anyhow!("write /srv/uploads/x: disk full")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(res).await;
        assert_eq!(body["message"], "Failed to store file");
    }

    #[tokio::test]
    async fn generation_failure_is_a_bad_gateway() {
        let err = GenerationError::Status {
            status: 503,
            body: "overloaded".into(),
        };
        let res = AppError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to generate resume");
    }

    #[tokio::test]
    async fn panic_payloads_become_internal_errors() {
        let res = panic_response(Box::new("boom"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let res = panic_response(Box::new(String::from("boom")));
        let body = body_json(res).await;
        assert_eq!(body["message"], INTERNAL_MESSAGE);
    }
}
