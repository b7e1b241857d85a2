use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    content::{build_resume_content, render_resume_html, validate, DEFAULT_TEMPLATE_ID},
    dto::{GeneratedResume, ResumeRequest, ResumeResponse},
};
use crate::{errors::AppError, state::AppState};

pub fn resume_routes() -> Router<AppState> {
    Router::new().route("/api/resumes", post(create_resume))
}

/// POST /api/resumes { templateId?, formData }
#[instrument(skip(state, payload))]
pub async fn create_resume(
    State(state): State<AppState>,
    payload: Result<Json<ResumeRequest>, JsonRejection>,
) -> Result<Json<ResumeResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    validate(&req.form_data)?;

    let content = build_resume_content(&req.form_data);
    let text = state.generator.generate(&content).await?;

    let template_id = req.template_id.unwrap_or(DEFAULT_TEMPLATE_ID);
    let html = render_resume_html(template_id, &req.form_data.basic_info);

    info!(template_id, chars = text.len(), "resume generated");
    Ok(Json(ResumeResponse {
        success: true,
        resume: GeneratedResume { html, text },
    }))
}
