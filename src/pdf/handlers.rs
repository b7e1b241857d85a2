use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{errors::AppError, state::AppState, storage::object_key};

const PDF_MIME: &str = "application/pdf";
const NO_FILE: &str = "Please upload a PDF file";

#[derive(Debug, Serialize)]
pub struct ExtractPdfResponse {
    pub success: bool,
    pub text: String,
    pub filename: String,
}

pub fn pdf_routes() -> Router<AppState> {
    Router::new().route("/api/extract-pdf", post(extract_pdf))
}

/// POST /api/extract-pdf (multipart)
/// Field: resume (application/pdf)
#[instrument(skip(state, mp))]
pub async fn extract_pdf(
    State(state): State<AppState>,
    mp: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractPdfResponse>, AppError> {
    let mut mp = mp.map_err(|e| {
        warn!(reason = %e.body_text(), "request is not a multipart upload");
        AppError::BadRequest(NO_FILE.into())
    })?;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("resume") {
            continue;
        }

        let filename = field.file_name().unwrap_or("resume.pdf").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        if content_type != PDF_MIME {
            warn!(%filename, %content_type, "rejected non-pdf upload");
            return Err(AppError::BadRequest("Only PDF files are accepted".into()));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?;

        let key = object_key("resumes", "resume", Some(&filename), PDF_MIME);
        state
            .storage
            .put_object(&key, data.clone(), PDF_MIME)
            .await
            .map_err(AppError::Storage)?;

        let text = state.extractor.extract(data).await?;

        info!(%filename, %key, chars = text.len(), "pdf text extracted");
        return Ok(Json(ExtractPdfResponse {
            success: true,
            text,
            filename,
        }));
    }

    Err(AppError::BadRequest(NO_FILE.into()))
}
