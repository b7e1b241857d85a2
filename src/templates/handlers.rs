use axum::{
    extract::{
        multipart::MultipartRejection, rejection::PathRejection, Multipart, Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{
    catalog::{self, ResumeTemplate},
    dto::{UploadTemplateResponse, UploadedTemplate},
};
use crate::{errors::AppError, state::AppState, storage::object_key};

pub fn template_routes() -> Router<AppState> {
    Router::new()
        .route("/api/resume-templates", get(list_templates))
        .route("/api/resume-templates/:id", get(get_template))
        .route("/api/upload-template", post(upload_template))
}

pub async fn list_templates() -> Json<&'static [ResumeTemplate]> {
    Json(catalog::catalog())
}

pub async fn get_template(
    id: Result<Path<u32>, PathRejection>,
) -> Result<Json<&'static ResumeTemplate>, AppError> {
    let Ok(Path(id)) = id else {
        return Err(AppError::NotFound("Template not found".into()));
    };
    catalog::find(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))
}

struct FilePart {
    file_name: Option<String>,
    content_type: String,
    body: Bytes,
}

/// POST /api/upload-template (multipart)
/// Fields: image (file), template (file), name (text, optional)
#[instrument(skip(state, mp))]
pub async fn upload_template(
    State(state): State<AppState>,
    mp: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadTemplateResponse>, AppError> {
    let mut mp = mp.map_err(|e| AppError::BadRequest(format!("Malformed upload: {}", e.body_text())))?;
    let mut image: Option<FilePart> = None;
    let mut document: Option<FilePart> = None;
    let mut name: Option<String> = None;

    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some(slot @ ("image" | "template")) => {
                let part = FilePart {
                    file_name: field.file_name().map(str::to_string),
                    content_type: field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string(),
                    body: field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?,
                };
                if slot == "image" {
                    image = Some(part);
                } else {
                    document = Some(part);
                }
            }
            Some("name") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?;
                name = Some(text).filter(|t| !t.is_empty());
            }
            _ => {}
        }
    }

    let (Some(image), Some(document)) = (image, document) else {
        return Err(AppError::BadRequest(
            "Both a template image and a template file are required".into(),
        ));
    };

    let image_url = store(&state, "templates/images", "image", image).await?;
    let download_url = store(&state, "templates/downloads", "template", document).await?;
    let id = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;

    info!(template_id = id, %image_url, %download_url, "template uploaded");
    Ok(Json(UploadTemplateResponse {
        success: true,
        message: "Template uploaded".into(),
        template: UploadedTemplate {
            id,
            name,
            image_url,
            download_url,
        },
    }))
}

async fn store(state: &AppState, dir: &str, field: &str, part: FilePart) -> Result<String, AppError> {
    let key = object_key(dir, field, part.file_name.as_deref(), &part.content_type);
    state
        .storage
        .put_object(&key, part.body, &part.content_type)
        .await
        .map_err(AppError::Storage)
}
