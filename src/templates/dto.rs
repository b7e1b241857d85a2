use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedTemplate {
    pub id: i64,
    pub name: Option<String>,
    pub image_url: String,
    pub download_url: String,
}

#[derive(Debug, Serialize)]
pub struct UploadTemplateResponse {
    pub success: bool,
    pub message: String,
    pub template: UploadedTemplate,
}
