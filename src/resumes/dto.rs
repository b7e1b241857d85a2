use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /api/resumes` as sent by the résumé-maker page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRequest {
    #[serde(default, deserialize_with = "lenient_template_id")]
    pub template_id: Option<u32>,
    pub form_data: FormData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub basic_info: BasicInfo,
    pub education: Education,
    pub experiences: Vec<Experience>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicInfo {
    pub name: String,
    pub job_title: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Education {
    pub school: String,
    pub degree: String,
    pub major: String,
    pub period: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub company: String,
    pub position: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratedResume {
    pub html: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub success: bool,
    pub resume: GeneratedResume,
}

// The page sends the <select> value: a numeric string, "" or null.
fn lenient_template_id<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(u32),
        Text(String),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Num(n)) => Some(n),
        Some(RawId::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
