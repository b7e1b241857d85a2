use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Turns an assembled plain-text résumé description into generated résumé text.
#[async_trait]
pub trait ResumeGenerator: Send + Sync {
    async fn generate(&self, content: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    content: &'a str,
}

/// Client for the external résumé-maker endpoint. One call per request, no retries.
#[derive(Clone)]
pub struct HttpResumeGenerator {
    client: Client,
    url: String,
}

impl HttpResumeGenerator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build resume service http client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ResumeGenerator for HttpResumeGenerator {
    async fn generate(&self, content: &str) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(&self.url)
            .json(&GenerateRequest { content })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, url = %self.url, "resume service returned an error");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        debug!(chars = text.len(), "resume generated");
        Ok(text)
    }
}
