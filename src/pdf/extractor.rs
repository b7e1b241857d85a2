use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unreadable pdf: {0}")]
    Parse(String),

    #[error("extraction task failed: {0}")]
    Task(#[source] tokio::task::JoinError),
}

/// Pulls plain text out of an uploaded document.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, data: Bytes) -> Result<String, ExtractionError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, data: Bytes) -> Result<String, ExtractionError> {
        let size = data.len();
        // Parsing is CPU-bound, and the parser panics on some malformed inputs.
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| format!("{e:?}"))
        })
        .await
        .map_err(|e| {
            if e.is_panic() {
                ExtractionError::Parse("parser panicked on malformed input".into())
            } else {
                ExtractionError::Task(e)
            }
        })?
        .map_err(ExtractionError::Parse)?;
        debug!(size, chars = text.len(), "pdf text extracted");
        Ok(text)
    }
}
