use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db;
use crate::pdf::extractor::{PdfExtractor, TextExtractor};
use crate::resumes::generator::{HttpResumeGenerator, ResumeGenerator};
use crate::storage::{LocalStorage, StorageClient};

pub const UPLOADS_PREFIX: &str = "/uploads";

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub generator: Arc<dyn ResumeGenerator>,
    pub extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = db::connect(&config.database_url).await?;
        db::migrate(&db).await?;

        let storage = Arc::new(LocalStorage::new(&config.upload_dir, UPLOADS_PREFIX).await?)
            as Arc<dyn StorageClient>;

        let generator = Arc::new(HttpResumeGenerator::new(
            config.resume_service.url.clone(),
            Duration::from_secs(config.resume_service.timeout_secs),
        )?) as Arc<dyn ResumeGenerator>;

        Ok(Self {
            db,
            config,
            storage,
            generator,
            extractor: Arc::new(PdfExtractor),
        })
    }

    /// In-memory database plus fakes for every outbound collaborator.
    #[cfg(test)]
    pub async fn fake() -> Self {
        use crate::pdf::extractor::ExtractionError;
        use crate::resumes::generator::GenerationError;
        use async_trait::async_trait;
        use bytes::Bytes;

        struct FakeStorage;
        #[async_trait]
        impl StorageClient for FakeStorage {
            async fn put_object(&self, k: &str, _b: Bytes, _ct: &str) -> anyhow::Result<String> {
                Ok(format!("{UPLOADS_PREFIX}/{k}"))
            }
        }

        struct EchoGenerator;
        #[async_trait]
        impl ResumeGenerator for EchoGenerator {
            async fn generate(&self, content: &str) -> Result<String, GenerationError> {
                Ok(format!("GENERATED\n{content}"))
            }
        }

        struct FixedExtractor;
        #[async_trait]
        impl TextExtractor for FixedExtractor {
            async fn extract(&self, data: Bytes) -> Result<String, ExtractionError> {
                Ok(format!("extracted {} bytes", data.len()))
            }
        }

        let config = Arc::new(
            AppConfig::from_lookup(|k| match k {
                "DATABASE_URL" => Some("sqlite::memory:".into()),
                _ => None,
            })
            .expect("default config"),
        );

        Self {
            db: db::memory_pool().await,
            config,
            storage: Arc::new(FakeStorage),
            generator: Arc::new(EchoGenerator),
            extractor: Arc::new(FixedExtractor),
        }
    }
}
