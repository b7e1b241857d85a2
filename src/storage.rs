use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use time::OffsetDateTime;
use tracing::debug;

/// Upload sink. Returns the public URL path the stored object is served under.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str)
        -> anyhow::Result<String>;
}

/// Stores objects as files below `root`, served by the static layer under `public_prefix`.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    public_prefix: String,
}

impl LocalStorage {
    pub async fn new(root: impl Into<PathBuf>, public_prefix: &str) -> anyhow::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("create upload dir {}", root.display()))?;
        Ok(Self {
            root,
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        })
    }

    fn resolve(&self, key: &str) -> anyhow::Result<PathBuf> {
        let rel = Path::new(key);
        anyhow::ensure!(
            !key.is_empty() && rel.components().all(|c| matches!(c, Component::Normal(_))),
            "invalid object key {key:?}"
        );
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> anyhow::Result<String> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        debug!(%key, %content_type, size = body.len(), "object stored");
        Ok(format!("{}/{}", self.public_prefix, key))
    }
}

/// Builds `<dir>/<field>-<unix millis>-<random>.<ext>`, taking the extension from the
/// original file name and falling back to the content type.
pub fn object_key(dir: &str, field: &str, file_name: Option<&str>, content_type: &str) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let ext = file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
        .or_else(|| ext_from_mime(content_type).map(str::to_string));

    match ext {
        Some(ext) => format!("{dir}/{field}-{millis}-{suffix}.{ext}"),
        None => format!("{dir}/{field}-{millis}-{suffix}"),
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "application/pdf" => Some("pdf"),
        "application/msword" => Some("doc"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Some("docx"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("application/pdf"), Some("pdf"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[test]
    fn object_key_prefers_original_extension() {
        let key = object_key("templates/images", "image", Some("Cover.PNG"), "image/jpeg");
        assert!(key.starts_with("templates/images/image-"));
        assert!(key.ends_with(".png"));

        let key = object_key("resumes", "resume", Some("cv"), "application/pdf");
        assert!(key.ends_with(".pdf"));

        let key = object_key("resumes", "resume", None, "application/octet-stream");
        assert!(!key.contains('.'));
    }

    #[test]
    fn object_keys_are_unique() {
        let a = object_key("d", "f", Some("a.pdf"), "");
        let b = object_key("d", "f", Some("a.pdf"), "");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn local_storage_writes_under_root_and_returns_public_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "/uploads/").await.unwrap();

        let url = storage
            .put_object("resumes/cv.pdf", Bytes::from_static(b"%PDF-1.4"), "application/pdf")
            .await
            .unwrap();

        assert_eq!(url, "/uploads/resumes/cv.pdf");
        let written = std::fs::read(dir.path().join("resumes/cv.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn local_storage_rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "/uploads").await.unwrap();

        for key in ["../outside.txt", "/etc/passwd", ""] {
            let err = storage
                .put_object(key, Bytes::from_static(b"x"), "text/plain")
                .await
                .unwrap_err();
            assert!(err.to_string().contains("invalid object key"), "{key}");
        }
    }
}
