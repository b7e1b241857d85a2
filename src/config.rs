use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ResumeServiceConfig {
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub upload_dir: String,
    pub max_upload_mb: usize,
    pub resume_service: ResumeServiceConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = get("APP_PORT", "3000")
            .parse::<u16>()
            .context("APP_PORT must be a valid port number")?;
        let max_upload_mb = get("MAX_UPLOAD_MB", "20")
            .parse::<usize>()
            .context("MAX_UPLOAD_MB must be a positive integer")?;
        let resume_service = ResumeServiceConfig {
            url: get(
                "RESUME_SERVICE_URL",
                "http://localhost:8000/api/chat_resume_maker",
            ),
            timeout_secs: get("RESUME_SERVICE_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("RESUME_SERVICE_TIMEOUT_SECS must be a number of seconds")?,
        };

        Ok(Self {
            database_url: get("DATABASE_URL", "sqlite://users.db?mode=rwc"),
            host: get("APP_HOST", "0.0.0.0"),
            port,
            static_dir: get("STATIC_DIR", "static"),
            upload_dir: get("UPLOAD_DIR", "uploads"),
            max_upload_mb,
            resume_service,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.database_url, "sqlite://users.db?mode=rwc");
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.static_dir, "static");
        assert_eq!(cfg.upload_dir, "uploads");
        assert_eq!(cfg.max_upload_bytes(), 20 * 1024 * 1024);
        assert_eq!(
            cfg.resume_service.url,
            "http://localhost:8000/api/chat_resume_maker"
        );
        assert_eq!(cfg.resume_service.timeout_secs, 120);
        assert_eq!(cfg.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn overrides_are_read() {
        let cfg = config_from(&[
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "8081"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("RESUME_SERVICE_URL", "http://llm.internal/make"),
        ])
        .unwrap();
        assert_eq!(cfg.socket_addr().unwrap().to_string(), "127.0.0.1:8081");
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.resume_service.url, "http://llm.internal/make");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = config_from(&[("APP_PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("APP_PORT"));
    }
}
