use serde::Deserialize;
use std::time::Duration;

/// Backend used when neither `PEOPLE_API_BASE_URL` nor `API_BASE_URL` is set.
pub const DEFAULT_API_BASE_URL: &str = "https://api.srv839663.hstgr.cloud/api";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the people lookup backend, without a trailing slash.
    pub api_base_url: String,
    pub port: u16,
    /// Outbound request timeout. `None` keeps the transport default.
    pub http_timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            api_base_url: std::env::var("PEOPLE_API_BASE_URL")
                .or_else(|_| std::env::var("API_BASE_URL"))
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| parse_base_url(&url))
                .unwrap_or_else(|| Ok(DEFAULT_API_BASE_URL.to_string()))?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|raw| parse_timeout_secs(&raw))
                .transpose()?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("People API Base URL: {}", config.api_base_url);
        tracing::debug!("Server Port: {}", config.port);
        if let Some(secs) = config.http_timeout_secs {
            tracing::debug!("HTTP timeout: {}s", secs);
        }

        Ok(config)
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}

/// Validates a backend base URL and strips any trailing slash so endpoint
/// paths can be appended directly.
pub fn parse_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("API base URL cannot be empty");
    }
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| anyhow::anyhow!("API base URL '{}' is invalid: {}", trimmed, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("API base URL must start with http:// or https://");
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn parse_timeout_secs(raw: &str) -> anyhow::Result<u64> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a positive integer"))?;
    if secs == 0 {
        anyhow::bail!("HTTP_TIMEOUT_SECS must be a positive integer");
    }
    Ok(secs)
}
