use anyhow::{bail, Context, Result};

/// Which backend holds session snapshots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreBackend {
    Memory,
    Redis,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Question/Answer Service.
    pub qa_service_url: String,
    pub qa_timeout_secs: u64,
    pub session_store: StoreBackend,
    /// Required when `session_store` is redis.
    pub redis_url: Option<String>,
    pub session_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let session_store = match std::env::var("SESSION_STORE")
            .unwrap_or_else(|_| "memory".to_string())
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "redis" => StoreBackend::Redis,
            other => bail!("SESSION_STORE must be 'memory' or 'redis', got '{other}'"),
        };

        let redis_url = match session_store {
            StoreBackend::Redis => Some(require_env("REDIS_URL")?),
            StoreBackend::Memory => std::env::var("REDIS_URL").ok(),
        };

        Ok(Config {
            qa_service_url: require_env("QA_SERVICE_URL")?,
            qa_timeout_secs: parse_env_or("QA_SERVICE_TIMEOUT_SECS", 120)?,
            session_store,
            redis_url,
            session_ttl_secs: parse_env_or("SESSION_TTL_SECS", 3600)?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env_or(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{key} must be a positive integer")),
        Err(_) => Ok(default),
    }
}
