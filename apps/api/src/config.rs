use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::retention::RetentionPolicy;

/// Application configuration loaded from environment variables.
/// Startup fails if the model credential is missing — requests must never
/// reach a handler with an unconfigured client.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub storage_dir: PathBuf,
    pub max_cv_age_hours: f64,
    pub max_cvs_stored: usize,
    pub cleanup_interval_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            storage_dir: PathBuf::from(env_or("CV_STORAGE_DIR", "temp_cvs")),
            max_cv_age_hours: parse_env("MAX_CV_AGE_HOURS", 24.0)?,
            max_cvs_stored: parse_env("MAX_CVS_STORED", 100)?,
            cleanup_interval_secs: parse_env("CLEANUP_INTERVAL_SECS", 3600)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy {
            max_age_hours: self.max_cv_age_hours,
            max_count: self.max_cvs_stored,
            interval: Duration::from_secs(self.cleanup_interval_secs),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}
