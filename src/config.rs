//! Environment-driven server configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ARTIFACTS_DIR: &str = "permit-extract-artifacts";
const DEFAULT_ARTIFACT_TTL_SECS: u64 = 3600;
const DEFAULT_ARTIFACT_SWEEP_SECS: u64 = 300;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub artifacts_dir: PathBuf,
    /// `None` disables eviction.
    pub artifact_ttl: Option<Duration>,
    pub sweep_interval: Duration,
    /// Empty means any origin is accepted.
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Read from the process environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let artifacts_dir = var("ARTIFACTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join(DEFAULT_ARTIFACTS_DIR));

        let ttl_secs = seconds(var("ARTIFACT_TTL_SECS"), "ARTIFACT_TTL_SECS", DEFAULT_ARTIFACT_TTL_SECS)?;
        let sweep_secs = seconds(
            var("ARTIFACT_SWEEP_SECS"),
            "ARTIFACT_SWEEP_SECS",
            DEFAULT_ARTIFACT_SWEEP_SECS,
        )?;
        if sweep_secs == 0 {
            return Err(ConfigError::Zero {
                name: "ARTIFACT_SWEEP_SECS",
            });
        }

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            artifacts_dir,
            artifact_ttl: (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)),
            sweep_interval: Duration::from_secs(sweep_secs),
            allowed_origins,
        })
    }
}

fn seconds(value: Option<String>, name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match value {
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}
