use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "MedScan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest accepted image upload (20 MiB).
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;
/// Allowance for multipart framing and text fields on top of the image.
pub const MULTIPART_OVERHEAD_BYTES: usize = 5 * 1024 * 1024;

pub const DEFAULT_DEPLOYMENT: &str = "gpt-4o-vision";
pub const DEFAULT_API_VERSION: &str = "2024-02-15-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_FRONTEND_DIR: &str = "frontend";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medscan=info,medscan_lib=info,tower_http=info"
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Settings for the hosted vision model, read once at client construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub endpoint: String,
    pub credential: String,
    pub deployment: String,
    pub api_version: String,
    /// `false` disables certificate verification. Debug use only.
    pub verify_ssl: bool,
    pub timeout: Duration,
    pub max_retries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory served under `/ui`. Skipped when it does not exist.
    pub frontend_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Build configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = get("AZURE_OPENAI_ENDPOINT")
            .ok_or(ConfigError::Missing("AZURE_OPENAI_ENDPOINT"))?;
        let credential =
            get("AZURE_OPENAI_KEY").ok_or(ConfigError::Missing("AZURE_OPENAI_KEY"))?;

        let timeout_secs = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(v) => v.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                var: "UPSTREAM_TIMEOUT_SECS",
                value: v,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let max_retries = match get("UPSTREAM_MAX_RETRIES") {
            Some(v) => v.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
                var: "UPSTREAM_MAX_RETRIES",
                value: v,
            })?,
            None => DEFAULT_MAX_RETRIES,
        };

        let bind_raw = get("MEDSCAN_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid {
                var: "MEDSCAN_BIND",
                value: bind_raw.clone(),
            })?;

        Ok(Self {
            upstream: UpstreamConfig {
                endpoint: endpoint.trim().trim_end_matches('/').to_string(),
                credential,
                deployment: get("AZURE_OPENAI_DEPLOYMENT")
                    .unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string()),
                api_version: get("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
                verify_ssl: parse_verify_ssl(get("VERIFY_SSL").as_deref()),
                timeout: Duration::from_secs(timeout_secs),
                max_retries,
            },
            server: ServerConfig {
                bind_addr,
                frontend_dir: PathBuf::from(
                    get("MEDSCAN_FRONTEND_DIR")
                        .unwrap_or_else(|| DEFAULT_FRONTEND_DIR.to_string()),
                ),
            },
        })
    }
}

/// Verification stays on unless the value is explicitly something other than `true`.
fn parse_verify_ssl(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => v.trim().eq_ignore_ascii_case("true"),
    }
}
