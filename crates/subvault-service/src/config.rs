//! Service configuration.

use serde::Deserialize;
use std::path::Path;

use subvault_core::FREE_TIER_LIMIT;

/// Default transcript provider endpoint.
pub const DEFAULT_TRANSCRIPT_API_URL: &str = "https://api.supadata.ai";

/// Secret the credential encryption key is derived from when none is configured.
///
/// Matches the value existing deployments encrypted with, so stored credentials stay
/// readable.
pub const DEFAULT_CREDENTIAL_SECRET: &str = "youtube-subtitle-tool";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// PostgreSQL connection string. When unset the embedded store is used.
    pub database_url: Option<String>,

    /// Path to the embedded `RocksDB` data directory (default: "/data/subvault").
    pub data_dir: String,

    /// HS256 secret the identity provider signs session tokens with.
    pub auth_jwt_secret: Option<String>,

    /// Expected JWT audience (default: "authenticated").
    pub auth_audience: String,

    /// Expected JWT issuer; not checked when unset.
    pub auth_issuer: Option<String>,

    /// Transcript provider base URL.
    pub transcript_api_url: String,

    /// Server default transcript provider key, used when the user has none.
    pub transcript_api_key: Option<String>,

    /// Secret the credential encryption key is derived from.
    pub credential_secret: String,

    /// Monthly saves allowed without a personal credential.
    pub free_tier_limit: u64,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Transcript provider secrets file structure.
#[derive(Debug, Deserialize)]
struct ProviderSecrets {
    #[serde(default)]
    api_url: Option<String>,
    api_key: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let (transcript_api_url, transcript_api_key) = load_provider_secrets();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            database_url: std::env::var("DATABASE_URL").ok(),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/subvault".into()),
            auth_jwt_secret: std::env::var("AUTH_JWT_SECRET").ok(),
            auth_audience: std::env::var("AUTH_AUDIENCE")
                .unwrap_or_else(|_| "authenticated".into()),
            auth_issuer: std::env::var("AUTH_ISSUER").ok(),
            transcript_api_url: transcript_api_url
                .unwrap_or_else(|| DEFAULT_TRANSCRIPT_API_URL.into()),
            transcript_api_key,
            credential_secret: std::env::var("CREDENTIAL_SECRET")
                .unwrap_or_else(|_| DEFAULT_CREDENTIAL_SECRET.into()),
            free_tier_limit: std::env::var("FREE_TIER_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(FREE_TIER_LIMIT),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        }
    }
}

/// Load transcript provider secrets from file or environment.
fn load_provider_secrets() -> (Option<String>, Option<String>) {
    let secret_paths = [".secrets/supadata.json", "../.secrets/supadata.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<ProviderSecrets>(path) {
            tracing::info!(path = %path, "Loaded transcript provider secrets from file");
            return (
                secrets
                    .api_url
                    .or_else(|| std::env::var("SUPADATA_API_URL").ok()),
                Some(secrets.api_key),
            );
        }
    }

    tracing::debug!("Provider secrets file not found, using environment variables");
    (
        std::env::var("SUPADATA_API_URL").ok(),
        std::env::var("SUPADATA_API_KEY").ok(),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            database_url: None,
            data_dir: "/data/subvault".into(),
            auth_jwt_secret: None,
            auth_audience: "authenticated".into(),
            auth_issuer: None,
            transcript_api_url: DEFAULT_TRANSCRIPT_API_URL.into(),
            transcript_api_key: None,
            credential_secret: DEFAULT_CREDENTIAL_SECRET.into(),
            free_tier_limit: FREE_TIER_LIMIT,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 60,
        }
    }
}
