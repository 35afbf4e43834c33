//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Upload staging configuration.
    #[serde(default)]
    pub staging: StagingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Which object storage backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// S3-compatible storage.
    S3,
    /// Google Cloud Storage (Firebase Storage buckets live here).
    Gcs,
    /// Local filesystem, served back over HTTP.
    #[default]
    Local,
}

/// Object storage configuration.
///
/// Only the fields relevant to the selected [`StorageKind`] are read.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Storage backend.
    #[serde(default)]
    pub provider: StorageKind,
    /// Bucket name (S3, GCS).
    #[serde(default)]
    pub bucket: String,
    /// Service endpoint (S3 required, GCS optional).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Access key ID (S3).
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Secret access key (S3).
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Region (S3).
    #[serde(default = "default_region")]
    pub region: String,
    /// Service account credential file (GCS).
    #[serde(default)]
    pub credential_path: Option<String>,
    /// Root directory (local).
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// Base URL under which local objects are served.
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Lifetime of signed read URLs in seconds.
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_secs: u64,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageKind::default(),
            bucket: String::new(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            region: default_region(),
            credential_path: None,
            root: default_storage_root(),
            public_url: default_public_url(),
            signed_url_ttl_secs: default_signed_url_ttl(),
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_storage_root() -> String {
    "./storage".to_string()
}

fn default_public_url() -> String {
    "http://localhost:3000/files".to_string()
}

fn default_signed_url_ttl() -> u64 {
    3600 // 1 hour
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10 MiB
}

/// Upload staging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StagingConfig {
    /// Directory used to buffer uploads before they reach object storage.
    #[serde(default = "default_staging_dir")]
    pub dir: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            dir: default_staging_dir(),
        }
    }
}

fn default_staging_dir() -> String {
    "./temp".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("NOTICEBOARD").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
