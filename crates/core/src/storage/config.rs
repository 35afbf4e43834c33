//! Storage configuration types.

use std::path::PathBuf;

use noticeboard_shared::{StorageKind, StorageSettings};

use super::error::StorageError;

/// Storage provider configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Google Cloud Storage
    Gcs {
        /// Bucket name, e.g. `project.appspot.com` for Firebase.
        bucket: String,
        /// Custom endpoint (emulators).
        endpoint: Option<String>,
        /// Path to a service account JSON file.
        credential_path: Option<String>,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
        /// Base URL the root directory is served under.
        public_url: String,
    },
}

impl StorageProvider {
    /// Create S3-compatible provider (Cloudflare R2, Supabase, AWS S3).
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create Google Cloud Storage provider.
    #[must_use]
    pub fn gcs(bucket: impl Into<String>) -> Self {
        Self::Gcs {
            bucket: bucket.into(),
            endpoint: None,
            credential_path: None,
        }
    }

    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self::LocalFs {
            root: root.into(),
            public_url: public_url.into(),
        }
    }

    /// Get the provider name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::Gcs { .. } => "gcs",
            Self::LocalFs { .. } => "local",
        }
    }

    /// Get the bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } | Self::Gcs { bucket, .. } => bucket,
            Self::LocalFs { root, .. } => root.to_str().unwrap_or("local"),
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Signed read URL TTL in seconds (default: 3600 = 1 hour).
    pub signed_url_ttl_secs: u64,
}

impl StorageConfig {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
    /// Default signed URL TTL: 1 hour.
    pub const DEFAULT_SIGNED_URL_TTL: u64 = 3600;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            signed_url_ttl_secs: Self::DEFAULT_SIGNED_URL_TTL,
        }
    }

    /// Build from the application settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a setting the selected provider needs is missing.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        let provider = match settings.provider {
            StorageKind::S3 => StorageProvider::s3(
                required(settings.endpoint.as_deref(), "storage.endpoint")?,
                required(Some(settings.bucket.as_str()), "storage.bucket")?,
                required(settings.access_key_id.as_deref(), "storage.access_key_id")?,
                required(
                    settings.secret_access_key.as_deref(),
                    "storage.secret_access_key",
                )?,
                settings.region.clone(),
            ),
            StorageKind::Gcs => StorageProvider::Gcs {
                bucket: required(Some(settings.bucket.as_str()), "storage.bucket")?,
                endpoint: settings.endpoint.clone(),
                credential_path: settings.credential_path.clone(),
            },
            StorageKind::Local => {
                StorageProvider::local_fs(settings.root.clone(), settings.public_url.clone())
            }
        };

        Ok(Self::new(provider)
            .with_max_file_size(settings.max_file_size)
            .with_signed_url_ttl(settings.signed_url_ttl_secs))
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set signed read URL TTL.
    #[must_use]
    pub fn with_signed_url_ttl(mut self, secs: u64) -> Self {
        self.signed_url_ttl_secs = secs;
        self
    }
}

fn required(value: Option<&str>, name: &str) -> Result<String, StorageError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(StorageError::configuration(format!("{name} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_provider_s3() {
        let provider = StorageProvider::s3(
            "https://account.r2.cloudflarestorage.com",
            "notifications",
            "access_key",
            "secret_key",
            "auto",
        );
        assert_eq!(provider.name(), "s3");
        assert_eq!(provider.bucket(), "notifications");
    }

    #[test]
    fn test_storage_provider_gcs() {
        let provider = StorageProvider::gcs("firestoreiqro.appspot.com");
        assert_eq!(provider.name(), "gcs");
        assert_eq!(provider.bucket(), "firestoreiqro.appspot.com");
    }

    #[test]
    fn test_storage_provider_local() {
        let provider = StorageProvider::local_fs("./storage", "http://localhost:3000/files");
        assert_eq!(provider.name(), "local");
    }

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new(StorageProvider::local_fs(
            "./storage",
            "http://localhost:3000/files",
        ));
        assert_eq!(config.max_file_size, StorageConfig::DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.signed_url_ttl_secs, 3600);
    }

    #[test]
    fn test_from_settings_local_by_default() {
        let config = StorageConfig::from_settings(&StorageSettings::default()).unwrap();
        assert_eq!(config.provider.name(), "local");
        assert_eq!(config.signed_url_ttl_secs, 3600);
    }

    #[test]
    fn test_from_settings_s3_requires_credentials() {
        let settings = StorageSettings {
            provider: StorageKind::S3,
            bucket: "notifications".to_string(),
            endpoint: Some("https://s3.example.com".to_string()),
            ..StorageSettings::default()
        };
        let err = StorageConfig::from_settings(&settings).unwrap_err();
        assert!(matches!(err, StorageError::Configuration(msg) if msg.contains("access_key_id")));
    }

    #[test]
    fn test_from_settings_gcs_requires_bucket() {
        let settings = StorageSettings {
            provider: StorageKind::Gcs,
            ..StorageSettings::default()
        };
        assert!(StorageConfig::from_settings(&settings).is_err());

        let settings = StorageSettings {
            provider: StorageKind::Gcs,
            bucket: "firestoreiqro.appspot.com".to_string(),
            ..StorageSettings::default()
        };
        let config = StorageConfig::from_settings(&settings).unwrap();
        assert_eq!(config.provider.bucket(), "firestoreiqro.appspot.com");
    }
}
