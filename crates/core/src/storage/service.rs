//! Storage service implementation using Apache OpenDAL.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use opendal::{Operator, services};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Prefix under which notification images are stored.
const IMAGE_PREFIX: &str = "images";

/// Signed read URL for an object.
#[derive(Debug, Clone)]
pub struct SignedUrl {
    /// The signed URL.
    pub url: String,
    /// When the URL expires.
    pub expires_at: DateTime<Utc>,
}

/// Storage service for notification images.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::Gcs {
                bucket,
                endpoint,
                credential_path,
            } => {
                let mut builder = services::Gcs::default().bucket(bucket);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }
                if let Some(path) = credential_path {
                    builder = builder.credential_path(path);
                }

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::LocalFs { root, .. } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
        }
    }

    /// Validate an upload against the size limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is larger than the configured maximum.
    pub fn validate_upload(&self, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }
        Ok(())
    }

    /// Generate the storage key for a notification image.
    ///
    /// Format: `images/{unix_millis}_{sanitized_filename}`
    #[must_use]
    pub fn image_key(filename: &str, at: DateTime<Utc>) -> String {
        format!(
            "{IMAGE_PREFIX}/{}_{}",
            at.timestamp_millis(),
            sanitize_filename(filename)
        )
    }

    /// Write an object with its content type.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn put(
        &self,
        key: &str,
        data: impl Into<Bytes>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let data = data.into();
        // The filesystem backend rejects content types instead of ignoring them.
        if self
            .operator
            .info()
            .full_capability()
            .write_with_content_type
        {
            self.operator
                .write_with(key, data)
                .content_type(content_type)
                .await
                .map_err(StorageError::from)?;
        } else {
            self.operator
                .write(key, data)
                .await
                .map_err(StorageError::from)?;
        }
        Ok(())
    }

    /// Generate a signed read URL valid for the configured TTL.
    ///
    /// The local filesystem cannot presign, so it hands out a URL under its
    /// public base instead. The `expires` parameter is informational there.
    ///
    /// # Errors
    ///
    /// Returns an error if presigning is not supported or fails.
    pub async fn signed_read_url(&self, key: &str) -> Result<SignedUrl, StorageError> {
        let ttl_secs = self.config.signed_url_ttl_secs;
        let expires_at =
            Utc::now() + chrono::Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX));

        if let StorageProvider::LocalFs { public_url, .. } = &self.config.provider {
            if public_url.is_empty() {
                return Err(StorageError::PresignNotSupported);
            }
            return Ok(SignedUrl {
                url: format!(
                    "{}/{key}?expires={}",
                    public_url.trim_end_matches('/'),
                    expires_at.timestamp()
                ),
                expires_at,
            });
        }

        let presigned = self
            .operator
            .presign_read(key, Duration::from_secs(ttl_secs))
            .await
            .map_err(StorageError::from)?;

        Ok(SignedUrl {
            url: presigned.uri().to_string(),
            expires_at,
        })
    }

    /// Delete an object from storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the object does not exist, or an
    /// operation error if the lookup or the deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self.operator.stat(key).await {
            Ok(_) => {}
            Err(e) if matches!(e.kind(), opendal::ErrorKind::NotFound) => {
                return Err(StorageError::not_found(key));
            }
            Err(e) => return Err(e.into()),
        }
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        self.operator.stat(key).await.is_ok()
    }

    /// Recover the object key a signed URL points at.
    ///
    /// Strips the store's base prefix (`/{bucket}/` for cloud stores, the
    /// public URL for local storage) and any query string.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not belong to this store.
    pub fn object_key(&self, url: &str) -> Result<String, StorageError> {
        let path = url.split_once('?').map_or(url, |(path, _)| path);

        let key = match &self.config.provider {
            StorageProvider::S3 { bucket, .. } | StorageProvider::Gcs { bucket, .. } => path
                .split_once(&format!("/{bucket}/"))
                .map(|(_, key)| key),
            StorageProvider::LocalFs { public_url, .. } => {
                path.strip_prefix(&format!("{}/", public_url.trim_end_matches('/')))
            }
        };

        match key {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => Err(StorageError::invalid_key(url)),
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Sanitize filename for storage keys and staging paths.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
pub(crate) fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Extension trait for pipe operator.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn local_service() -> (StorageService, std::path::PathBuf) {
        let root = std::env::temp_dir().join(format!("noticeboard-storage-{}", uuid::Uuid::new_v4()));
        let config = StorageConfig::new(StorageProvider::local_fs(
            root.clone(),
            "http://localhost:3000/files",
        ));
        let service = StorageService::from_config(config).expect("should create service");
        (service, root)
    }

    fn gcs_service() -> StorageService {
        let config = StorageConfig::new(StorageProvider::gcs("firestoreiqro.appspot.com"));
        StorageService::from_config(config).expect("should create service")
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("banner.png"), "banner.png");
        assert_eq!(sanitize_filename("my image (1).jpg"), "my_image__1_.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("日本語.png"), "___.png");
    }

    #[test]
    fn test_image_key() {
        let at = Utc.timestamp_millis_opt(1_704_067_200_123).unwrap();
        assert_eq!(
            StorageService::image_key("poster final.png", at),
            "images/1704067200123_poster_final.png"
        );
    }

    #[test]
    fn test_validate_upload_size() {
        let (service, _) = local_service();
        let max = service.config().max_file_size;

        assert!(service.validate_upload(max).is_ok());
        let err = service.validate_upload(max + 1).unwrap_err();
        assert!(matches!(err, StorageError::FileTooLarge { .. }));
    }

    #[rstest]
    #[case(
        "https://storage.googleapis.com/firestoreiqro.appspot.com/images/1_a.png?GoogleAccessId=x&Expires=1&Signature=y",
        "images/1_a.png"
    )]
    #[case(
        "https://storage.googleapis.com/firestoreiqro.appspot.com/images/1_a.png",
        "images/1_a.png"
    )]
    fn test_object_key_from_gcs_url(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(gcs_service().object_key(url).unwrap(), expected);
    }

    #[test]
    fn test_object_key_from_s3_url() {
        let config = StorageConfig::new(StorageProvider::s3(
            "https://s3.example.com",
            "notifications",
            "key",
            "secret",
            "auto",
        ));
        let service = StorageService::from_config(config).unwrap();
        let url = "https://s3.example.com/notifications/images/1_a.png?X-Amz-Expires=3600";
        assert_eq!(service.object_key(url).unwrap(), "images/1_a.png");
    }

    #[rstest]
    #[case("https://elsewhere.example.com/other-bucket/images/1_a.png")]
    #[case("https://storage.googleapis.com/firestoreiqro.appspot.com/")]
    #[case("")]
    fn test_object_key_rejects_foreign_url(#[case] url: &str) {
        let err = gcs_service().object_key(url).unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_local_put_sign_delete() {
        let (service, root) = local_service();
        let key = "images/1_banner.png";

        service.put(key, b"png-bytes".to_vec(), "image/png").await.unwrap();
        assert!(service.exists(key).await);

        let signed = service.signed_read_url(key).await.unwrap();
        assert!(signed.url.starts_with("http://localhost:3000/files/images/1_banner.png?expires="));
        assert!(signed.expires_at > Utc::now());
        assert_eq!(service.object_key(&signed.url).unwrap(), key);

        service.delete(key).await.unwrap();
        assert!(!service.exists(key).await);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_delete_missing_object_is_not_found() {
        let (service, root) = local_service();
        let err = service.delete("images/missing.png").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_delete_lookup_failure_is_not_not_found() {
        let (service, root) = local_service();
        service.put("images/a.png", b"png".to_vec(), "image/png").await.unwrap();

        // a path below a regular file fails to stat with something other than NotFound
        let err = service.delete("images/a.png/child").await.unwrap_err();

        assert!(matches!(err, StorageError::Operation(_)), "got {err:?}");
        assert!(service.exists("images/a.png").await);
        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_local_without_public_url_cannot_sign() {
        let root = std::env::temp_dir().join(format!("noticeboard-storage-{}", uuid::Uuid::new_v4()));
        let config = StorageConfig::new(StorageProvider::local_fs(root, ""));
        let service = StorageService::from_config(config).unwrap();

        let err = service.signed_read_url("images/1_a.png").await.unwrap_err();
        assert!(matches!(err, StorageError::PresignNotSupported));
    }
}
