//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use opendal::{Operator, services};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// What the storage backend reports for a stored file.
///
/// Kept verbatim in `Submission::files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Object key.
    pub public_id: String,
    /// Public URL of the object.
    pub secure_url: String,
    /// Stored size in bytes.
    pub bytes: u64,
    /// Content type the object was stored with.
    pub content_type: String,
    /// Filename as sent by the client.
    pub original_filename: String,
    /// When the object was written.
    pub created_at: DateTime<Utc>,
}

/// Storage service for submitted files.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl std::fmt::Debug for StorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageService")
            .field("provider", &self.config.provider.name())
            .field("folder", &self.config.folder)
            .finish_non_exhaustive()
    }
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
        let operator = match provider {
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
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
        };

        Ok(operator)
    }

    /// Generate the object key for a file.
    ///
    /// Format: `{folder}/{unix_millis}-{8 random hex}-{sanitized_filename}`
    #[must_use]
    pub fn generate_object_key(folder: &str, at: DateTime<Utc>, filename: &str) -> String {
        let mut nonce = [0u8; 4];
        rand::rng().fill_bytes(&mut nonce);

        format!(
            "{}/{}-{}-{}",
            folder.trim_matches('/'),
            at.timestamp_millis(),
            hex::encode(nonce),
            sanitize_filename(filename)
        )
    }

    /// Write a file and report where it is served from.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::FileTooLarge` above the configured limit, or the
    /// backend's error if the write fails.
    pub async fn upload(
        &self,
        data: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<UploadResult, StorageError> {
        let size = data.len() as u64;
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        let created_at = Utc::now();
        let key = Self::generate_object_key(&self.config.folder, created_at, filename);

        self.operator
            .write_with(&key, data)
            .content_type(content_type)
            .await
            .map_err(StorageError::from)?;

        tracing::debug!(key = %key, size, provider = self.provider_name(), "File stored");

        Ok(UploadResult {
            secure_url: self.config.public_url(&key),
            public_id: key,
            bytes: size,
            content_type: content_type.to_string(),
            original_filename: filename.to_string(),
            created_at,
        })
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Sanitize filename for storage key.
///
/// Removes or replaces characters that could cause issues in storage paths.
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}
