//! Filesystem-backed asset service for local development.
//!
//! Uploaded images are written under a hashed directory layout so that large
//! catalogs do not pile thousands of files into one directory.

use crate::AssetService;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;
use vitrine_core::{RemoteAsset, RemoteId, SourceFile};
use vitrine_error::{AssetServiceError, AssetServiceErrorKind};

/// Filesystem asset store.
///
/// Stores uploads in a content-hashed structure:
/// `{base_path}/{hash[0:2]}/{hash[2:4]}/{hash}-{uuid}.{ext}`
///
/// # Example Structure
///
/// ```text
/// /var/vitrine/assets/
/// ├── ab/
/// │   └── cd/
/// │       ├── abcdef12...-0f3e...c1.png
/// │       └── abcdef12...-77a9...02.png   (same bytes, second upload)
/// └── 12/
///     └── 34/
///         └── 123456ab...-9b1d...e4.jpg
/// ```
///
/// The remote id is the file name. Each upload gets its own object, even for
/// identical bytes, so deleting one draft image never breaks another one.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct FileSystemAssetService {
    base_path: PathBuf,
}

impl FileSystemAssetService {
    /// Create a new filesystem asset store.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, AssetServiceError> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            AssetServiceError::new(AssetServiceErrorKind::Io(format!(
                "create {}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created filesystem asset store");
        Ok(Self { base_path })
    }

    /// Compute SHA-256 hash of data.
    fn compute_hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    /// Resolve a remote id to its path, refusing ids that could escape the store.
    fn path_for(&self, remote_id: &RemoteId) -> Result<PathBuf, AssetServiceError> {
        let id = remote_id.as_str();
        let valid = id.len() > 4
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
            && !id.contains("..")
            && id[0..4].chars().all(|c| c.is_ascii_hexdigit());

        if !valid {
            return Err(AssetServiceError::new(AssetServiceErrorKind::NotFound(
                id.to_string(),
            )));
        }

        Ok(self.base_path.join(&id[0..2]).join(&id[2..4]).join(id))
    }

    /// Read back an uploaded asset, verifying its content hash.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids and `Io` if the bytes no longer
    /// match the hash recorded in the id.
    #[tracing::instrument(skip(self), fields(remote_id = %remote_id))]
    pub async fn retrieve(&self, remote_id: &RemoteId) -> Result<Vec<u8>, AssetServiceError> {
        let path = self.path_for(remote_id)?;
        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssetServiceError::new(AssetServiceErrorKind::NotFound(remote_id.to_string()))
            } else {
                AssetServiceError::new(AssetServiceErrorKind::Io(format!(
                    "read {}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        let expected = remote_id.as_str().split('-').next().unwrap_or_default();
        let actual = Self::compute_hash(&data);
        if actual != expected {
            return Err(AssetServiceError::new(AssetServiceErrorKind::Io(format!(
                "Hash mismatch: expected {}, got {}",
                expected, actual
            ))));
        }

        Ok(data)
    }

    fn location(path: &Path) -> String {
        format!("file://{}", path.display())
    }
}

#[async_trait::async_trait]
impl AssetService for FileSystemAssetService {
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name(), size = file.len()))]
    async fn upload(&self, file: &SourceFile) -> Result<RemoteAsset, AssetServiceError> {
        if file.is_empty() {
            return Err(AssetServiceError::new(AssetServiceErrorKind::Rejected(
                format!("{} is empty", file.file_name()),
            )));
        }

        let hash = Self::compute_hash(file.bytes());
        let ext = file.extension().unwrap_or_else(|| "bin".to_string());
        let remote_id = RemoteId::new(format!("{}-{}.{}", hash, Uuid::new_v4().simple(), ext));
        let path = self.path_for(&remote_id)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AssetServiceError::new(AssetServiceErrorKind::Io(format!(
                    "create {}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, file.bytes()).await.map_err(|e| {
            AssetServiceError::new(AssetServiceErrorKind::Io(format!(
                "write {}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            AssetServiceError::new(AssetServiceErrorKind::Io(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(
            remote_id = %remote_id,
            path = %path.display(),
            "Stored asset"
        );

        Ok(RemoteAsset {
            remote_id,
            remote_location: Self::location(&path),
        })
    }

    #[tracing::instrument(skip(self), fields(remote_id = %remote_id))]
    async fn delete(&self, remote_id: &RemoteId) -> Result<(), AssetServiceError> {
        let path = self.path_for(remote_id)?;

        tokio::fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssetServiceError::new(AssetServiceErrorKind::NotFound(remote_id.to_string()))
            } else {
                AssetServiceError::new(AssetServiceErrorKind::Io(format!(
                    "delete {}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::info!(path = %path.display(), "Deleted asset");
        Ok(())
    }

    fn backend(&self) -> &str {
        "filesystem"
    }
}
