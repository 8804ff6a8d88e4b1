//! Asset service trait definition.

use vitrine_core::{RemoteAsset, RemoteId, SourceFile};
use vitrine_error::AssetServiceError;

/// Contract of the remote asset store consumed by the draft coordinator.
///
/// Implementations must accept concurrent calls. Each call either succeeds or
/// fails with a cause; callers assume nothing about completion order.
#[async_trait::async_trait]
pub trait AssetService: Send + Sync {
    /// Upload one file and return its remote identity.
    ///
    /// # Arguments
    ///
    /// * `file` - The local file payload
    ///
    /// # Returns
    ///
    /// The remote id (needed for deletes) and a displayable remote location
    async fn upload(&self, file: &SourceFile) -> Result<RemoteAsset, AssetServiceError>;

    /// Delete a previously uploaded asset.
    ///
    /// # Arguments
    ///
    /// * `remote_id` - Identifier returned by [`AssetService::upload`]
    async fn delete(&self, remote_id: &RemoteId) -> Result<(), AssetServiceError>;

    /// Backend name for logs (e.g. "http", "filesystem").
    fn backend(&self) -> &str;
}
