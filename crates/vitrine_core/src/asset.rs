//! Asset records and their lifecycle states.

use crate::{LocalId, LocalPreview, RemoteId, SourceFile};
use serde::{Deserialize, Serialize};

/// Lifecycle status of one asset.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetStatus {
    /// Selected locally, no upload issued yet
    Pending,
    /// Upload call in flight
    Uploading,
    /// Confirmed by the asset service
    Uploaded,
    /// Upload failed; the coordinator removes failed assets right away
    Failed,
}

/// Local half of an asset: the file payload and its transient preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAsset {
    /// File selected by the user
    pub source: SourceFile,
    /// Preview shown until the upload completes
    pub preview: LocalPreview,
}

/// Remote half of an asset, as returned by the asset service.
///
/// # Examples
///
/// ```
/// use vitrine_core::RemoteAsset;
///
/// let asset = RemoteAsset::new("img_1", "https://cdn.example.com/img_1.png");
/// assert_eq!(asset.remote_id.as_str(), "img_1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteAsset {
    /// Identifier required to delete the asset
    pub remote_id: RemoteId,
    /// Displayable remote location
    pub remote_location: String,
}

impl RemoteAsset {
    /// Create a remote asset description.
    pub fn new(remote_id: impl Into<RemoteId>, remote_location: impl Into<String>) -> Self {
        Self {
            remote_id: remote_id.into(),
            remote_location: remote_location.into(),
        }
    }
}

/// Lifecycle state of an asset.
///
/// Local states carry the file and its preview; the uploaded state carries
/// only the remote identity. A remote id therefore exists exactly when the
/// status is [`AssetStatus::Uploaded`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetState {
    /// Waiting for an upload to be issued
    Pending(LocalAsset),
    /// Upload in flight
    Uploading(LocalAsset),
    /// Upload confirmed
    Uploaded(RemoteAsset),
    /// Upload failed with a cause
    Failed {
        /// Local payload of the failed asset
        local: LocalAsset,
        /// Human-readable failure cause
        cause: String,
    },
}

impl AssetState {
    /// Status tag of this state.
    pub fn status(&self) -> AssetStatus {
        match self {
            AssetState::Pending(_) => AssetStatus::Pending,
            AssetState::Uploading(_) => AssetStatus::Uploading,
            AssetState::Uploaded(_) => AssetStatus::Uploaded,
            AssetState::Failed { .. } => AssetStatus::Failed,
        }
    }

    /// Local payload and preview, while the asset is not uploaded.
    pub fn local(&self) -> Option<&LocalAsset> {
        match self {
            AssetState::Pending(local) | AssetState::Uploading(local) => Some(local),
            AssetState::Failed { local, .. } => Some(local),
            AssetState::Uploaded(_) => None,
        }
    }

    /// Remote identity, once uploaded.
    pub fn remote(&self) -> Option<&RemoteAsset> {
        match self {
            AssetState::Uploaded(remote) => Some(remote),
            _ => None,
        }
    }
}

/// One image attached to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Registry-local identifier
    pub local_id: LocalId,
    /// Current lifecycle state
    pub state: AssetState,
    /// A delete call for this asset is in flight
    pub delete_in_flight: bool,
}

impl AssetRecord {
    /// Current status.
    pub fn status(&self) -> AssetStatus {
        self.state.status()
    }

    /// Remote id, present iff uploaded.
    pub fn remote_id(&self) -> Option<&RemoteId> {
        self.state.remote().map(|remote| &remote.remote_id)
    }

    /// Local source file, present until the upload is confirmed.
    pub fn source(&self) -> Option<&SourceFile> {
        self.state.local().map(|local| &local.source)
    }

    /// Displayable location: the local preview before upload, the remote
    /// location after.
    pub fn preview_location(&self) -> &str {
        match &self.state {
            AssetState::Uploaded(remote) => &remote.remote_location,
            AssetState::Pending(local) | AssetState::Uploading(local) => local.preview.location(),
            AssetState::Failed { local, .. } => local.preview.location(),
        }
    }

    /// File name of the local source, if still known.
    pub fn file_name(&self) -> Option<&str> {
        self.source().map(|source| source.file_name().as_str())
    }
}

/// Read-only projection of an asset for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetView {
    /// Registry-local identifier
    pub local_id: LocalId,
    /// Lifecycle status
    pub status: AssetStatus,
    /// Local preview or remote location
    pub preview_location: String,
    /// Remote id once uploaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<RemoteId>,
    /// Original file name, while the local source is held
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Zero-based position in the draft
    pub order: usize,
    /// Whether this is the primary image (position zero)
    pub is_primary: bool,
    /// Whether a delete call is in flight
    pub deleting: bool,
}

impl AssetView {
    /// Project a record at the given registry position.
    pub fn from_record(record: &AssetRecord, order: usize) -> Self {
        Self {
            local_id: record.local_id,
            status: record.status(),
            preview_location: record.preview_location().to_string(),
            remote_id: record.remote_id().cloned(),
            file_name: record.file_name().map(str::to_string),
            order,
            is_primary: order == 0,
            deleting: record.delete_in_flight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PreviewPool;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn local(pool: &PreviewPool) -> LocalAsset {
        let source = SourceFile::new("shoe.jpg", vec![1u8, 2, 3]);
        let preview = pool.allocate(&source);
        LocalAsset { source, preview }
    }

    #[test]
    fn test_remote_id_only_when_uploaded() {
        let pool = PreviewPool::default();
        for status in AssetStatus::iter() {
            let state = match status {
                AssetStatus::Pending => AssetState::Pending(local(&pool)),
                AssetStatus::Uploading => AssetState::Uploading(local(&pool)),
                AssetStatus::Uploaded => AssetState::Uploaded(RemoteAsset::new("r1", "https://x/r1")),
                AssetStatus::Failed => AssetState::Failed {
                    local: local(&pool),
                    cause: "boom".to_string(),
                },
            };
            let record = AssetRecord {
                local_id: LocalId::from(1),
                state,
                delete_in_flight: false,
            };
            assert_eq!(record.status(), status);
            assert_eq!(record.remote_id().is_some(), status == AssetStatus::Uploaded);
            assert_eq!(record.source().is_some(), status != AssetStatus::Uploaded);
        }
    }

    #[test]
    fn test_preview_location_switches_to_remote() {
        let pool = PreviewPool::default();
        let pending = AssetRecord {
            local_id: LocalId::from(3),
            state: AssetState::Pending(local(&pool)),
            delete_in_flight: false,
        };
        assert!(pending.preview_location().starts_with("blob:vitrine/"));

        let uploaded = AssetRecord {
            state: AssetState::Uploaded(RemoteAsset::new("r3", "https://cdn/r3.jpg")),
            ..pending
        };
        assert_eq!(uploaded.preview_location(), "https://cdn/r3.jpg");
        assert!(uploaded.file_name().is_none());
    }

    #[test]
    fn test_view_marks_primary() {
        let record = AssetRecord {
            local_id: LocalId::from(9),
            state: AssetState::Uploaded(RemoteAsset::new("r9", "https://cdn/r9.jpg")),
            delete_in_flight: false,
        };
        assert!(AssetView::from_record(&record, 0).is_primary);
        let second = AssetView::from_record(&record, 1);
        assert!(!second.is_primary);
        assert_eq!(second.order, 1);
    }

    #[test]
    fn test_status_string_forms() {
        assert_eq!(AssetStatus::Uploading.to_string(), "uploading");
        assert_eq!(AssetStatus::from_str("uploaded").unwrap(), AssetStatus::Uploaded);
        assert_eq!(
            serde_json::to_string(&AssetStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
