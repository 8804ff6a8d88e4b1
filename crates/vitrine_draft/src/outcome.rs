//! Values handed back to the presentation layer by a draft session.

use serde::Serialize;
use vitrine_core::{
    AssetFailure, AssetStatus, AssetView, LocalId, RemoteAsset, RemoteId, SubmissionState,
};

/// Everything a view needs to render a draft, published after every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DraftSnapshot {
    /// Assets in display order
    pub assets: Vec<AssetView>,
    /// Submission gate evaluated over the assets
    pub submission: SubmissionState,
    /// Aggregate error messages, oldest first
    pub errors: Vec<String>,
}

impl DraftSnapshot {
    /// Whether any upload or delete is still running.
    pub fn in_flight(&self) -> bool {
        self.assets
            .iter()
            .any(|asset| asset.status == AssetStatus::Uploading || asset.deleting)
    }

    /// Number of assets with the given status.
    pub fn count(&self, status: AssetStatus) -> usize {
        self.assets
            .iter()
            .filter(|asset| asset.status == status)
            .count()
    }
}

/// How one dispatched upload ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Upload confirmed and recorded
    Uploaded {
        /// Asset that was uploaded
        local_id: LocalId,
        /// Identity assigned by the asset service
        remote: RemoteAsset,
    },
    /// Upload failed; the asset was removed and the failure aggregated
    Failed(AssetFailure),
    /// Upload finished after the asset left the draft; the remote copy was discarded
    Discarded {
        /// Asset that was uploaded
        local_id: LocalId,
        /// Identity assigned by the asset service
        remote: RemoteAsset,
    },
}

/// Summary of a finished upload batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct BatchReport {
    /// Assets uploaded successfully
    uploaded: Vec<LocalId>,
    /// Failures, in dispatch order
    failed: Vec<AssetFailure>,
    /// Uploads that completed after their asset left the draft
    discarded: Vec<LocalId>,
}

impl BatchReport {
    pub(crate) fn record(&mut self, outcome: UploadOutcome) {
        match outcome {
            UploadOutcome::Uploaded { local_id, .. } => self.uploaded.push(local_id),
            UploadOutcome::Failed(failure) => self.failed.push(failure),
            UploadOutcome::Discarded { local_id, .. } => self.discarded.push(local_id),
        }
    }

    /// Whether every upload in the batch succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.discarded.is_empty()
    }
}

/// Why a removal request was refused without touching the asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RemovalRejection {
    /// The asset's upload is still in flight
    #[display("upload in progress")]
    UploadInFlight,
    /// A delete for the asset is already in flight
    #[display("removal already in progress")]
    DeleteInFlight,
}

/// Result of [`DraftSession::remove_asset`](crate::DraftSession::remove_asset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// Local-only asset removed without any network call
    Removed,
    /// Remote asset deleted, then removed
    RemovedRemote(RemoteId),
    /// Request refused; the asset is unchanged
    Rejected(RemovalRejection),
    /// Remote delete failed; the asset stays in the draft
    Retained {
        /// Failure cause, also appended to the aggregate errors
        cause: String,
    },
}

impl RemovalOutcome {
    /// Whether the asset left the draft.
    pub fn is_removed(&self) -> bool {
        matches!(self, RemovalOutcome::Removed | RemovalOutcome::RemovedRemote(_))
    }
}
