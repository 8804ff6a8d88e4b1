//! Submission gate.
//!
//! Pure functions over the registry. The result is recomputed from the current
//! records every time, so it can never go stale.

use crate::AssetRegistry;
use vitrine_core::{AssetStatus, BlockReason, ProductDraft, SubmissionState};

/// Evaluate the gate from the asset registry alone.
///
/// Uploads in flight take priority over files that were never uploaded.
pub fn evaluate(registry: &AssetRegistry) -> SubmissionState {
    if registry.count(AssetStatus::Uploading) > 0 {
        return SubmissionState::blocked(BlockReason::UploadsInProgress);
    }
    if registry.count(AssetStatus::Pending) > 0 {
        return SubmissionState::blocked(BlockReason::PendingUploads);
    }
    SubmissionState::ready()
}

/// Evaluate the gate including remote deletes in flight and product fields.
pub fn evaluate_with_fields(registry: &AssetRegistry, product: &ProductDraft) -> SubmissionState {
    let assets = evaluate(registry);
    if !assets.can_submit {
        return assets;
    }
    if registry.any_delete_in_flight() {
        return SubmissionState::blocked(BlockReason::RemovalInProgress);
    }
    match product.validate() {
        Ok(()) => SubmissionState::ready(),
        Err(problem) => SubmissionState::blocked(BlockReason::Field(problem)),
    }
}
