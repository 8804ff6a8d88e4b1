//! Core data types for the Vitrine product media coordinator.
//!
//! This crate provides the asset lifecycle types shared by the storage adapters
//! and the draft session: identifiers, local source files and their transient
//! previews, asset records, submission gate results and the product payload.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod failure;
mod ids;
mod preview;
mod product;
mod source;
mod submission;

pub use asset::{AssetRecord, AssetState, AssetStatus, AssetView, LocalAsset, RemoteAsset};
pub use failure::{AssetFailure, FailureKind};
pub use ids::{LocalId, RemoteId};
pub use preview::{LocalPreview, PreviewPool};
pub use product::{FieldProblem, ProductDraft, ProductDraftBuilder, SubmissionPayload};
pub use source::SourceFile;
pub use submission::{BlockReason, SubmissionState};
