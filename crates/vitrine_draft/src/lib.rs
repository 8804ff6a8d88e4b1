//! Product draft sessions for Vitrine.
//!
//! This crate coordinates the images attached to a product draft:
//! - [`AssetRegistry`]: ordered asset records and their lifecycle transitions
//! - [`DraftSession`]: concurrent uploads and deletes against an
//!   [`AssetService`](vitrine_storage::AssetService)
//! - [`gate`]: whether the draft may be submitted, and why not
//! - [`VitrineConfig`]: layered TOML configuration

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
pub mod gate;
mod outcome;
mod registry;
mod session;

pub use config::{DraftConfig, ServiceConfig, VitrineConfig};
pub use outcome::{BatchReport, DraftSnapshot, RemovalOutcome, RemovalRejection, UploadOutcome};
pub use registry::AssetRegistry;
pub use session::{DraftSession, UploadBatch};
