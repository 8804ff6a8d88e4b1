//! Vitrine - product media uploads for marketplace drafts
//!
//! Vitrine coordinates the images a vendor attaches to a product draft. Files
//! are uploaded to an asset service as soon as they are selected, uploads run
//! concurrently and fail independently, removals delete the remote copy before
//! the image leaves the draft, and a submission gate keeps the product from
//! being saved while any image is still on its way.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vitrine::{DraftConfig, DraftSession, FileSystemAssetService, ProductDraft, SourceFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileSystemAssetService::new("./assets")?;
//!     let session = DraftSession::new(Arc::new(store), DraftConfig::default())?;
//!
//!     let batch = session.add_files(vec![SourceFile::new("front.png", std::fs::read("front.png")?)])?;
//!     batch.finish().await?;
//!
//!     let product = ProductDraft::builder()
//!         .name("Canvas tote")
//!         .description("Heavy cotton tote bag")
//!         .price_cents(2500u64)
//!         .build()?;
//!     let payload = session.submit(product)?;
//!     println!("{}", serde_json::to_string_pretty(&payload)?);
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry bridge with a stdout span exporter
//!
//! # Architecture
//!
//! - `vitrine_error` - Error types
//! - `vitrine_core` - Asset records, previews, product draft and payload types
//! - `vitrine_storage` - `AssetService` trait with HTTP and filesystem backends
//! - `vitrine_draft` - Asset registry, upload coordinator, submission gate, configuration
//!
//! This crate (`vitrine`) re-exports everything for convenience.

pub use vitrine_core::*;
pub use vitrine_draft::*;
pub use vitrine_error::*;
pub use vitrine_storage::*;

// OpenTelemetry observability module
#[cfg(feature = "observability")]
pub mod observability;
