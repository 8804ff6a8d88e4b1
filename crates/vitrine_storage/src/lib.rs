//! Asset service adapters for Vitrine.
//!
//! The draft coordinator talks to the remote asset store only through the
//! [`AssetService`] trait: one upload per file, one delete per remote id, and
//! no ordering guarantees between calls.
//!
//! # Backends
//!
//! - [`HttpAssetService`]: multipart upload / DELETE against a remote asset API
//! - [`FileSystemAssetService`]: hashed on-disk layout for local development
//!
//! # Example
//!
//! ```rust
//! use vitrine_core::SourceFile;
//! use vitrine_storage::{AssetService, FileSystemAssetService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemAssetService::new("/tmp/vitrine-assets")?;
//! let file = SourceFile::new("front.png", vec![0x89, 0x50, 0x4E, 0x47]);
//!
//! let asset = store.upload(&file).await?;
//! store.delete(&asset.remote_id).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod credential;
mod filesystem;
mod http;
mod service;

pub use credential::AssetCredential;
pub use filesystem::FileSystemAssetService;
pub use http::{HttpAssetService, HttpAssetServiceConfig, UploadResponse};
pub use service::AssetService;
pub use vitrine_error::{AssetServiceError, AssetServiceErrorKind};
