//! Error types for the Vitrine product media coordinator.
//!
//! This crate provides the foundation error types used throughout the Vitrine workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use vitrine_error::{RegistryError, RegistryErrorKind, VitrineResult};
//!
//! fn lookup(id: u64) -> VitrineResult<()> {
//!     Err(RegistryError::new(RegistryErrorKind::UnknownAsset(id)))?
//! }
//!
//! match lookup(7) {
//!     Ok(()) => println!("found"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset_service;
mod config;
mod draft;
mod error;
mod json;
mod registry;

pub use asset_service::{AssetServiceError, AssetServiceErrorKind};
pub use config::ConfigError;
pub use draft::{DraftError, DraftErrorKind};
pub use error::{VitrineError, VitrineErrorKind, VitrineResult};
pub use json::JsonError;
pub use registry::{RegistryError, RegistryErrorKind};
