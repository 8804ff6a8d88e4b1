//! Test utilities for draft session tests.
//!
//! This module provides a scripted asset service and small helpers.

pub mod mock_asset_service;

#[allow(unused_imports)]
pub use mock_asset_service::MockAssetService;

use vitrine_core::{ProductDraft, SourceFile};

/// A small PNG-named payload.
#[allow(dead_code)]
pub fn png(name: &str) -> SourceFile {
    SourceFile::new(name, vec![0x89u8, 0x50, 0x4E, 0x47, 0x0D, 0x0A])
}

/// A product draft that passes field validation.
#[allow(dead_code)]
pub fn valid_product() -> ProductDraft {
    ProductDraft::builder()
        .name("Ceramic vase")
        .description("Hand-thrown stoneware vase")
        .price_cents(3200u64)
        .build()
        .expect("Failed to build test product")
}
