//! Asset identifiers.

use serde::{Deserialize, Serialize};

/// Registry-local asset identifier.
///
/// Assigned from a monotonically increasing counter owned by the registry,
/// so an id is never reused within a draft even after its asset is removed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("asset-{}", _0)]
pub struct LocalId(u64);

impl LocalId {
    /// Raw numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Identifier assigned by the asset service on a successful upload.
///
/// # Examples
///
/// ```
/// use vitrine_core::RemoteId;
///
/// let id = RemoteId::from("img_123");
/// assert_eq!(id.as_str(), "img_123");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct RemoteId(String);

impl RemoteId {
    /// Create a remote id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RemoteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RemoteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
