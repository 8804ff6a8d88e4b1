//! Aggregated, user-visible asset failures.

use crate::LocalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which operation produced a failure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// The asset service refused or failed an upload
    Upload,
    /// The asset service failed to delete an uploaded asset
    Delete,
    /// The file was refused locally before any upload was issued
    Rejected,
}

/// One entry of a draft's aggregate error list.
///
/// # Examples
///
/// ```
/// use vitrine_core::{AssetFailure, FailureKind, LocalId};
///
/// let failure = AssetFailure::new(
///     FailureKind::Upload,
///     Some(LocalId::from(1)),
///     Some("front.png".to_string()),
///     "Asset service returned 500: ",
/// );
/// assert_eq!(
///     failure.message(),
///     "Failed to upload front.png: Asset service returned 500: "
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct AssetFailure {
    /// Operation that failed
    kind: FailureKind,
    /// Asset the failure belongs to, if it was ever registered
    local_id: Option<LocalId>,
    /// File name of the asset, if known
    file_name: Option<String>,
    /// Underlying cause
    cause: String,
    /// When the failure was recorded
    occurred_at: DateTime<Utc>,
}

impl AssetFailure {
    /// Record a failure at the current time.
    pub fn new(
        kind: FailureKind,
        local_id: Option<LocalId>,
        file_name: Option<String>,
        cause: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            local_id,
            file_name,
            cause: cause.into(),
            occurred_at: Utc::now(),
        }
    }

    /// Message shown to the vendor.
    pub fn message(&self) -> String {
        let verb = match self.kind {
            FailureKind::Upload => "upload",
            FailureKind::Delete => "delete",
            FailureKind::Rejected => "accept",
        };
        let subject = self
            .file_name
            .clone()
            .or_else(|| self.local_id.map(|id| id.to_string()))
            .unwrap_or_else(|| "image".to_string());
        format!("Failed to {} {}: {}", verb, subject, self.cause)
    }
}

impl std::fmt::Display for AssetFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_falls_back_to_local_id() {
        let failure = AssetFailure::new(
            FailureKind::Delete,
            Some(LocalId::from(4)),
            None,
            "timeout",
        );
        assert_eq!(failure.message(), "Failed to delete asset-4: timeout");
    }

    #[test]
    fn test_rejected_message() {
        let failure = AssetFailure::new(
            FailureKind::Rejected,
            None,
            Some("huge.png".to_string()),
            "file exceeds 10 bytes",
        );
        assert_eq!(
            failure.to_string(),
            "Failed to accept huge.png: file exceeds 10 bytes"
        );
        assert_eq!(*failure.kind(), FailureKind::Rejected);
    }
}
