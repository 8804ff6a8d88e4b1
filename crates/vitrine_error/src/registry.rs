//! Asset registry error types.
//!
//! These are contract violations: a caller asked the registry for a transition
//! the asset lifecycle does not allow. They are returned to the caller and never
//! converted into aggregate user-facing messages.

/// Kinds of registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RegistryErrorKind {
    /// No asset with this local id exists in the registry
    #[display("Unknown asset: {}", _0)]
    UnknownAsset(u64),
    /// The requested lifecycle transition is not allowed from the current status
    #[display("Invalid transition for asset {}: {} -> {}", id, from, to)]
    InvalidTransition {
        /// Local id of the asset
        id: u64,
        /// Status the asset is currently in
        from: String,
        /// Status that was requested
        to: String,
    },
    /// Another upload or delete is already in flight for this asset
    #[display("Operation already in flight for asset {}", _0)]
    OperationInFlight(u64),
    /// Reorder target is outside the registry
    #[display("Index {} out of range for {} assets", index, len)]
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// Number of assets in the registry
        len: usize,
    },
}

/// Registry error with location tracking.
///
/// # Examples
///
/// ```
/// use vitrine_error::{RegistryError, RegistryErrorKind};
///
/// let err = RegistryError::new(RegistryErrorKind::UnknownAsset(42));
/// assert!(format!("{}", err).contains("Unknown asset: 42"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Registry Error: {} at line {} in {}", kind, line, file)]
pub struct RegistryError {
    /// The kind of error that occurred
    pub kind: RegistryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RegistryError {
    /// Create a new registry error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RegistryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Convenience constructor for an invalid lifecycle transition.
    #[track_caller]
    pub fn invalid_transition(id: u64, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(RegistryErrorKind::InvalidTransition {
            id,
            from: from.into(),
            to: to.into(),
        })
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RegistryErrorKind {
        &self.kind
    }
}
