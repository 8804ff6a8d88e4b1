//! Asset service error types.

/// Kinds of failures reported by a remote or local asset store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AssetServiceErrorKind {
    /// Transport-level failure (connection refused, timeout, ...)
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// The service answered with a non-success status
    #[display("Asset service returned {}: {}", status, body)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },
    /// Response body could not be decoded
    #[display("Failed to deserialize response: {}", _0)]
    Deserialization(String),
    /// Credential missing or refused
    #[display("Unauthorized: {}", _0)]
    Unauthorized(String),
    /// Asset does not exist in the store
    #[display("Asset not found: {}", _0)]
    NotFound(String),
    /// Local I/O failure
    #[display("I/O error: {}", _0)]
    Io(String),
    /// Payload refused before reaching the store
    #[display("Payload rejected: {}", _0)]
    Rejected(String),
}

/// Asset service error with location tracking.
///
/// # Examples
///
/// ```
/// use vitrine_error::{AssetServiceError, AssetServiceErrorKind};
///
/// let err = AssetServiceError::new(AssetServiceErrorKind::NotFound("abc".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Asset Service Error: {} at line {} in {}", kind, line, file)]
pub struct AssetServiceError {
    /// The kind of error that occurred
    pub kind: AssetServiceErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AssetServiceError {
    /// Create a new asset service error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AssetServiceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AssetServiceErrorKind {
        &self.kind
    }

    /// Human-readable cause without source location, suitable for end users.
    pub fn cause(&self) -> String {
        self.kind.to_string()
    }
}
