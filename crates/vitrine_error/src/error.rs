//! Top-level error wrapper types.

use crate::{AssetServiceError, ConfigError, DraftError, JsonError, RegistryError};

/// Every error condition a Vitrine crate can report.
///
/// # Examples
///
/// ```
/// use vitrine_error::{ConfigError, VitrineError, VitrineErrorKind};
///
/// let err: VitrineError = ConfigError::new("max_file_bytes must be greater than zero").into();
/// assert!(matches!(err.kind(), VitrineErrorKind::Config(_)));
/// assert!(format!("{}", err).contains("max_file_bytes"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VitrineErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Asset registry contract violation
    #[from(RegistryError)]
    Registry(RegistryError),
    /// Asset service failure
    #[from(AssetServiceError)]
    AssetService(AssetServiceError),
    /// Draft session error
    #[from(DraftError)]
    Draft(DraftError),
}

/// Vitrine error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vitrine Error: {}", _0)]
pub struct VitrineError(Box<VitrineErrorKind>);

impl VitrineError {
    /// Create a new error from a kind.
    pub fn new(kind: VitrineErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VitrineErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to VitrineErrorKind
impl<T> From<T> for VitrineError
where
    T: Into<VitrineErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Vitrine operations.
pub type VitrineResult<T> = std::result::Result<T, VitrineError>;
