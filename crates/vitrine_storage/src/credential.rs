//! Credentials for the asset service.

/// Bearer token presented to the asset service.
///
/// The token is handed to the service at construction time; it is never read
/// from global state. `Debug` output is redacted.
///
/// # Examples
///
/// ```
/// use vitrine_storage::AssetCredential;
///
/// let credential = AssetCredential::bearer("s3cr3t");
/// assert_eq!(credential.authorization_header(), "Bearer s3cr3t");
/// assert!(!format!("{:?}", credential).contains("s3cr3t"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AssetCredential {
    token: String,
}

impl AssetCredential {
    /// Create a bearer credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Value of the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for AssetCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCredential")
            .field("token", &"<redacted>")
            .finish()
    }
}
