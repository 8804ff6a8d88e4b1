//! HTTP client for the remote asset API.
//!
//! - `POST {base_url}/assets` with a multipart `file` part, answering
//!   `{"id": "...", "url": "..."}`
//! - `DELETE {base_url}/assets/{id}`, answering any 2xx status

use crate::{AssetCredential, AssetService};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;
use vitrine_core::{RemoteAsset, RemoteId, SourceFile};
use vitrine_error::{AssetServiceError, AssetServiceErrorKind, ConfigError};

/// Connection settings for [`HttpAssetService`].
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct HttpAssetServiceConfig {
    /// Base URL of the asset API, without trailing slash
    base_url: String,
    /// Per-request timeout
    timeout: Duration,
    /// Credential presented on every call
    credential: Option<AssetCredential>,
}

impl HttpAssetServiceConfig {
    /// Create a configuration for the given base URL with a 30 second timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            credential: None,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the credential.
    pub fn with_credential(mut self, credential: AssetCredential) -> Self {
        self.credential = Some(credential);
        self
    }
}

/// Body returned by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Remote asset id
    #[serde(alias = "remote_id", alias = "asset_id")]
    pub id: String,
    /// Displayable location
    #[serde(alias = "location", alias = "remote_location")]
    pub url: String,
}

impl From<UploadResponse> for RemoteAsset {
    fn from(response: UploadResponse) -> Self {
        RemoteAsset::new(response.id, response.url)
    }
}

/// Asset service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAssetService {
    config: HttpAssetServiceConfig,
    client: reqwest::Client,
}

impl HttpAssetService {
    /// Create a new HTTP asset service client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be
    /// built.
    #[instrument(skip(config), fields(base_url = %config.base_url))]
    pub fn new(config: HttpAssetServiceConfig) -> Result<Self, ConfigError> {
        if config.base_url.is_empty() {
            return Err(ConfigError::new("asset service base_url is empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!("Creating asset service client");
        Ok(Self { config, client })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &HttpAssetServiceConfig {
        &self.config
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.credential {
            Some(credential) => request.header(
                reqwest::header::AUTHORIZATION,
                credential.authorization_header(),
            ),
            None => request,
        }
    }

    /// Map a non-success response to an error, reading the body for context.
    async fn failure(response: reqwest::Response, remote_id: Option<&RemoteId>) -> AssetServiceError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, body = %body, "Asset service returned error");

        let kind = match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                AssetServiceErrorKind::Unauthorized(format!("{}", status))
            }
            reqwest::StatusCode::NOT_FOUND if remote_id.is_some() => {
                AssetServiceErrorKind::NotFound(
                    remote_id.map(ToString::to_string).unwrap_or_default(),
                )
            }
            _ => AssetServiceErrorKind::Api {
                status: status.as_u16(),
                body,
            },
        };
        AssetServiceError::new(kind)
    }
}

#[async_trait::async_trait]
impl AssetService for HttpAssetService {
    #[instrument(skip(self, file), fields(file_name = %file.file_name(), size = file.len()))]
    async fn upload(&self, file: &SourceFile) -> Result<RemoteAsset, AssetServiceError> {
        let url = format!("{}/assets", self.config.base_url);
        tracing::debug!("Uploading asset to {}", url);

        let part = reqwest::multipart::Part::bytes(file.bytes().to_vec())
            .file_name(file.file_name().clone())
            .mime_str(file.mime_type())
            .map_err(|e| {
                AssetServiceError::new(AssetServiceErrorKind::Rejected(format!(
                    "invalid MIME type {}: {}",
                    file.mime_type(),
                    e
                )))
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .authorize(self.client.post(&url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Upload request failed: {}", e);
                AssetServiceError::new(AssetServiceErrorKind::Http(format!(
                    "Upload request failed: {}",
                    e
                )))
            })?;

        if !response.status().is_success() {
            return Err(Self::failure(response, None).await);
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse upload response: {}", e);
            AssetServiceError::new(AssetServiceErrorKind::Deserialization(format!(
                "Failed to parse upload response: {}",
                e
            )))
        })?;

        tracing::debug!(remote_id = %body.id, "Upload accepted");
        Ok(body.into())
    }

    #[instrument(skip(self), fields(remote_id = %remote_id))]
    async fn delete(&self, remote_id: &RemoteId) -> Result<(), AssetServiceError> {
        let url = format!("{}/assets/{}", self.config.base_url, remote_id);
        tracing::debug!("Deleting asset at {}", url);

        let response = self
            .authorize(self.client.delete(&url))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Delete request failed: {}", e);
                AssetServiceError::new(AssetServiceErrorKind::Http(format!(
                    "Delete request failed: {}",
                    e
                )))
            })?;

        if !response.status().is_success() {
            return Err(Self::failure(response, Some(remote_id)).await);
        }

        tracing::debug!("Delete accepted");
        Ok(())
    }

    fn backend(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = HttpAssetServiceConfig::new("https://assets.example.com/")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url(), "https://assets.example.com");
        assert_eq!(*config.timeout(), Duration::from_secs(5));
        assert!(config.credential().is_none());
    }

    #[test]
    fn test_rejects_empty_base_url() {
        assert!(HttpAssetService::new(HttpAssetServiceConfig::new("")).is_err());
    }

    #[test]
    fn test_upload_response_aliases() {
        let body: UploadResponse =
            serde_json::from_str(r#"{"remote_id": "a1", "location": "https://cdn/a1"}"#).unwrap();
        let asset: RemoteAsset = body.into();
        assert_eq!(asset.remote_id.as_str(), "a1");
        assert_eq!(asset.remote_location, "https://cdn/a1");
    }
}
