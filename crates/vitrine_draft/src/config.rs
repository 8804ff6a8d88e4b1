//! Configuration for draft sessions and the asset service.
//!
//! Configuration is layered TOML:
//! - Bundled defaults (include_str! from vitrine.toml)
//! - User overrides (~/.config/vitrine/vitrine.toml, then ./vitrine.toml)
//! - Later sources override earlier ones key by key

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use vitrine_core::SourceFile;
use vitrine_error::{ConfigError, VitrineError, VitrineResult};
use vitrine_storage::{AssetCredential, HttpAssetServiceConfig};

/// Per-draft upload policy.
///
/// # Example
///
/// ```toml
/// [draft]
/// auto_upload = true
/// max_concurrent_uploads = 4
/// max_file_bytes = 10_485_760
/// allowed_mime_types = ["image/png", "image/jpeg"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, derive_getters::Getters)]
pub struct DraftConfig {
    /// Dispatch uploads as soon as files are added
    #[serde(default = "default_auto_upload")]
    auto_upload: bool,

    /// Cap on simultaneous uploads; `None` means unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_concurrent_uploads: Option<usize>,

    /// Largest accepted file, in bytes
    #[serde(default = "default_max_file_bytes")]
    max_file_bytes: u64,

    /// Accepted MIME types; empty accepts any `image/*` type
    #[serde(default)]
    allowed_mime_types: Vec<String>,
}

fn default_auto_upload() -> bool {
    true
}

fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            auto_upload: default_auto_upload(),
            max_concurrent_uploads: None,
            max_file_bytes: default_max_file_bytes(),
            allowed_mime_types: Vec::new(),
        }
    }
}

impl DraftConfig {
    /// Set whether uploads start as soon as files are added.
    pub fn with_auto_upload(mut self, enabled: bool) -> Self {
        self.auto_upload = enabled;
        self
    }

    /// Cap concurrent uploads.
    pub fn with_max_concurrent_uploads(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_uploads = limit;
        self
    }

    /// Set the file size limit.
    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    /// Restrict accepted MIME types.
    pub fn with_allowed_mime_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_mime_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Validates limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the concurrency cap is zero or the size limit is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_uploads == Some(0) {
            return Err(ConfigError::new(
                "max_concurrent_uploads must be at least 1 when set",
            ));
        }
        if self.max_file_bytes == 0 {
            return Err(ConfigError::new("max_file_bytes must be greater than zero"));
        }
        Ok(())
    }

    /// Checks a file against the policy, returning the reason it is refused.
    pub fn check_file(&self, file: &SourceFile) -> Result<(), String> {
        if file.is_empty() {
            return Err("file is empty".to_string());
        }
        if file.len() as u64 > self.max_file_bytes {
            return Err(format!(
                "file is {} bytes, limit is {} bytes",
                file.len(),
                self.max_file_bytes
            ));
        }
        let mime = file.mime_type().as_str();
        let allowed = if self.allowed_mime_types.is_empty() {
            mime.starts_with("image/")
        } else {
            self.allowed_mime_types.iter().any(|allowed| allowed == mime)
        };
        if !allowed {
            return Err(format!("unsupported file type {}", mime));
        }
        Ok(())
    }
}

/// Asset service connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, derive_getters::Getters)]
pub struct ServiceConfig {
    /// Base URL of the asset API
    base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl ServiceConfig {
    /// Create service settings for a base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Point at a different asset API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// HTTP client settings, with the credential passed in explicitly.
    pub fn http_config(&self, credential: Option<AssetCredential>) -> HttpAssetServiceConfig {
        let config = HttpAssetServiceConfig::new(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs));
        match credential {
            Some(credential) => config.with_credential(credential),
            None => config,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

/// Top-level Vitrine configuration.
///
/// # Example
///
/// ```no_run
/// use vitrine_draft::VitrineConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = VitrineConfig::load()?;
/// println!("Uploads capped at {:?}", config.draft.max_concurrent_uploads());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct VitrineConfig {
    /// Draft upload policy
    #[serde(default)]
    pub draft: DraftConfig,

    /// Asset service connection
    #[serde(default)]
    pub service: ServiceConfig,
}

impl VitrineConfig {
    /// Bundled default configuration.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../../../vitrine.toml");

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> VitrineResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                VitrineError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                VitrineError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.draft.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or validated.
    pub fn from_toml_str(overrides: &str) -> VitrineResult<Self> {
        Self::build(
            Config::builder()
                .add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from_str(overrides, FileFormat::Toml)),
        )
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (vitrine.toml shipped with the library)
    /// 2. User config in home directory (~/.config/vitrine/vitrine.toml)
    /// 3. User config in current directory (./vitrine.toml)
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if any present source is malformed or the result is invalid.
    #[instrument]
    pub fn load() -> VitrineResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder = Config::builder()
            .add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/vitrine/vitrine.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("vitrine").required(false));

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> VitrineResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                VitrineError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                VitrineError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.draft.validate()?;
        Ok(config)
    }
}
