//! Local file payloads selected by the vendor.

use std::sync::Arc;

/// A local image file selected for upload.
///
/// Cloning is cheap: the payload bytes are shared, so a clone can travel into
/// an upload task while the registry keeps its own handle.
///
/// # Examples
///
/// ```
/// use vitrine_core::SourceFile;
///
/// let file = SourceFile::new("front.png", vec![0x89, 0x50, 0x4E, 0x47]);
/// assert_eq!(file.mime_type(), "image/png");
/// assert_eq!(file.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct SourceFile {
    /// Original file name as selected by the user
    file_name: String,
    /// MIME type of the payload
    mime_type: String,
    /// Raw file contents
    #[getter(skip)]
    bytes: Arc<[u8]>,
}

impl SourceFile {
    /// Create a source file, guessing the MIME type from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let mime_type = Self::guess_mime_type(&file_name).to_string();
        Self::with_mime_type(file_name, mime_type, bytes)
    }

    /// Create a source file with an explicit MIME type.
    pub fn with_mime_type(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: Arc::from(bytes.into()),
        }
    }

    /// Payload bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    /// Map a file name to an image MIME type by extension.
    ///
    /// Unknown extensions fall back to `application/octet-stream`.
    pub fn guess_mime_type(file_name: &str) -> &'static str {
        let ext = std::path::Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            Some("avif") => "image/avif",
            _ => "application/octet-stream",
        }
    }
}
