//! `data:` URL rendering for generated images.

use crate::{Error, Result};
use base64::Engine as _;
use std::fmt;

/// Media type assumed when the provider omits one.
pub const FALLBACK_MIME_TYPE: &str = "image/png";

/// A base64 image payload paired with its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime_type: String,
    data: String,
}

impl DataUrl {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Builds from an inline payload, defaulting a missing or empty media type
    /// to [`FALLBACK_MIME_TYPE`].
    pub fn from_inline(mime_type: Option<&str>, data: impl Into<String>) -> Self {
        let mime_type = mime_type
            .filter(|m| !m.is_empty())
            .unwrap_or(FALLBACK_MIME_TYPE);
        Self::new(mime_type, data)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| Error::AiProvider(format!("Failed to decode Gemini base64 image: {}", e)))
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}
