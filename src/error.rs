//! Error handling and custom error types
//!
//! Every failure surfaced by [`crate::generate_image`] is one of these
//! variants, so callers can branch on the category without matching strings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("API_KEY environment variable is not set.")]
    MissingCredential,

    #[error("Failed to generate image: No candidates found in the Gemini API response.")]
    NoCandidates,

    #[error("Failed to generate image: No image data found in the response.")]
    NoImageData,

    #[error("Failed to generate image: {0}")]
    Generation(String),

    #[error("An unknown error occurred during image generation.")]
    Unknown,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),
}

impl Error {
    /// Folds transport and provider failures into [`Error::Generation`].
    ///
    /// Variants that already describe the outcome pass through untouched. A
    /// failure with no message text becomes [`Error::Unknown`].
    pub fn into_generation(self) -> Self {
        let message = match self {
            Error::Http(e) => e.to_string(),
            Error::Serialization(e) => e.to_string(),
            Error::AiProvider(message) => message,
            other => return other,
        };

        if message.trim().is_empty() {
            Error::Unknown
        } else {
            Error::Generation(message)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
