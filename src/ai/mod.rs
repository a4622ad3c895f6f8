//! AI service integration for image generation
//!
//! Provides the [`ImageGenerationService`] seam, the Gemini implementation,
//! and the [`generate_image`] entry point that normalizes every failure.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiImageClient;
pub use mock::MockImageGenerationClient;

use crate::config::Config;
use crate::data_url::DataUrl;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<DataUrl>;
}

/// Generate an image for `prompt` and return it as a `data:` URL.
///
/// A fresh client is built from `config` for every call. A missing credential
/// fails before any request is sent.
pub async fn generate_image(config: &Config, prompt: &str) -> Result<String> {
    let client = GeminiImageClient::from_config(config).map_err(|e| {
        tracing::error!("Error generating image from Gemini API: {}", e);
        e
    })?;

    generate_with(&client, prompt).await
}

/// Run one generation through `service`, folding transport failures into
/// [`crate::Error::Generation`].
pub async fn generate_with<S>(service: &S, prompt: &str) -> Result<String>
where
    S: ImageGenerationService + ?Sized,
{
    service
        .generate_image(prompt)
        .await
        .map(|image| image.to_string())
        .map_err(|e| {
            let e = e.into_generation();
            tracing::error!("Error generating image from Gemini API: {}", e);
            e
        })
}
