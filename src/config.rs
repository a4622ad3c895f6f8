//! Configuration for the Gemini image client.

use crate::{Error, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Config {
    /// Build a config around an explicit credential with default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Load from the process environment, honouring a `.env` file if present.
    ///
    /// A missing `API_KEY` is not an error here; it is reported when a
    /// request is attempted.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup("API_KEY").filter(|key| !key.is_empty()),
            model: lookup("GEMINI_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the credential, or [`Error::MissingCredential`] when unset.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(Error::MissingCredential)
    }
}
