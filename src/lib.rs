//! Gemini image generation client
//!
//! Sends a text prompt to Gemini's image model and returns the generated image
//! as a `data:` URL ready for embedding.

pub mod ai;
pub mod config;
pub mod data_url;
pub mod error;

pub use ai::generate_image;
pub use config::Config;
pub use data_url::DataUrl;
pub use error::{Error, Result};
