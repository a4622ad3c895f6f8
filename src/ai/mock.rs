use super::ImageGenerationService;
use crate::data_url::DataUrl;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum MockResponse {
    Image(DataUrl),
    Failure(String),
}

/// Scripted [`ImageGenerationService`] that cycles through configured responses.
pub struct MockImageGenerationClient {
    responses: Arc<Mutex<Vec<MockResponse>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_image_response(self, image: DataUrl) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockResponse::Image(image));
        self
    }

    /// Queue a provider failure carrying `message`.
    pub fn with_failure(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockResponse::Failure(message.to_string()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, prompt: &str) -> Result<DataUrl> {
        let count = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len()
        };

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // PNG signature
            return Ok(DataUrl::new("image/png", "iVBORw0KGgo="));
        }

        match &responses[(count - 1) % responses.len()] {
            MockResponse::Image(image) => Ok(image.clone()),
            MockResponse::Failure(message) => Err(Error::AiProvider(message.clone())),
        }
    }
}
