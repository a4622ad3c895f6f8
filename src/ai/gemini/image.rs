use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, Part};
use crate::ai::ImageGenerationService;
use crate::config::Config;
use crate::data_url::DataUrl;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const IMAGE_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct ImageRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: ImageGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationConfig {
    response_modalities: Vec<String>,
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

impl ImageRequest {
    fn square(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(prompt)],
            }],
            generation_config: ImageGenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                image_config: ImageConfig {
                    aspect_ratio: "1:1".to_string(),
                },
            },
        }
    }
}

pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, IMAGE_TIMEOUT, client),
        }
    }

    /// Build a client from `config`, failing before any I/O if the credential is unset.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Ok(Self::new(api_key.to_string(), config.model.clone())
            .with_base_url(config.base_url.clone()))
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }
}

/// Returns the first inline image across all candidates, in response order.
pub fn extract_image(response: &GenerateContentResponse) -> Result<DataUrl> {
    if response.candidates.is_empty() {
        return Err(Error::NoCandidates);
    }

    let (inline, data) = response
        .candidates
        .iter()
        .flat_map(|c| c.parts())
        .find_map(|p| {
            let inline = p.image_data()?;
            Some((inline, inline.data.as_deref()?))
        })
        .ok_or(Error::NoImageData)?;

    Ok(DataUrl::from_inline(inline.mime_type.as_deref(), data))
}

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<DataUrl> {
        let request = ImageRequest::square(prompt);

        let gemini_response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let image = extract_image(&gemini_response)?;

        tracing::debug!(
            "Gemini returned image with mime_type: {}",
            image.mime_type()
        );

        image.decode_bytes()?;
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
    const GENERATE_CONTENT_PATH: &str = "/v1beta/models/gemini-2.5-flash-image:generateContent";

    fn make_client(server: &MockServer) -> GeminiImageClient {
        GeminiImageClient::new("key".to_string(), DEFAULT_MODEL.to_string())
            .with_base_url(server.uri())
    }

    fn response(body: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_extract_uses_declared_mime_type() {
        let image = extract_image(&response(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "inlineData": { "mimeType": "image/jpeg", "data": "/9j/4A==" } }]
                }
            }]
        })))
        .unwrap();

        assert_eq!(image.to_string(), "data:image/jpeg;base64,/9j/4A==");
    }

    #[test]
    fn test_extract_defaults_mime_type_to_png() {
        let image = extract_image(&response(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "inlineData": { "data": "iVBORw==" } }] }
            }]
        })))
        .unwrap();

        assert_eq!(image.to_string(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_extract_scans_past_first_candidate() {
        let image = extract_image(&response(serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "thinking" }, { "text": "still thinking" }] } },
                { "content": { "parts": [
                    { "text": "here you go" },
                    { "inlineData": { "mimeType": "image/webp", "data": "UklGRg==" } },
                    { "inlineData": { "mimeType": "image/png", "data": "iVBORw==" } }
                ] } }
            ]
        })))
        .unwrap();

        assert_eq!(image.to_string(), "data:image/webp;base64,UklGRg==");
    }

    #[test]
    fn test_extract_skips_empty_inline_data() {
        let image = extract_image(&response(serde_json::json!({
            "candidates": [{
                "content": { "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": "" } },
                    { "inlineData": { "mimeType": "image/jpeg", "data": "/9j/4A==" } }
                ] }
            }]
        })))
        .unwrap();

        assert_eq!(image.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_extract_zero_candidates() {
        let err = extract_image(&response(serde_json::json!({ "candidates": [] }))).unwrap_err();
        assert!(matches!(err, Error::NoCandidates));
    }

    #[test]
    fn test_extract_no_image_parts() {
        let err = extract_image(&response(serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "no image here" }] } },
                { "finishReason": "SAFETY" }
            ]
        })))
        .unwrap_err();
        assert!(matches!(err, Error::NoImageData));
    }

    #[tokio::test]
    async fn test_generate_image_parses_inline_data() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_CONTENT_PATH))
            .and(header("x-goog-api-key", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{
                            "inlineData": { "mimeType": "image/png", "data": "iVBORw==" }
                        }]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let image = make_client(&server).generate_image("a dream").await.unwrap();
        assert_eq!(image, DataUrl::new("image/png", "iVBORw=="));
    }

    #[tokio::test]
    async fn test_request_uses_square_aspect_ratio() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_CONTENT_PATH))
            .and(body_string_contains("\"aspectRatio\":\"1:1\""))
            .and(body_string_contains("\"responseModalities\":[\"IMAGE\"]"))
            .and(body_string_contains("\"text\":\"a lighthouse at dusk\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [{ "inlineData": { "mimeType": "image/png", "data": "AA==" } }] }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        make_client(&server)
            .generate_image("a lighthouse at dusk")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_error_returns_ai_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_CONTENT_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate_image("a dream")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_generate_image_rejects_invalid_base64() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_CONTENT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{
                            "inlineData": { "mimeType": "image/png", "data": "!!!invalid-base64!!!" }
                        }]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate_image("a dream")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[test]
    fn test_from_config_requires_credential() {
        let config = Config {
            api_key: None,
            ..Config::new("unused")
        };
        assert!(matches!(
            GeminiImageClient::from_config(&config),
            Err(Error::MissingCredential)
        ));
    }

    #[test]
    fn test_from_config_uses_configured_model() {
        let config = Config::new("key").with_model("models/gemini-3-pro-image-preview");
        let client = GeminiImageClient::from_config(&config).unwrap();
        assert_eq!(client.model(), "gemini-3-pro-image-preview");
    }
}
