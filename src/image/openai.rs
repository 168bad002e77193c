//! OpenAI Images Client
//!
//! Image generation client for the OpenAI Images API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{GeneratedImage, ImageError, ImageGenerator};

/// Default OpenAI image model
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

const IMAGES_ENDPOINT: &str = "https://api.openai.com/v1/images/generations";
const IMAGE_SIZE: &str = "1024x1024";
const IMAGE_QUALITY: &str = "standard";

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    quality: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
    revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

/// OpenAI Images API client
#[derive(Clone)]
pub struct OpenAiImageClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    endpoint: String,
}

impl OpenAiImageClient {
    /// Create a new client with the given API key and the default model
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_IMAGE_MODEL)
    }

    /// Create with a specific model
    pub fn with_model(api_key: String, model: &str) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model: model.to_string(),
            endpoint: IMAGES_ENDPOINT.to_string(),
        }
    }

    /// Use a preconfigured HTTP client (timeouts, proxies)
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Point at a different Images endpoint, e.g. a compatible gateway
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ImageRequest<'a> {
        ImageRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: IMAGE_SIZE,
            quality: IMAGE_QUALITY,
        }
    }
}

/// Extract the first image from an Images API response body
pub fn parse_image_response(body: &str) -> Result<GeneratedImage, ImageError> {
    let response: ImageResponse =
        serde_json::from_str(body).map_err(|e| ImageError::MalformedResponse(e.to_string()))?;

    let first = response.data.into_iter().next().ok_or(ImageError::NoImageUrl)?;
    match first.url {
        Some(url) if !url.is_empty() => Ok(GeneratedImage {
            url,
            revised_prompt: first.revised_prompt,
        }),
        _ => Err(ImageError::NoImageUrl),
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Requesting image");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::Api { status, body });
        }

        let body = response.text().await?;
        let image = parse_image_response(&body)?;

        if let Some(revised) = &image.revised_prompt {
            tracing::debug!(revised_prompt = %revised, "Image backend revised the prompt");
        }
        Ok(image)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
