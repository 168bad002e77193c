//! Image generation
//!
//! Defines the interface the pipeline uses to turn a prompt into a hosted image,
//! plus the OpenAI Images implementation.

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::OpenAiImageClient;

/// Errors from the image backend
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse image response: {0}")]
    MalformedResponse(String),

    #[error("image response contained no image URL")]
    NoImageUrl,
}

/// A generated image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Hosted asset URL; may expire
    pub url: String,
    /// Prompt as rewritten by the backend, when it reports one
    pub revised_prompt: Option<String>,
}

/// Trait for image backends used by the pipeline
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate exactly one image for the prompt. A single attempt, no retry.
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ImageError>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;
}
