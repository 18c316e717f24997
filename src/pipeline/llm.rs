//! Generation client: one prompt plus ordered evidence in, raw model text out.
//!
//! Handlers talk to the model through the [`Generator`] trait so the HTTP
//! layer can be exercised without network access. The production
//! implementation, [`LlmGenerator`], sends a single user message whose text
//! is the rendered prompt and whose attachments are the evidence images in
//! input order. There is no retry and no streaming; any provider error is
//! surfaced as [`NoteError::GenerationFailed`].

use crate::config::ServiceConfig;
use crate::error::NoteError;
use crate::model::ImagePayload;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Anything that can turn a prompt and its evidence into free-form text.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str, evidence: &[ImagePayload])
        -> Result<String, NoteError>;
}

/// [`Generator`] backed by an `edgequake_llm` provider.
pub struct LlmGenerator {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl LlmGenerator {
    /// Wrap an already-constructed provider.
    pub fn new(provider: Arc<dyn LLMProvider>, config: &ServiceConfig) -> Self {
        Self {
            provider,
            options: build_options(config),
        }
    }

    /// Create the provider named in `config` (API key read from the
    /// environment by the provider factory).
    pub fn from_config(config: &ServiceConfig) -> Result<Self, NoteError> {
        let provider =
            ProviderFactory::create_llm_provider(&config.provider_name, &config.model).map_err(
                |e| NoteError::ProviderNotConfigured {
                    provider: config.provider_name.clone(),
                    hint: format!("{e}"),
                },
            )?;
        Ok(Self::new(provider, config))
    }
}

/// Build `CompletionOptions` from the service config.
fn build_options(config: &ServiceConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

/// Build the single multimodal user message: prompt text, then every image
/// in order.
pub fn build_messages(prompt: &str, evidence: &[ImagePayload]) -> Vec<ChatMessage> {
    let images: Vec<ImageData> = evidence.iter().map(ImagePayload::to_image_data).collect();
    vec![ChatMessage::user_with_images(prompt, images)]
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate(
        &self,
        prompt: &str,
        evidence: &[ImagePayload],
    ) -> Result<String, NoteError> {
        let start = Instant::now();
        let messages = build_messages(prompt, evidence);

        match self.provider.chat(&messages, Some(&self.options)).await {
            Ok(response) => {
                debug!(
                    "Generation: {} images, {} input tokens, {} output tokens, {:?}",
                    evidence.len(),
                    response.prompt_tokens,
                    response.completion_tokens,
                    start.elapsed()
                );
                Ok(response.content)
            }
            Err(e) => {
                warn!("Generation failed after {:?}: {}", start.elapsed(), e);
                Err(NoteError::GenerationFailed {
                    message: e.to_string(),
                })
            }
        }
    }
}
