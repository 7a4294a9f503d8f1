pub mod gemini;

use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;

pub use gemini::GeminiClient;

/// Single-shot text generation: one prompt in, one text blob out.
///
/// The model id travels in `config.model`.
#[async_trait]
pub trait LLMClient {
    async fn generate(&self, config: &LLMConfig, prompt: &str) -> Result<String>;
}
