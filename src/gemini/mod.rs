//! Gemini text generation.

pub mod client;
pub mod response;

use async_trait::async_trait;

use crate::error::GeminiError;

pub use client::GeminiClient;
pub use response::{parse_generate_response, strip_enclosing_fence};

/// Remote text generation used by the reformat pipeline.
///
/// This abstraction allows mocking the HTTP API in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Submit a prompt and return the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError>;
}
