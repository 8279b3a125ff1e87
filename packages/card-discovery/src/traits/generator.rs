//! Text generator trait for the language model behind generation.
//!
//! Every pipeline stage is a single prompt in, raw text out. The pipeline
//! owns prompting and JSON parsing, so implementations stay thin wrappers
//! around a provider's completion endpoint.

use async_trait::async_trait;

use crate::error::Result;

/// Single request/response text completion.
///
/// # Implementations
///
/// - `OpenAI` - Chat completions (`openai` feature)
/// - `testing::MockGenerator` - Canned responses for tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete a prompt, returning the model's raw text.
    ///
    /// Transport failures are `Generator` errors. Whether the text is
    /// usable is for the caller to decide.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
