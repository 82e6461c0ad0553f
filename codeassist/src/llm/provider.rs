use anyhow::Result;
use async_trait::async_trait;

use crate::capability::Capability;

/// Trait for text-generation providers.
///
/// The pipeline treats a provider as an opaque synchronous function from
/// (instruction, prompt, declared capabilities) to generated text. How the
/// provider honors the capability declarations — server-side search, client
/// tools, or ignoring them — is its own business.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for a single stage invocation.
    ///
    /// `instruction` is the stage's system prompt, `prompt` the user prompt
    /// assembled from the query and prior stage outputs.
    async fn generate(
        &self,
        instruction: &str,
        prompt: &str,
        capabilities: &[&dyn Capability],
    ) -> Result<String>;

    /// Get the provider name
    fn name(&self) -> &str;
}
