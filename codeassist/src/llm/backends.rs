use anyhow::{Context, Result};
use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, ChatRole, FunctionTool, MessageType, Tool as LlmTool};
use tokio::time::{Duration, timeout};
use tracing::warn;

use super::LlmProvider;
use crate::capability::Capability;

const DEFAULT_MAX_TOKENS: u32 = 8192;
const API_TIMEOUT_SECS: u64 = 120;

/// Parameters for the shared LLM generation implementation
struct GenerateParams<'a> {
    backend: LLMBackend,
    provider_name: &'a str,
    api_key: &'a str,
    model: &'a str,
    max_tokens: u32,
    instruction: &'a str,
    prompt: &'a str,
    capabilities: &'a [&'a dyn Capability],
}

/// Build llm crate tool definitions from the declared capabilities.
fn build_llm_tools(capabilities: &[&dyn Capability]) -> Vec<LlmTool> {
    capabilities
        .iter()
        .map(|c| LlmTool {
            tool_type: "function".to_string(),
            function: FunctionTool {
                name: c.name().to_string(),
                description: c.description().to_string(),
                parameters: c.schema(),
            },
            cache_control: None,
        })
        .collect()
}

/// Build the llm crate client from shared parameters.
fn build_llm_client(
    params: &GenerateParams<'_>,
    llm_tools: &[LlmTool],
) -> Result<Box<dyn llm::LLMProvider>> {
    // NOTE: The llm crate requires tools to be set at build time, so the
    // client is rebuilt on each call. Capability sets differ per stage.
    let mut builder = LLMBuilder::new()
        .backend(params.backend.clone())
        .api_key(params.api_key)
        .model(params.model)
        .system(params.instruction)
        .max_tokens(params.max_tokens);

    for tool in llm_tools {
        builder = builder.function(
            llm::builder::FunctionBuilder::new(&tool.function.name)
                .description(&tool.function.description)
                .json_schema(tool.function.parameters.clone()),
        );
    }

    builder.build().context("failed to build LLM client")
}

/// Shared implementation for providers backed by the `llm` crate.
async fn generate_impl(params: GenerateParams<'_>) -> Result<String> {
    let llm_tools = build_llm_tools(params.capabilities);
    let client = build_llm_client(&params, &llm_tools)?;

    let messages = vec![ChatMessage {
        role: ChatRole::User,
        message_type: MessageType::Text,
        content: params.prompt.to_string(),
    }];

    let api_timeout = Duration::from_secs(API_TIMEOUT_SECS);
    let timeout_msg = format!(
        "{} API call timed out after {} seconds",
        params.provider_name, API_TIMEOUT_SECS
    );
    let error_msg = format!("failed to call {} API", params.provider_name);

    let response: Box<dyn llm::chat::ChatResponse> = if llm_tools.is_empty() {
        timeout(api_timeout, client.chat(&messages))
            .await
            .context(timeout_msg)?
            .context(error_msg)?
    } else {
        timeout(
            api_timeout,
            client.chat_with_tools(&messages, Some(&llm_tools)),
        )
        .await
        .context(timeout_msg)?
        .context(error_msg)?
    };

    let text = response.text().unwrap_or_else(|| {
        warn!(
            "{} API returned empty response text",
            params.provider_name
        );
        String::new()
    });

    Ok(text)
}

/// Gemini provider using the llm crate (Google backend)
pub struct GeminiProvider {
    model: String,
    api_key: String,
    max_tokens: u32,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the specified model
    pub fn new(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY environment variable not set")?;
        Ok(Self {
            model: model.into(),
            api_key,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Create a provider using Gemini Flash
    pub fn flash() -> Result<Self> {
        Self::new("gemini-2.0-flash-exp")
    }

    fn params<'a>(
        &'a self,
        instruction: &'a str,
        prompt: &'a str,
        capabilities: &'a [&'a dyn Capability],
    ) -> GenerateParams<'a> {
        GenerateParams {
            backend: LLMBackend::Google,
            provider_name: "Gemini",
            api_key: &self.api_key,
            model: &self.model,
            max_tokens: self.max_tokens,
            instruction,
            prompt,
            capabilities,
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        instruction: &str,
        prompt: &str,
        capabilities: &[&dyn Capability],
    ) -> Result<String> {
        generate_impl(self.params(instruction, prompt, capabilities)).await
    }
}

/// Anthropic provider using the llm crate
pub struct AnthropicProvider {
    model: String,
    api_key: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the specified model
    pub fn new(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable not set")?;
        Ok(Self {
            model: model.into(),
            api_key,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Create a provider using Claude Sonnet
    pub fn sonnet() -> Result<Self> {
        Self::new("claude-sonnet-4-20250514")
    }

    fn params<'a>(
        &'a self,
        instruction: &'a str,
        prompt: &'a str,
        capabilities: &'a [&'a dyn Capability],
    ) -> GenerateParams<'a> {
        GenerateParams {
            backend: LLMBackend::Anthropic,
            provider_name: "Anthropic",
            api_key: &self.api_key,
            model: &self.model,
            max_tokens: self.max_tokens,
            instruction,
            prompt,
            capabilities,
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(
        &self,
        instruction: &str,
        prompt: &str,
        capabilities: &[&dyn Capability],
    ) -> Result<String> {
        generate_impl(self.params(instruction, prompt, capabilities)).await
    }
}
