use std::sync::Arc;

use tracing::debug;

use crate::assistant::CodeAssist;
use crate::capability::CapabilityRegistry;
use crate::config::AppConfig;
use crate::error::CodeAssistError;
use crate::llm::{AnthropicProvider, GeminiProvider, LlmProvider};
use crate::pipeline::Pipeline;
use crate::session::{MemoryStore, SessionStore};

/// Builder for constructing a [`CodeAssist`] instance.
///
/// # Example
///
/// ```no_run
/// # use codeassist::CodeAssist;
/// # async fn example() -> Result<(), codeassist::CodeAssistError> {
/// let assistant = CodeAssist::builder()
///     .gemini(None)?
///     .build()?;
///
/// let reply = assistant.process_to_text("default_user", "explain lifetimes").await?;
/// println!("{}", reply);
/// # Ok(())
/// # }
/// ```
pub struct CodeAssistBuilder {
    provider: Option<Box<dyn LlmProvider>>,
    pipeline: Option<Pipeline>,
    capabilities: Option<CapabilityRegistry>,
    store: Option<Arc<dyn SessionStore>>,
}

impl CodeAssistBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            pipeline: None,
            capabilities: None,
            store: None,
        }
    }

    /// Set a custom LLM provider.
    pub fn provider(mut self, provider: impl LlmProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Configure the Gemini provider.
    ///
    /// If `model` is `None`, defaults to Gemini Flash.
    pub fn gemini(mut self, model: Option<&str>) -> Result<Self, CodeAssistError> {
        let p = if let Some(m) = model {
            GeminiProvider::new(m).map_err(|e| CodeAssistError::Provider(e.to_string()))?
        } else {
            GeminiProvider::flash().map_err(|e| CodeAssistError::Provider(e.to_string()))?
        };
        self.provider = Some(Box::new(p));
        Ok(self)
    }

    /// Configure the Anthropic provider.
    ///
    /// If `model` is `None`, defaults to Claude Sonnet.
    pub fn anthropic(mut self, model: Option<&str>) -> Result<Self, CodeAssistError> {
        let p = if let Some(m) = model {
            AnthropicProvider::new(m).map_err(|e| CodeAssistError::Provider(e.to_string()))?
        } else {
            AnthropicProvider::sonnet().map_err(|e| CodeAssistError::Provider(e.to_string()))?
        };
        self.provider = Some(Box::new(p));
        Ok(self)
    }

    /// Configure a provider by name ("gemini" or "anthropic").
    pub fn provider_by_name(self, name: &str, model: Option<&str>) -> Result<Self, CodeAssistError> {
        match name {
            "gemini" => self.gemini(model),
            "anthropic" => self.anthropic(model),
            _ => Err(CodeAssistError::Provider(format!(
                "unknown provider: {}",
                name
            ))),
        }
    }

    /// Set a custom pipeline (overrides the default four-stage flow).
    pub fn pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// Set a custom capability registry.
    pub fn capabilities(mut self, capabilities: CapabilityRegistry) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Set a custom session store (defaults to the in-memory store).
    pub fn store(mut self, store: impl SessionStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Apply settings from the configuration file and environment.
    ///
    /// Settings applied here can still be overridden by subsequent builder
    /// calls.
    pub fn from_config(mut self) -> Result<Self, CodeAssistError> {
        let config = AppConfig::load()
            .map_err(|e| CodeAssistError::Config(format!("failed to load configuration: {}", e)))?;

        debug!("loaded configuration");

        // Provider from config (skipped if one was set explicitly)
        if let Some(ref provider_name) = config.provider {
            if self.provider.is_none() {
                self = self.provider_by_name(provider_name, config.model.as_deref())?;
            }
        }

        Ok(self)
    }

    /// Build the [`CodeAssist`] instance.
    ///
    /// Fails if no provider has been configured.
    pub fn build(self) -> Result<CodeAssist, CodeAssistError> {
        let provider = self
            .provider
            .ok_or_else(|| CodeAssistError::Config("no LLM provider configured".to_string()))?;

        let pipeline = self.pipeline.unwrap_or_default();
        let capabilities = self
            .capabilities
            .unwrap_or_else(CapabilityRegistry::with_default_capabilities);
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));

        Ok(CodeAssist::from_parts(provider, pipeline, capabilities, store))
    }
}

impl Default for CodeAssistBuilder {
    fn default() -> Self {
        Self::new()
    }
}
