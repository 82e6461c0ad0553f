use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application configuration.
///
/// Loaded with precedence: environment > `codeassist.toml` in the working
/// directory > defaults. CLI flags override all of these in the binaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM provider to use (e.g., "gemini", "anthropic")
    #[serde(default)]
    pub provider: Option<String>,

    /// Model to use (provider-specific)
    #[serde(default)]
    pub model: Option<String>,

    /// Web front end settings
    #[serde(default)]
    pub web: WebConfig,
}

/// Settings for the web front end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Address the web server binds to
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7860".to_string()
}

impl AppConfig {
    /// Load configuration from `codeassist.toml` (if present) with
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::fs::read_to_string("codeassist.toml") {
            Ok(contents) => {
                toml::from_str(&contents).context("failed to parse codeassist.toml")?
            }
            Err(_) => Self::default(),
        };

        if let Ok(provider) = std::env::var("CODEASSIST_PROVIDER") {
            config.provider = Some(provider);
        }
        if let Ok(model) = std::env::var("CODEASSIST_MODEL") {
            config.model = Some(model);
        }
        if let Ok(bind) = std::env::var("CODEASSIST_BIND") {
            config.web.bind = bind;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_config_file() {
        let config: AppConfig = toml::from_str(
            r#"
            provider = "gemini"

            [web]
            bind = "0.0.0.0:8080"
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.provider.as_deref(), Some("gemini"));
        assert_eq!(config.model, None);
        assert_eq!(config.web.bind, "0.0.0.0:8080");
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let config: AppConfig = toml::from_str("").expect("valid toml");
        assert_eq!(config.web.bind, "127.0.0.1:7860");
    }

    #[test]
    fn env_vars_override_loaded_values() {
        // No other test in this crate touches the process environment
        unsafe {
            std::env::set_var("CODEASSIST_PROVIDER", "anthropic");
            std::env::set_var("CODEASSIST_MODEL", "claude-sonnet-4-20250514");
            std::env::set_var("CODEASSIST_BIND", "0.0.0.0:9000");
        }
        let config = AppConfig::load().expect("load");
        unsafe {
            std::env::remove_var("CODEASSIST_PROVIDER");
            std::env::remove_var("CODEASSIST_MODEL");
            std::env::remove_var("CODEASSIST_BIND");
        }

        assert_eq!(config.provider.as_deref(), Some("anthropic"));
        assert_eq!(config.model.as_deref(), Some("claude-sonnet-4-20250514"));
        assert_eq!(config.web.bind, "0.0.0.0:9000");
    }
}
