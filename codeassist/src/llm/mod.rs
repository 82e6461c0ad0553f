mod backends;
mod provider;

pub use backends::{AnthropicProvider, GeminiProvider};
pub use provider::LlmProvider;
