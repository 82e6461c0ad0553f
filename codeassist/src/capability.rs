use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};

/// An external capability a stage may use while generating its text.
///
/// Capabilities are declarations only: name, description, and a JSON schema
/// for the arguments. They are handed to the LLM provider opaquely; the core
/// never executes them itself.
pub trait Capability: Send + Sync {
    /// Capability name as declared to the provider
    fn name(&self) -> &str;

    /// Human-readable description shown to the model
    fn description(&self) -> &str;

    /// JSON schema for the capability's arguments
    fn schema(&self) -> Value;
}

/// Registry mapping capability names to their declarations.
///
/// Stages declare capabilities by name; the pipeline runner resolves the
/// declared subset against this registry before each provider call.
pub struct CapabilityRegistry {
    capabilities: HashMap<String, Arc<dyn Capability>>,
}

impl CapabilityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            capabilities: HashMap::new(),
        }
    }

    /// Create a registry with the built-in capabilities registered.
    pub fn with_default_capabilities() -> Self {
        let mut registry = Self::new();
        registry.register(WebSearchCapability);
        registry
    }

    /// Register a capability
    pub fn register(&mut self, capability: impl Capability + 'static) {
        let name = capability.name().to_string();
        self.capabilities.insert(name, Arc::new(capability));
    }

    /// Get a capability by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.capabilities.get(name).cloned()
    }

    /// Resolve a list of declared names to capability references.
    ///
    /// Unknown names are skipped; a stage declaring a capability that was
    /// never registered simply runs without it.
    pub fn resolve(&self, names: &[String]) -> Vec<&dyn Capability> {
        names
            .iter()
            .filter_map(|n| self.capabilities.get(n).map(|c| c.as_ref()))
            .collect()
    }

    /// Get capability names
    pub fn names(&self) -> Vec<&str> {
        self.capabilities.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Web search capability declaration.
///
/// Mirrors the search tool the upstream model backends expose; the provider
/// decides how (and whether) to honor it.
pub struct WebSearchCapability;

impl Capability for WebSearchCapability {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for documentation, code examples, and solutions to programming problems"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_skips_unknown_names() {
        let registry = CapabilityRegistry::with_default_capabilities();
        let resolved = registry.resolve(&[
            "web_search".to_string(),
            "time_travel".to_string(),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name(), "web_search");
    }

    #[test]
    fn empty_declaration_resolves_to_nothing() {
        let registry = CapabilityRegistry::with_default_capabilities();
        assert!(registry.resolve(&[]).is_empty());
    }
}
