use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::capabilities::Capability;
use crate::models::tool::Tool;

/// One registered tool: its schema, where it came from, and the capability
/// that executes it. Schema-only catalog entries have no handler; requesting
/// one is a lookup failure at dispatch time, not a crash.
pub struct ToolEntry {
    tool: Tool,
    source: String,
    handler: Option<Arc<dyn Capability>>,
}

impl ToolEntry {
    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn handler(&self) -> Option<&Arc<dyn Capability>> {
        self.handler.as_ref()
    }
}

/// The mapping from tool name to executable capability, built once at
/// startup and immutable for the life of the conversation.
#[derive(Default)]
pub struct ToolRegistry {
    order: Vec<String>,
    entries: HashMap<String, ToolEntry>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its name. Later registrations overwrite earlier
    /// ones; the overwrite is logged with both sources so intentional
    /// layering (catalog schema, then live capability) stays visible.
    pub fn register(&mut self, tool: Tool, source: &str, handler: Option<Arc<dyn Capability>>) {
        let name = tool.name.clone();
        let entry = ToolEntry {
            tool,
            source: source.to_string(),
            handler,
        };
        if let Some(prior) = self.entries.insert(name.clone(), entry) {
            tracing::warn!(
                tool = %name,
                prior_source = %prior.source,
                source = %source,
                "tool registration overwritten"
            );
        } else {
            self.order.push(name);
        }
    }

    /// Merge a static catalog of schema-only entries. Accepts both the flat
    /// `{name, description, parameters}` shape and entries wrapped in the
    /// chat-completions `{"type": "function", "function": {...}}` envelope.
    pub fn load_catalog(&mut self, json: &str, source: &str) -> Result<usize> {
        let value: Value = serde_json::from_str(json)?;
        let tools = value
            .get("tools")
            .and_then(|t| t.as_array())
            .ok_or_else(|| anyhow!("tool catalog has no `tools` array"))?;

        let mut loaded = 0;
        for entry in tools {
            let spec = entry.get("function").unwrap_or(entry);
            let tool: Tool = serde_json::from_value(spec.clone())
                .map_err(|e| anyhow!("invalid catalog entry: {e}"))?;
            self.register(tool, source, None);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Register every tool a capability declares, keyed by the capability's
    /// name as the source label.
    pub fn add_capability(&mut self, capability: Arc<dyn Capability>) {
        for tool in capability.tools().to_vec() {
            self.register(tool, capability.name(), Some(capability.clone()));
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolEntry> {
        self.entries.get(name)
    }

    /// The schema entries to hand to the model, in first-registration order
    pub fn catalog(&self) -> Vec<Tool> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name))
            .map(|entry| entry.tool.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolResult;
    use crate::models::tool::{ToolCall, ToolOutput};
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticCapability {
        name: String,
        tools: Vec<Tool>,
    }

    #[async_trait]
    impl Capability for StaticCapability {
        fn name(&self) -> &str {
            &self.name
        }

        fn tools(&self) -> &[Tool] {
            &self.tools
        }

        async fn call(&self, _call: ToolCall) -> ToolResult<ToolOutput> {
            Ok(ToolOutput::text("ok"))
        }
    }

    fn schema() -> Value {
        json!({"type": "object", "properties": {}})
    }

    #[test]
    fn test_register_lookup_roundtrip() {
        let mut registry = ToolRegistry::new();
        registry.register(Tool::new("x", "first", schema()), "catalog", None);

        let entry = registry.lookup("x").unwrap();
        assert_eq!(entry.tool().description, "first");
        assert_eq!(entry.source(), "catalog");
        assert!(entry.handler().is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = ToolRegistry::new();
        registry.register(Tool::new("x", "first", schema()), "catalog", None);

        let capability = Arc::new(StaticCapability {
            name: "live".to_string(),
            tools: vec![Tool::new("x", "second", schema())],
        });
        registry.add_capability(capability);

        assert_eq!(registry.len(), 1);
        let entry = registry.lookup("x").unwrap();
        assert_eq!(entry.tool().description, "second");
        assert_eq!(entry.source(), "live");
        assert!(entry.handler().is_some());
    }

    #[test]
    fn test_catalog_preserves_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Tool::new("a", "", schema()), "s", None);
        registry.register(Tool::new("b", "", schema()), "s", None);
        registry.register(Tool::new("a", "again", schema()), "s2", None);

        let names: Vec<String> = registry.catalog().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_load_catalog_both_shapes() {
        let mut registry = ToolRegistry::new();
        let json = r#"{
            "tools": [
                {"type": "function", "function": {"name": "wrapped", "description": "d", "parameters": {}}},
                {"name": "flat", "description": "d", "parameters": {}}
            ]
        }"#;
        let loaded = registry.load_catalog(json, "tools.json").unwrap();
        assert_eq!(loaded, 2);
        assert!(registry.lookup("wrapped").is_some());
        assert!(registry.lookup("flat").is_some());
    }

    #[test]
    fn test_load_catalog_rejects_missing_tools_key() {
        let mut registry = ToolRegistry::new();
        assert!(registry.load_catalog("{}", "tools.json").is_err());
    }
}
