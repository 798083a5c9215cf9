//! Capability providers: the local collaborators the model can drive.
//!
//! Each provider implements the `Capability` contract and declares its tools
//! explicitly; the registry merges them at startup. Nothing is discovered by
//! reflection and nothing registers after startup.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::errors::ToolResult;
use crate::models::tool::{Tool, ToolCall, ToolOutput};
use crate::registry::ToolRegistry;

pub mod calendar;
pub mod maps;
pub mod messaging;
pub mod search;
pub mod shell;
pub mod weather;

/// Core trait for a collaborator that exposes tools to the model
#[async_trait]
pub trait Capability: Send + Sync {
    /// Name of the capability, used as the registration source label
    fn name(&self) -> &str;

    /// The tools this capability declares
    fn tools(&self) -> &[Tool];

    /// Execute one of the declared tools
    async fn call(&self, call: ToolCall) -> ToolResult<ToolOutput>;
}

/// Result text used by the macOS-only tools when running elsewhere. The
/// model sees it as an ordinary tool result and explains it to the user.
pub(crate) const MACOS_ONLY: &str = "This tool is only supported on macOS";

/// Build the startup registry: the static schema catalog first, then every
/// capability provider. Later registrations overwrite catalog placeholders
/// for the same names.
pub fn standard_registry() -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.load_catalog(include_str!("../catalog/tools.json"), "tools.json")?;

    registry.add_capability(Arc::new(shell::ShellCapability::new()));
    registry.add_capability(Arc::new(messaging::MessagingCapability::new()));
    registry.add_capability(Arc::new(calendar::CalendarCapability::new()));
    registry.add_capability(Arc::new(search::SearchCapability::from_env()));
    registry.add_capability(Arc::new(maps::MapsCapability::new()));
    registry.add_capability(Arc::new(weather::WeatherCapability::new()));

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_builds() {
        let registry = standard_registry().unwrap();
        assert!(!registry.is_empty());

        // Built-ins and provider tools are all present
        for name in [
            "run_command",
            "generate_and_run_script",
            "send_sms",
            "create_calendar_event",
            "web_search",
            "search_location_in_maps",
            "get_current_weather",
        ] {
            assert!(registry.lookup(name).is_some(), "missing tool {name}");
        }
    }

    #[test]
    fn test_catalog_placeholder_stays_schema_only() {
        let registry = standard_registry().unwrap();
        let entry = registry.lookup("paraphrase_text").unwrap();
        assert!(entry.handler().is_none());
    }

    #[test]
    fn test_capability_overwrites_catalog_schema() {
        let registry = standard_registry().unwrap();
        let entry = registry.lookup("get_current_weather").unwrap();
        assert_eq!(entry.source(), "weather");
        assert!(entry.handler().is_some());
    }
}
