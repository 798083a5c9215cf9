use async_trait::async_trait;
use serde_json::json;

use super::Capability;
use crate::errors::{ToolError, ToolResult};
use crate::models::tool::{Tool, ToolCall, ToolOutput};

/// Opens locations in Google Maps via the default browser.
pub struct MapsCapability {
    tools: Vec<Tool>,
}

impl MapsCapability {
    pub fn new() -> Self {
        let search_location = Tool::new(
            "search_location_in_maps",
            "Opens the specified location in Google Maps in the user's browser",
            json!({
                "type": "object",
                "required": ["location"],
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "The location to search for, as an address or place name"
                    }
                }
            }),
        );

        Self {
            tools: vec![search_location],
        }
    }

    pub fn maps_url(location: &str) -> String {
        format!(
            "https://www.google.com/maps/search/?api=1&query={}",
            urlencoding::encode(location)
        )
    }

    fn search_location(&self, call: &ToolCall) -> ToolResult<ToolOutput> {
        let location = call
            .str_arg("location")
            .ok_or_else(|| ToolError::InvalidArguments("`location` is required".to_string()))?;

        let url = Self::maps_url(location);
        webbrowser::open(&url)
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to open Google Maps: {e}")))?;

        Ok(ToolOutput::text("Google Maps opened in browser"))
    }
}

impl Default for MapsCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for MapsCapability {
    fn name(&self) -> &str {
        "maps"
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, call: ToolCall) -> ToolResult<ToolOutput> {
        match call.name.as_str() {
            "search_location_in_maps" => self.search_location(&call),
            _ => Err(ToolError::NotFound(call.name)),
        }
    }
}
