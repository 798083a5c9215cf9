use async_trait::async_trait;
use serde_json::json;

use super::Capability;
use crate::errors::{ToolError, ToolResult};
use crate::models::tool::{Tool, ToolCall, ToolOutput};

/// Canned weather lookups for a few cities. Kept as a live tool so the whole
/// pipeline can be exercised without network credentials.
pub struct WeatherCapability {
    tools: Vec<Tool>,
}

impl WeatherCapability {
    pub fn new() -> Self {
        let get_current_weather = Tool::new(
            "get_current_weather",
            "Get the current weather in a given location",
            json!({
                "type": "object",
                "required": ["location"],
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "The city and state, e.g. San Francisco, CA"
                    },
                    "unit": {
                        "enum": ["celsius", "fahrenheit"]
                    }
                }
            }),
        );

        Self {
            tools: vec![get_current_weather],
        }
    }

    fn current_weather(&self, call: &ToolCall) -> ToolResult<ToolOutput> {
        let location = call
            .str_arg("location")
            .ok_or_else(|| ToolError::InvalidArguments("`location` is required".to_string()))?;
        let unit = call.str_arg("unit").unwrap_or("fahrenheit");

        let lowered = location.to_lowercase();
        let record = if lowered.contains("tokyo") {
            json!({"location": "Tokyo", "temperature": "10", "unit": unit})
        } else if lowered.contains("san francisco") {
            json!({"location": "San Francisco", "temperature": "72", "unit": unit})
        } else if lowered.contains("paris") {
            json!({"location": "Paris", "temperature": "22", "unit": unit})
        } else {
            json!({"location": location, "temperature": "unknown"})
        };

        Ok(ToolOutput::Record(record))
    }
}

impl Default for WeatherCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for WeatherCapability {
    fn name(&self) -> &str {
        "weather"
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, call: ToolCall) -> ToolResult<ToolOutput> {
        match call.name.as_str() {
            "get_current_weather" => self.current_weather(&call),
            _ => Err(ToolError::NotFound(call.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    async fn lookup(location: &str) -> Value {
        let weather = WeatherCapability::new();
        let mut arguments: Map<String, Value> = Map::new();
        arguments.insert("location".to_string(), json!(location));
        let output = weather
            .call(ToolCall::new("get_current_weather", arguments))
            .await
            .unwrap();
        serde_json::from_str(&output.normalize()).unwrap()
    }

    #[tokio::test]
    async fn test_known_city() {
        let record = lookup("Tokyo").await;
        assert_eq!(record["location"], "Tokyo");
        assert_eq!(record["temperature"], "10");
        assert_eq!(record["unit"], "fahrenheit");
    }

    #[tokio::test]
    async fn test_unknown_city() {
        let record = lookup("Ulaanbaatar").await;
        assert_eq!(record["temperature"], "unknown");
    }
}
