use std::process::Command;

use async_trait::async_trait;
use serde_json::json;

use super::{Capability, MACOS_ONLY};
use crate::errors::{ToolError, ToolResult};
use crate::models::tool::{Tool, ToolCall, ToolOutput};

/// Creates events in the macOS Calendar app.
pub struct CalendarCapability {
    tools: Vec<Tool>,
}

impl CalendarCapability {
    pub fn new() -> Self {
        let create_event = Tool::new(
            "create_calendar_event",
            "Create an event in the user's calendar",
            json!({
                "type": "object",
                "required": ["title", "start"],
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "The event title"
                    },
                    "start": {
                        "type": "string",
                        "description": "Start time, e.g. 'June 3, 2024 10:00 AM'"
                    },
                    "end": {
                        "type": "string",
                        "description": "End time; defaults to one hour after start"
                    },
                    "location": {
                        "type": "string",
                        "description": "Optional event location"
                    }
                }
            }),
        );

        Self {
            tools: vec![create_event],
        }
    }

    fn create_event(&self, call: &ToolCall) -> ToolResult<ToolOutput> {
        let title = call
            .str_arg("title")
            .ok_or_else(|| ToolError::InvalidArguments("`title` is required".to_string()))?;
        let start = call
            .str_arg("start")
            .ok_or_else(|| ToolError::InvalidArguments("`start` is required".to_string()))?;

        if !cfg!(target_os = "macos") {
            return Ok(ToolOutput::text(MACOS_ONLY));
        }

        let title = title.replace('"', "\\\"");
        let start = start.replace('"', "\\\"");
        let end_clause = match call.str_arg("end") {
            Some(end) => format!("set theEnd to date \"{}\"", end.replace('"', "\\\"")),
            None => "set theEnd to theStart + (60 * 60)".to_string(),
        };
        let location_property = match call.str_arg("location") {
            Some(location) => format!(", location:\"{}\"", location.replace('"', "\\\"")),
            None => String::new(),
        };

        let script = format!(
            r#"set theStart to date "{start}"
{end_clause}
tell application "Calendar"
    tell calendar 1
        make new event with properties {{summary:"{title}", start date:theStart, end date:theEnd{location_property}}}
    end tell
end tell"#
        );

        let output = Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output()
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        if output.status.success() {
            Ok(ToolOutput::text(format!("Created calendar event: {title}")))
        } else {
            Err(ToolError::ExecutionFailed(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ))
        }
    }
}

impl Default for CalendarCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for CalendarCapability {
    fn name(&self) -> &str {
        "calendar"
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, call: ToolCall) -> ToolResult<ToolOutput> {
        match call.name.as_str() {
            "create_calendar_event" => self.create_event(&call),
            _ => Err(ToolError::NotFound(call.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    #[tokio::test]
    async fn test_create_event_requires_start() {
        let calendar = CalendarCapability::new();
        let mut arguments: Map<String, Value> = Map::new();
        arguments.insert("title".to_string(), json!("Standup"));
        let err = calendar
            .call(ToolCall::new("create_calendar_event", arguments))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[cfg(not(target_os = "macos"))]
    #[tokio::test]
    async fn test_create_event_guarded_off_macos() {
        let calendar = CalendarCapability::new();
        let mut arguments: Map<String, Value> = Map::new();
        arguments.insert("title".to_string(), json!("Standup"));
        arguments.insert("start".to_string(), json!("June 3, 2024 10:00 AM"));
        let output = calendar
            .call(ToolCall::new("create_calendar_event", arguments))
            .await
            .unwrap();
        assert_eq!(output.normalize(), MACOS_ONLY);
    }
}
