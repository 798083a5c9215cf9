use std::process::Command;

use async_trait::async_trait;
use serde_json::json;

use super::{Capability, MACOS_ONLY};
use crate::errors::{ToolError, ToolResult};
use crate::models::tool::{Tool, ToolCall, ToolOutput};

/// Sends messages through the macOS Messages app.
pub struct MessagingCapability {
    tools: Vec<Tool>,
}

impl MessagingCapability {
    pub fn new() -> Self {
        let send_sms = Tool::new(
            "send_sms",
            "Sends an SMS message to the specified recipient using the Messages app",
            json!({
                "type": "object",
                "required": ["to", "message"],
                "properties": {
                    "to": {
                        "type": "string",
                        "description": "The recipient's phone number or contact handle"
                    },
                    "message": {
                        "type": "string",
                        "description": "The message body to send"
                    }
                }
            }),
        );

        Self {
            tools: vec![send_sms],
        }
    }

    fn send_sms(&self, call: &ToolCall) -> ToolResult<ToolOutput> {
        let to = call
            .str_arg("to")
            .ok_or_else(|| ToolError::InvalidArguments("`to` is required".to_string()))?;
        let message = call
            .str_arg("message")
            .ok_or_else(|| ToolError::InvalidArguments("`message` is required".to_string()))?;

        if !cfg!(target_os = "macos") {
            return Ok(ToolOutput::text(MACOS_ONLY));
        }

        // Newlines in the handle and unescaped quotes both break the script.
        let to = to.replace('\n', "").replace('"', "\\\"");
        let message = message.replace('"', "\\\"");

        let script = format!(
            r#"tell application "Messages"
    set targetBuddy to buddy "{to}" of service 1
    send "{message}" to targetBuddy
end tell"#
        );

        let output = Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output()
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        if output.status.success() {
            Ok(ToolOutput::text("SMS message sent"))
        } else {
            Err(ToolError::ExecutionFailed(
                "An error occurred while sending the SMS. Please check the recipient number and try again."
                    .to_string(),
            ))
        }
    }
}

impl Default for MessagingCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for MessagingCapability {
    fn name(&self) -> &str {
        "messaging"
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, call: ToolCall) -> ToolResult<ToolOutput> {
        match call.name.as_str() {
            "send_sms" => self.send_sms(&call),
            _ => Err(ToolError::NotFound(call.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    #[tokio::test]
    async fn test_send_sms_requires_recipient() {
        let messaging = MessagingCapability::new();
        let mut arguments: Map<String, Value> = Map::new();
        arguments.insert("message".to_string(), json!("hi"));
        let err = messaging
            .call(ToolCall::new("send_sms", arguments))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[cfg(not(target_os = "macos"))]
    #[tokio::test]
    async fn test_send_sms_guarded_off_macos() {
        let messaging = MessagingCapability::new();
        let mut arguments: Map<String, Value> = Map::new();
        arguments.insert("to".to_string(), json!("+15550100"));
        arguments.insert("message".to_string(), json!("hi"));
        let output = messaging
            .call(ToolCall::new("send_sms", arguments))
            .await
            .unwrap();
        assert_eq!(output.normalize(), MACOS_ONLY);
    }
}
