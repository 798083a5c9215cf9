use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::content::Content;
use super::role::Role;
use super::tool::ToolRequest;

/// A message in the conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub created: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Content>,
    /// Tool invocations the model asked for; assistant messages only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolRequest>,
    /// Correlates a tool-role message to the request that produced it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// The tool's name; tool-role messages only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    fn new(role: Role) -> Self {
        Message {
            role,
            created: Utc::now().timestamp(),
            content: Vec::new(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a new system message with the current timestamp
    pub fn system() -> Self {
        Message::new(Role::System)
    }

    /// Create a new user message with the current timestamp
    pub fn user() -> Self {
        Message::new(Role::User)
    }

    /// Create a new assistant message with the current timestamp
    pub fn assistant() -> Self {
        Message::new(Role::Assistant)
    }

    /// Create a tool-result message correlated to a request id
    pub fn tool<I, N, C>(tool_call_id: I, name: N, content: C) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        C: Into<String>,
    {
        let mut message = Message::new(Role::Tool);
        message.tool_call_id = Some(tool_call_id.into());
        message.name = Some(name.into());
        message.content.push(Content::text(content.into()));
        message
    }

    /// Add text content to the message
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.content.push(Content::text(text));
        self
    }

    /// Add image content to the message
    pub fn with_image<S: Into<String>, T: Into<String>>(mut self, data: S, mime_type: T) -> Self {
        self.content.push(Content::image(data, mime_type));
        self
    }

    /// Add a tool request to the message
    pub fn with_tool_request(mut self, request: ToolRequest) -> Self {
        self.tool_calls.push(request);
        self
    }

    /// The first text part, if any
    pub fn text(&self) -> Option<&str> {
        self.content.iter().find_map(|content| content.as_text())
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
