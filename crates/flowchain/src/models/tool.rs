use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tool that can be requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// JSON schema for the arguments the tool accepts
    pub parameters: Value,
}

impl Tool {
    /// Create a new tool with the given name and description
    pub fn new<N, D>(name: N, description: D, parameters: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Tool {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A tool invocation as the model emitted it. The arguments stay raw JSON
/// text until dispatch time so a malformed payload only fails its own call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolRequest {
    /// Opaque correlation token generated by the model
    pub id: String,
    /// The name of the tool to execute
    pub name: String,
    /// The arguments as raw JSON text
    pub arguments: String,
}

impl ToolRequest {
    pub fn new<I, N, A>(id: I, name: N, arguments: A) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        A: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// A decoded tool call, ready to hand to a capability
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new<S: Into<String>>(name: S, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Fetch a string argument by name
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

/// What a capability hands back from a call. The transcript only carries
/// text, so every variant normalizes down to a single string.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Record(Value),
    Many(Vec<Value>),
}

impl ToolOutput {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ToolOutput::Text(text.into())
    }

    /// Flatten the output to the text that goes in the tool message.
    /// Records become JSON text; lists serialize record elements first and
    /// then join everything with a comma.
    pub fn normalize(&self) -> String {
        match self {
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::Record(value) => value.to_string(),
            ToolOutput::Many(values) => values
                .iter()
                .map(|value| match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<String> for ToolOutput {
    fn from(text: String) -> Self {
        ToolOutput::Text(text)
    }
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        ToolOutput::Record(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_text() {
        assert_eq!(ToolOutput::text("done").normalize(), "done");
    }

    #[test]
    fn test_normalize_record_is_json() {
        let output = ToolOutput::Record(json!({"location": "Tokyo", "temperature": "10"}));
        let parsed: Value = serde_json::from_str(&output.normalize()).unwrap();
        assert_eq!(parsed["location"], "Tokyo");
        assert_eq!(parsed["temperature"], "10");
    }

    #[test]
    fn test_normalize_many_joins_with_comma() {
        let output = ToolOutput::Many(vec![
            json!("Start Pomodoro"),
            json!("Log Water"),
        ]);
        assert_eq!(output.normalize(), "Start Pomodoro,Log Water");
    }

    #[test]
    fn test_normalize_many_serializes_records() {
        let output = ToolOutput::Many(vec![
            json!({"url": "https://example.com", "content": "a"}),
            json!("plain"),
        ]);
        let normalized = output.normalize();
        assert!(normalized.starts_with('{'));
        assert!(normalized.ends_with(",plain"));
    }

    #[test]
    fn test_str_arg() {
        let mut arguments = Map::new();
        arguments.insert("location".to_string(), json!("Tokyo"));
        arguments.insert("count".to_string(), json!(3));
        let call = ToolCall::new("get_current_weather", arguments);
        assert_eq!(call.str_arg("location"), Some("Tokyo"));
        assert_eq!(call.str_arg("count"), None);
        assert_eq!(call.str_arg("missing"), None);
    }
}
