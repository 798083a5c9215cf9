//! Conversion between the internal transcript and the chat-completions wire
//! format, plus parsing of the model's response into a `GatewayReply`.
use regex::Regex;
use serde_json::{json, Value};

use super::{GatewayError, GatewayReply};
use crate::models::content::Content;
use crate::models::message::Message;
use crate::models::role::Role;
use crate::models::tool::{Tool, ToolRequest};

/// Convert the transcript to chat-completions message objects
pub fn messages_to_wire(messages: &[Message]) -> Vec<Value> {
    messages.iter().map(message_to_wire).collect()
}

fn message_to_wire(message: &Message) -> Value {
    match message.role {
        Role::System | Role::User => {
            let role = if message.role == Role::System {
                "system"
            } else {
                "user"
            };
            json!({"role": role, "content": content_to_wire(&message.content)})
        }
        Role::Assistant => {
            let mut converted = json!({"role": "assistant"});
            if let Some(text) = message.text() {
                converted["content"] = json!(text);
            }
            if message.has_tool_calls() {
                let calls: Vec<Value> = message
                    .tool_calls
                    .iter()
                    .map(|request| {
                        json!({
                            "id": request.id,
                            "type": "function",
                            "function": {
                                "name": request.name,
                                "arguments": request.arguments,
                            }
                        })
                    })
                    .collect();
                converted["tool_calls"] = json!(calls);
            }
            converted
        }
        Role::Tool => json!({
            "role": "tool",
            "tool_call_id": message.tool_call_id,
            "name": message.name,
            "content": message.text().unwrap_or_default(),
        }),
    }
}

/// Single text parts collapse to a plain string; anything multimodal becomes
/// the part-array form with data-url images.
fn content_to_wire(content: &[Content]) -> Value {
    if let [Content::Text(text)] = content {
        return json!(text.text);
    }

    let parts: Vec<Value> = content
        .iter()
        .map(|part| match part {
            Content::Text(text) => json!({"type": "text", "text": text.text}),
            Content::Image(image) => json!({
                "type": "image_url",
                "image_url": {
                    "url": format!("data:{};base64,{}", image.mime_type, image.data),
                    "detail": "low"
                }
            }),
        })
        .collect();
    json!(parts)
}

/// Convert the tool catalog to the chat-completions tools array
pub fn tools_to_wire(tools: &[Tool]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                }
            })
        })
        .collect()
}

/// Parse a chat-completions response body into a reply
pub fn reply_from_response(response: &Value) -> Result<GatewayReply, GatewayError> {
    let message = response
        .pointer("/choices/0/message")
        .ok_or_else(|| GatewayError::Malformed("response has no choices[0].message".to_string()))?;

    let text = message
        .get("content")
        .and_then(|c| c.as_str())
        .unwrap_or_default()
        .to_string();

    let tool_calls = message
        .get("tool_calls")
        .and_then(|c| c.as_array())
        .filter(|calls| !calls.is_empty());

    let Some(tool_calls) = tool_calls else {
        return Ok(GatewayReply::FinalAnswer { text });
    };

    let name_re = Regex::new(r"^[a-zA-Z0-9_-]+$").expect("static regex");
    let mut assistant = Message::assistant();
    if !text.is_empty() {
        assistant = assistant.with_text(&text);
    }

    for call in tool_calls {
        let id = call
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| GatewayError::Malformed("tool call without id".to_string()))?;
        let name = call
            .pointer("/function/name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| GatewayError::Malformed("tool call without function name".to_string()))?;
        let arguments = call
            .pointer("/function/arguments")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        // An out-of-alphabet name can never be in the registry; keep the
        // request so the lookup failure becomes the tool's result text.
        if !name_re.is_match(name) {
            tracing::warn!(tool = %name, "model requested a tool with an invalid name");
        }

        assistant = assistant.with_tool_request(ToolRequest::new(id, name, arguments));
    }

    Ok(GatewayReply::ToolCalls(assistant))
}
