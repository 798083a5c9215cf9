use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::wire::{messages_to_wire, reply_from_response, tools_to_wire};
use super::{Gateway, GatewayError, GatewayReply};
use crate::models::message::Message;
use crate::models::tool::Tool;

pub const DEFAULT_HOST: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone)]
pub struct OpenAiGatewayConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
}

/// Gateway adapter for the OpenAI chat-completions API.
///
/// Requests are deterministic by design: temperature is pinned at 0, and
/// whenever a tool catalog is attached the model is asked for a structured
/// JSON reply, which the interactive front end decodes as a recommendation.
pub struct OpenAiGateway {
    client: Client,
    config: OpenAiGatewayConfig,
}

impl OpenAiGateway {
    pub fn new(config: OpenAiGatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a gateway from environment variables. `OPENAI_API_KEY` is
    /// required; host and model have defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable is not set")?;
        if api_key.is_empty() {
            return Err(anyhow!("OPENAI_API_KEY is empty"));
        }
        let host = std::env::var("OPENAI_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self::new(OpenAiGatewayConfig {
            host,
            api_key,
            model,
        })
    }

    async fn post(&self, payload: Value) -> Result<Value, GatewayError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(e.to_string()))?;

        if !status.is_success() {
            let message = body
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error")
                .to_string();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl Gateway for OpenAiGateway {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[Tool],
    ) -> Result<GatewayReply, GatewayError> {
        let mut payload = json!({
            "model": self.config.model,
            "messages": messages_to_wire(messages),
            "temperature": 0,
        });

        if !tools.is_empty() {
            payload["tools"] = json!(tools_to_wire(tools));
            payload["tool_choice"] = json!("auto");
            payload["response_format"] = json!({"type": "json_object"});
        }

        let response = self.post(payload).await?;
        reply_from_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup(response_body: Value) -> (MockServer, OpenAiGateway) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
            .mount(&server)
            .await;

        let gateway = OpenAiGateway::new(OpenAiGatewayConfig {
            host: server.uri(),
            api_key: "test_api_key".to_string(),
            model: "gpt-4o".to_string(),
        })
        .unwrap();

        (server, gateway)
    }

    fn final_answer_body(text: &str) -> Value {
        json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn test_complete_final_answer() {
        let (_server, gateway) = setup(final_answer_body("Hello! How can I help?")).await;

        let messages = vec![Message::user().with_text("Hello?")];
        let reply = gateway.complete(&messages, &[]).await.unwrap();

        assert_eq!(
            reply,
            GatewayReply::FinalAnswer {
                text: "Hello! How can I help?".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_complete_tool_request() {
        let body = json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_123",
                        "type": "function",
                        "function": {
                            "name": "get_current_weather",
                            "arguments": "{\"location\":\"San Francisco, CA\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });
        let (_server, gateway) = setup(body).await;

        let messages = vec![Message::user().with_text("What's the weather in San Francisco?")];
        let tool = Tool::new("get_current_weather", "weather", json!({"type": "object"}));
        let reply = gateway.complete(&messages, &[tool]).await.unwrap();

        let GatewayReply::ToolCalls(message) = reply else {
            panic!("expected tool calls");
        };
        assert_eq!(message.tool_calls[0].id, "call_123");
        assert_eq!(
            message.tool_calls[0].arguments,
            "{\"location\":\"San Francisco, CA\"}"
        );
    }

    #[tokio::test]
    async fn test_request_is_deterministic_and_structured() {
        // With a catalog attached the payload must pin temperature at 0 and
        // ask for a JSON-object response.
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({
                "temperature": 0,
                "response_format": {"type": "json_object"},
                "tool_choice": "auto"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(final_answer_body("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = OpenAiGateway::new(OpenAiGatewayConfig {
            host: server.uri(),
            api_key: "k".to_string(),
            model: "gpt-4o".to_string(),
        })
        .unwrap();

        let tool = Tool::new("t", "", json!({"type": "object"}));
        gateway
            .complete(&[Message::user().with_text("hi")], &[tool])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_catalog_omitted_on_second_pass() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({"temperature": 0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(final_answer_body("ok")))
            .mount(&server)
            .await;

        let gateway = OpenAiGateway::new(OpenAiGatewayConfig {
            host: server.uri(),
            api_key: "k".to_string(),
            model: "gpt-4o".to_string(),
        })
        .unwrap();

        gateway
            .complete(&[Message::user().with_text("hi")], &[])
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let payload: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(payload.get("tools").is_none());
        assert!(payload.get("response_format").is_none());
    }

    #[tokio::test]
    async fn test_api_error_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "Rate limit reached"}
            })))
            .mount(&server)
            .await;

        let gateway = OpenAiGateway::new(OpenAiGatewayConfig {
            host: server.uri(),
            api_key: "k".to_string(),
            model: "gpt-4o".to_string(),
        })
        .unwrap();

        let err = gateway
            .complete(&[Message::user().with_text("hi")], &[])
            .await
            .unwrap_err();
        match err {
            GatewayError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
