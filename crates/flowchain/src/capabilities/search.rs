use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::Capability;
use crate::errors::{ToolError, ToolResult};
use crate::models::tool::{Tool, ToolCall, ToolOutput};

const TAVILY_URL: &str = "https://api.tavily.com/search";

/// Web search backed by the Tavily API.
pub struct SearchCapability {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    tools: Vec<Tool>,
}

impl SearchCapability {
    pub fn new(api_key: Option<String>) -> Self {
        let web_search = Tool::new(
            "web_search",
            "Searches the web for the given query",
            json!({
                "type": "object",
                "required": ["query"],
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                }
            }),
        );

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            api_key,
            endpoint: TAVILY_URL.to_string(),
            tools: vec![web_search],
        }
    }

    /// Read the API key from `TAVILY_API_KEY`. A missing key is not fatal at
    /// startup; searching without one fails per call instead.
    pub fn from_env() -> Self {
        Self::new(std::env::var("TAVILY_API_KEY").ok())
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    async fn web_search(&self, call: &ToolCall) -> ToolResult<ToolOutput> {
        let query = call
            .str_arg("query")
            .ok_or_else(|| ToolError::InvalidArguments("`query` is required".to_string()))?;
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            ToolError::ExecutionFailed("TAVILY_API_KEY is not set".to_string())
        })?;

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({"api_key": api_key, "query": query}))
            .send()
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ToolError::ExecutionFailed(format!(
                "search request failed with status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        let results = body
            .get("results")
            .and_then(|r| r.as_array())
            .map(|results| {
                results
                    .iter()
                    .map(|result| {
                        json!({
                            "url": result.get("url").cloned().unwrap_or_default(),
                            "content": result.get("content").cloned().unwrap_or_default(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(ToolOutput::Many(results))
    }
}

#[async_trait]
impl Capability for SearchCapability {
    fn name(&self) -> &str {
        "search"
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, call: ToolCall) -> ToolResult<ToolOutput> {
        match call.name.as_str() {
            "web_search" => self.web_search(&call).await,
            _ => Err(ToolError::NotFound(call.name)),
        }
    }
}
