use std::time::Instant;

use serde_json::{Map, Value};

use crate::errors::ToolError;
use crate::gateway::{Gateway, GatewayError, GatewayReply};
use crate::models::message::Message;
use crate::models::tool::{ToolCall, ToolRequest};
use crate::registry::ToolRegistry;
use crate::session::Session;

/// The outcome of one turn, surfaced to the turn driver
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The final assistant text, also appended to the transcript
    Answered(String),
    /// The model produced no final text; nothing was appended
    Empty,
}

/// The per-turn dispatcher: coordinates the gateway calls and tool execution
/// for one user input at a time against a caller-owned session.
pub struct Agent {
    gateway: Box<dyn Gateway>,
    registry: ToolRegistry,
}

impl Agent {
    pub fn new(gateway: Box<dyn Gateway>, registry: ToolRegistry) -> Self {
        Self { gateway, registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run one turn: append the user message, complete against the model,
    /// execute at most one batch of tool calls, and complete again for the
    /// final text. Gateway failures abort the turn; tool failures never do.
    pub async fn reply(
        &self,
        session: &mut Session,
        user: Message,
    ) -> Result<TurnOutcome, GatewayError> {
        let started = Instant::now();

        session.append(user);
        let catalog = self.registry.catalog();
        let first = self.gateway.complete(session.messages(), &catalog).await;

        // The user entry may carry a context-heavy payload (inline screenshot
        // data); everything the model needs from here on lives in its reply
        // and the tool results, so the raw entry is not retransmitted. The pop
        // happens before the error check so an aborted turn does not leave the
        // entry behind for every later turn to resend.
        session.pop_last();
        let first = first?;

        let outcome = match first {
            GatewayReply::FinalAnswer { text } => {
                if text.is_empty() {
                    TurnOutcome::Empty
                } else {
                    session.append(Message::assistant().with_text(&text));
                    TurnOutcome::Answered(text)
                }
            }
            GatewayReply::ToolCalls(message) => {
                let requests = message.tool_calls.clone();
                session.append(message);

                // Sequential, in request order: tool side effects are user
                // visible and results must line up with their call ids.
                for request in &requests {
                    let content = self.execute(request).await;
                    session.append(Message::tool(&request.id, &request.name, content));
                }

                // No catalog on the second pass: one tool round per turn.
                match self.gateway.complete(session.messages(), &[]).await? {
                    GatewayReply::FinalAnswer { text } if !text.is_empty() => {
                        session.append(Message::assistant().with_text(&text));
                        TurnOutcome::Answered(text)
                    }
                    GatewayReply::FinalAnswer { .. } => TurnOutcome::Empty,
                    GatewayReply::ToolCalls(_) => {
                        tracing::warn!("model requested a second tool round; ignoring");
                        TurnOutcome::Empty
                    }
                }
            }
        };

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "turn completed"
        );
        Ok(outcome)
    }

    /// Execute a single requested call. Never fails: lookup misses, argument
    /// decode failures, and capability errors all become the result text,
    /// which the model reacts to on the second pass.
    async fn execute(&self, request: &ToolRequest) -> String {
        let handler = match self.registry.lookup(&request.name) {
            Some(entry) => match entry.handler() {
                Some(handler) => handler.clone(),
                None => return ToolError::NotFound(request.name.clone()).to_string(),
            },
            None => return ToolError::NotFound(request.name.clone()).to_string(),
        };

        let arguments: Map<String, Value> = match serde_json::from_str(&request.arguments) {
            Ok(arguments) => arguments,
            Err(e) => return ToolError::InvalidArguments(e.to_string()).to_string(),
        };

        match handler
            .call(ToolCall::new(request.name.clone(), arguments))
            .await
        {
            Ok(output) => output.normalize(),
            Err(e) => {
                tracing::error!(tool = %request.name, error = %e, "tool call failed");
                e.to_string()
            }
        }
    }
}
