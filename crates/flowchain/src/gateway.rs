//! The boundary to the remote language model.
//!
//! `Gateway::complete` sends the transcript plus tool catalog and hands back
//! either the model's final text or the batch of tool calls it wants run.
//! Gateway failures are fatal to the current turn; there is no retry here.
use async_trait::async_trait;
use thiserror::Error;

use crate::models::message::Message;
use crate::models::tool::Tool;

pub mod openai;
pub mod wire;

#[cfg(test)]
pub mod mock;

/// What the model produced for one completion call
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayReply {
    /// A direct textual reply, no tool calls requested. The text may be
    /// empty when the model declined to answer.
    FinalAnswer { text: String },
    /// The assistant message carrying one or more tool call requests,
    /// call ids preserved in request order.
    ToolCalls(Message),
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("request to model endpoint failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model endpoint returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed gateway response: {0}")]
    Malformed(String),
}

/// Boundary trait over the remote model service
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Generate the next step from the transcript and available tools.
    /// Passing an empty catalog tells the model no tool choice is on offer.
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[Tool],
    ) -> Result<GatewayReply, GatewayError>;
}
