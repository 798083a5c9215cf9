use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{Gateway, GatewayError, GatewayReply};
use crate::models::message::Message;
use crate::models::tool::Tool;

/// A mock gateway that returns pre-configured replies for testing and
/// records the catalog size of each call it receives.
pub struct MockGateway {
    replies: Arc<Mutex<Vec<GatewayReply>>>,
    catalog_sizes: Arc<Mutex<Vec<usize>>>,
}

impl MockGateway {
    /// Create a new mock gateway with a sequence of replies
    pub fn new(replies: Vec<GatewayReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies)),
            catalog_sizes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The number of tools offered on each completion call, in order
    pub fn catalog_sizes(&self) -> Vec<usize> {
        self.catalog_sizes.lock().unwrap().clone()
    }

    pub fn recorder(&self) -> Arc<Mutex<Vec<usize>>> {
        self.catalog_sizes.clone()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn complete(
        &self,
        _messages: &[Message],
        tools: &[Tool],
    ) -> Result<GatewayReply, GatewayError> {
        self.catalog_sizes.lock().unwrap().push(tools.len());

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Ok(GatewayReply::FinalAnswer {
                text: String::new(),
            })
        } else {
            Ok(replies.remove(0))
        }
    }
}
