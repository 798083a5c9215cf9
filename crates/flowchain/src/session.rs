use crate::models::message::Message;

/// The conversation store for one dialogue: an ordered transcript seeded
/// with the system message. Each session owns its own transcript, so front
/// ends can run any number of independent dialogues against one agent.
///
/// The transcript is append-only with one exception: the dispatch loop pops
/// the current user entry right after the first model pass of a turn, so a
/// context-heavy payload (e.g. an inline screenshot) is never retransmitted.
#[derive(Debug, Clone)]
pub struct Session {
    messages: Vec<Message>,
}

impl Session {
    /// Create a session seeded with the given system prompt
    pub fn new(system_prompt: &str) -> Self {
        Session {
            messages: vec![Message::system().with_text(system_prompt)],
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Remove and return the most recently appended message
    pub fn pop_last(&mut self) -> Option<Message> {
        self.messages.pop()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
