use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use flowchain::agent::Agent;
use flowchain::session::Session;

/// Shared application state: one agent, and a transcript per session token.
///
/// The map lock is only held long enough to look up or create a session;
/// each session has its own lock, held for the whole turn. Turns against the
/// same session never interleave, while other sessions proceed unblocked.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<Agent>,
    pub sessions: Arc<Mutex<HashMap<String, Arc<Mutex<Session>>>>>,
    pub system_prompt: Arc<String>,
}

impl AppState {
    pub fn new(agent: Agent, system_prompt: String) -> Self {
        Self {
            agent: Arc::new(agent),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            system_prompt: Arc::new(system_prompt),
        }
    }

    /// Fetch the session for a token, creating it on first use
    pub async fn session(&self, token: &str) -> Arc<Mutex<Session>> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(token.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Session::new(&self.system_prompt))))
            .clone()
    }
}
