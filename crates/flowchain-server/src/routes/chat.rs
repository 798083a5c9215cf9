use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use flowchain::agent::TurnOutcome;
use flowchain::models::message::Message;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Transcripts are kept per session token; absent means the shared
    /// default session.
    #[serde(default = "default_session")]
    pub session: String,
}

fn default_session() -> String {
    "default".to_string()
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// `null` when the model produced no final text for the turn
    pub response: Option<String>,
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<serde_json::Value>)> {
    // The session lock is held across the turn: turns against the same
    // session never interleave, so transcripts stay well ordered. Other
    // sessions are not blocked by it.
    let session = state.session(&request.session).await;
    let mut session = session.lock().await;

    let outcome = state
        .agent
        .reply(&mut session, Message::user().with_text(&request.message))
        .await
        .map_err(|e| {
            tracing::error!(session = %request.session, error = %e, "turn failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            )
        })?;

    let response = match outcome {
        TurnOutcome::Answered(text) => Some(text),
        TurnOutcome::Empty => None,
    };
    Ok(Json(ChatResponse { response }))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .with_state(state)
}
