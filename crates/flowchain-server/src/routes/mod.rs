use axum::Router;

use crate::state::AppState;

pub mod chat;

pub fn configure(state: AppState) -> Router {
    Router::new().merge(chat::routes(state))
}
