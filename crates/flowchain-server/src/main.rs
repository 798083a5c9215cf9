use anyhow::Result;
use tower_http::cors::{Any, CorsLayer};

use flowchain::agent::Agent;
use flowchain::capabilities::standard_registry;
use flowchain::gateway::openai::OpenAiGateway;
use flowchain::prompt::system_prompt;

mod configuration;
mod error;
mod routes;
mod state;

use configuration::Settings;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let settings = Settings::new()?;
    let addr = settings.server.socket_addr()?;

    let gateway = OpenAiGateway::new(settings.gateway.into_config())?;
    let registry = standard_registry()?;
    let agent = Agent::new(Box::new(gateway), registry);
    let state = AppState::new(agent, system_prompt()?);

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any);

    let app = routes::configure(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
