use anyhow::Result;
use clap::Parser;

use flowchain::agent::Agent;
use flowchain::capabilities::standard_registry;
use flowchain::gateway::openai::OpenAiGateway;

mod repl;

#[derive(Parser)]
#[command(name = "flowchain", about = "Action recommendation assistant", version)]
struct Cli {
    /// Model to use, overrides OPENAI_MODEL
    #[arg(long)]
    model: Option<String>,

    /// API host to use, overrides OPENAI_HOST
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Flag overrides win over the environment; the api key always comes
    // from the environment.
    if let Some(model) = cli.model.as_deref() {
        std::env::set_var("OPENAI_MODEL", model);
    }
    if let Some(host) = cli.host.as_deref() {
        std::env::set_var("OPENAI_HOST", host);
    }
    let gateway = OpenAiGateway::from_env()?;
    let registry = standard_registry()?;
    let agent = Agent::new(Box::new(gateway), registry);

    repl::run(agent).await
}
