use clap::Parser;
use tracing_subscriber::EnvFilter;

use a3s_paddock::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            a3s_paddock::cli::serve::execute(host.as_deref(), port).await?;
        }
        Commands::Latest => {
            a3s_paddock::cli::latest::execute().await?;
        }
    }

    Ok(())
}
