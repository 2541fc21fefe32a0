pub mod latest;
pub mod serve;

use clap::{Parser, Subcommand};

/// A3S Paddock - release mirror and auto-update server
#[derive(Debug, Parser)]
#[command(name = "a3s-paddock", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host address to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Fetch the release feed once and print the latest version per platform
    Latest,
}
