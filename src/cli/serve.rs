use crate::config::Config;
use crate::error::Result;
use crate::server;

/// Execute the `serve` command: start the HTTP server.
pub async fn execute(host: Option<&str>, port: Option<u16>) -> Result<()> {
    let mut config = Config::load()?;

    // CLI arguments win over the config file
    if let Some(host) = host {
        config.host = host.to_string();
    }
    if let Some(port) = port {
        config.port = port;
    }

    println!(
        "Serving releases of {}/{} on http://{}",
        config.account,
        config.repository,
        config.bind_address()
    );
    println!("Press Ctrl+C to stop");

    server::start(config).await
}
