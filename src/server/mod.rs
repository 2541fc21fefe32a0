pub mod router;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{PaddockError, Result};
use crate::release::cache::ReleaseCache;
use crate::release::github::GithubClient;

/// Start the HTTP server with the given configuration.
pub async fn start(config: Config) -> Result<()> {
    let client = GithubClient::new(&config)?;
    let cache = Arc::new(ReleaseCache::new(Duration::from_secs(config.cache_ttl_secs)));
    tracing::info!(
        repository = %format!("{}/{}", config.account, config.repository),
        ttl_secs = config.cache_ttl_secs,
        "Serving releases"
    );

    let bind_addr = config.bind_address();
    let app_state = state::AppState::new(cache, client, Arc::new(config));

    let app = router::build(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| PaddockError::Server(format!("Failed to bind to {bind_addr}: {e}")))?;

    tracing::info!("Server listening on {bind_addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| PaddockError::Server(format!("Server error: {e}")))?;

    Ok(())
}
