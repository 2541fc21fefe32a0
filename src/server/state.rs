use std::sync::Arc;

use crate::config::Config;
use crate::error::{PaddockError, Result};
use crate::release::cache::ReleaseCache;
use crate::release::github::GithubClient;
use crate::release::ReleaseHistory;

/// Shared application state accessible to all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ReleaseCache>,
    pub client: GithubClient,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(cache: Arc<ReleaseCache>, client: GithubClient, config: Arc<Config>) -> Self {
        Self {
            cache,
            client,
            config,
        }
    }

    /// Current release history, refreshed through the cache.
    ///
    /// `NoData` here means the very first fetch has never succeeded and
    /// upstream is still down; handlers surface it as 503.
    pub async fn history(&self) -> Result<Arc<ReleaseHistory>> {
        self.cache
            .get(&self.client)
            .await
            .ok_or(PaddockError::NoData)
    }
}
