//! Time-bounded release cache with stale-data fallback.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::release::fetcher;
use crate::release::github::GithubClient;
use crate::release::ReleaseHistory;

struct CacheState {
    live: Option<Arc<ReleaseHistory>>,
    backup: Option<Arc<ReleaseHistory>>,
    refreshed_at: Option<Instant>,
}

/// Dual-snapshot cache in front of the upstream fetcher.
///
/// A refresh that fails or comes back empty falls back to the last
/// known-good snapshot without stamping the refresh time, so every
/// subsequent call keeps retrying until upstream recovers. The state mutex
/// is held across the refresh itself: concurrent callers queue behind the
/// in-flight fetch and reuse its result instead of issuing their own
/// upstream calls.
pub struct ReleaseCache {
    state: Mutex<CacheState>,
    ttl: Duration,
}

impl ReleaseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState {
                live: None,
                backup: None,
                refreshed_at: None,
            }),
            ttl,
        }
    }

    /// Current per-platform history, refreshing from upstream when stale.
    ///
    /// `None` means no data has ever been fetched successfully and upstream
    /// is still unavailable.
    pub async fn get(&self, client: &GithubClient) -> Option<Arc<ReleaseHistory>> {
        self.get_with(|| fetcher::fetch_all(client)).await
    }

    /// Refresh seam: `fetch` runs under the state lock when the live
    /// snapshot is absent or older than the TTL.
    pub(crate) async fn get_with<F, Fut>(&self, fetch: F) -> Option<Arc<ReleaseHistory>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<ReleaseHistory>>,
    {
        let mut state = self.state.lock().await;

        if needs_refresh(&state, self.ttl) {
            match fetch().await {
                Some(history) if !history.is_empty() => {
                    let snapshot = Arc::new(history);
                    state.live = Some(Arc::clone(&snapshot));
                    state.backup = Some(snapshot);
                    state.refreshed_at = Some(Instant::now());
                }
                _ => {
                    tracing::warn!("Release refresh failed; serving backup snapshot if present");
                    state.live = state.backup.clone();
                }
            }
        }

        state.live.clone()
    }
}

fn needs_refresh(state: &CacheState, ttl: Duration) -> bool {
    match (&state.live, state.refreshed_at) {
        (Some(_), Some(refreshed_at)) => refreshed_at.elapsed() > ttl,
        _ => true,
    }
}
