use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::{PaddockError, Result};
use crate::platform::resolve_request;
use crate::release::query;
use crate::server::state::AppState;

/// GET /download/:platform - redirect to the newest asset for a platform.
pub async fn latest(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Result<Response> {
    redirect_latest(&state, &platform).await
}

/// GET /download/:platform/:file - same resolution; the file segment exists
/// so rewritten delta-index URLs have somewhere to point, the lookup itself
/// is by platform.
pub async fn file(
    State(state): State<AppState>,
    Path((platform, _file)): Path<(String, String)>,
) -> Result<Response> {
    redirect_latest(&state, &platform).await
}

async fn redirect_latest(state: &AppState, platform: &str) -> Result<Response> {
    let history = state.history().await?;
    let id = resolve_request(platform)
        .ok_or_else(|| PaddockError::UnknownPlatform(platform.to_string()))?;
    let asset = query::latest_for(&history, id)
        .ok_or_else(|| PaddockError::NoRelease(id.to_string()))?;

    // The asset content endpoint replies with a redirect to storage; forward
    // that target. Without a Location the public URL stands in.
    let location = match state.client.resolve_download(&asset.api_url).await {
        Ok(Some(location)) => location,
        Ok(None) => asset.url.clone(),
        Err(e) => {
            tracing::warn!(platform = %id, "Download resolution failed: {e}");
            asset.url.clone()
        }
    };

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
