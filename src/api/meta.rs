use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::{PaddockError, Result};
use crate::release::query;
use crate::server::state::AppState;

/// One row of the machine-readable latest listing.
#[derive(Debug, Serialize)]
pub struct LatestEntry {
    id: &'static str,
    platform: &'static str,
    os: &'static str,
    arch: &'static str,
    version: String,
    date: String,
    url: String,
    size: f64,
}

/// GET /api/semver - representative latest version tag.
pub async fn semver(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let history = state.history().await?;
    let latest = query::latest(&history);
    let version = latest.version.ok_or(PaddockError::NoData)?;
    Ok(Json(serde_json::json!({ "version": version })))
}

/// GET /api/latest - per-platform latest assets as JSON.
pub async fn latest(State(state): State<AppState>) -> Result<Json<Vec<LatestEntry>>> {
    let history = state.history().await?;
    let latest = query::latest(&history);

    let entries = latest
        .assets
        .into_iter()
        .map(|(id, asset)| LatestEntry {
            id: id.as_str(),
            platform: id.name(),
            os: id.os(),
            arch: id.arch(),
            version: asset.version,
            date: asset.date,
            url: asset.url,
            size: asset.size,
        })
        .collect();
    Ok(Json(entries))
}

/// GET /robots.txt - crawlers may index the listing pages.
pub async fn robots() -> impl IntoResponse {
    "User-agent: *\nDisallow:\n"
}
