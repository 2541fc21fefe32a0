use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use semver::Version;
use serde::Serialize;

use crate::api::base_url;
use crate::error::{PaddockError, Result};
use crate::platform::{resolve_request, PlatformIdentifier};
use crate::release::query;
use crate::server::state::AppState;

/// Body served to Electron's autoUpdater when an update is available.
#[derive(Debug, Serialize)]
struct UpdateResponse {
    url: String,
    name: String,
    notes: String,
    pub_date: String,
}

/// GET /update/:platform/:version - update check for Electron's autoUpdater.
///
/// 204 when the client already runs the served version; otherwise a JSON
/// descriptor pointing at this server's download proxy. A client ahead of
/// the served version is told to "update" too, which downgrades it back onto
/// the release channel.
pub async fn check(
    State(state): State<AppState>,
    Path((platform, version)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response> {
    let (id, client_version) = parse_params(&platform, &version)?;
    respond(&state, id, client_version, &headers).await
}

/// GET /update/:platform/:version/:file - as above, except a trailing
/// `RELEASES` segment serves the patched Squirrel delta index.
pub async fn file(
    State(state): State<AppState>,
    Path((platform, version, file)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Response> {
    let (id, client_version) = parse_params(&platform, &version)?;

    if !file.eq_ignore_ascii_case("RELEASES") {
        return respond(&state, id, client_version, &headers).await;
    }

    let history = state.history().await?;
    let asset = query::latest_for(&history, id)
        .ok_or_else(|| PaddockError::NoRelease(id.to_string()))?;

    let Some(index) = &asset.releases_index else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };
    let patched = query::patch_releases_index(index, &base_url(&headers));

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        patched,
    )
        .into_response())
}

fn parse_params(platform: &str, version: &str) -> Result<(PlatformIdentifier, Version)> {
    let id = resolve_request(platform)
        .ok_or_else(|| PaddockError::UnknownPlatform(platform.to_string()))?;
    let parsed = Version::parse(version.strip_prefix('v').unwrap_or(version))
        .map_err(|_| PaddockError::InvalidVersion(version.to_string()))?;
    Ok((id, parsed))
}

async fn respond(
    state: &AppState,
    id: PlatformIdentifier,
    client_version: Version,
    headers: &HeaderMap,
) -> Result<Response> {
    let history = state.history().await?;
    let asset = query::latest_for(&history, id)
        .ok_or_else(|| PaddockError::NoRelease(id.to_string()))?;

    let served_version = Version::parse(&asset.version)
        .map_err(|_| PaddockError::Server(format!("Cached non-semver version {}", asset.version)))?;
    if client_version == served_version {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let response = UpdateResponse {
        url: format!("{}download/{}", base_url(headers), id),
        name: asset.version.clone(),
        notes: asset.notes.clone(),
        pub_date: asset.date.clone(),
    };
    Ok(Json(response).into_response())
}
