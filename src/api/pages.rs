//! HTML pages: download overview, version listing, single version.
//!
//! Pure functions of already-computed cache data; the templates carry all
//! presentation.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use axum::extract::{Path, State};
use axum::response::Html;
use chrono::DateTime;
use handlebars::Handlebars;
use serde_json::json;

use crate::error::{PaddockError, Result};
use crate::platform::PlatformIdentifier;
use crate::release::query;
use crate::release::PlatformAsset;
use crate::server::state::AppState;

fn templates() -> &'static Handlebars<'static> {
    static TEMPLATES: OnceLock<Handlebars<'static>> = OnceLock::new();
    TEMPLATES.get_or_init(|| {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string("layout", include_str!("../../templates/layout.hbs"))
            .expect("layout template must parse");
        handlebars
            .register_template_string("home", include_str!("../../templates/home.hbs"))
            .expect("home template must parse");
        handlebars
            .register_template_string("versions", include_str!("../../templates/versions.hbs"))
            .expect("versions template must parse");
        handlebars
            .register_template_string("version", include_str!("../../templates/version.hbs"))
            .expect("version template must parse");
        handlebars
    })
}

fn render(name: &str, data: &serde_json::Value) -> Result<Html<String>> {
    let html = templates()
        .render(name, data)
        .map_err(|e| PaddockError::Server(format!("Template render failed: {e}")))?;
    Ok(Html(html))
}

/// GET / - download overview for the latest version.
pub async fn home(State(state): State<AppState>) -> Result<Html<String>> {
    let history = state.history().await?;
    let latest = query::latest(&history);

    let repo = format!("{}/{}", state.config.account, state.config.repository);
    render(
        "home",
        &json!({
            "repo": repo,
            "github": format!("https://github.com/{repo}"),
            "version": latest.version,
            "date": latest.date.as_deref().map(format_date),
            "files": file_rows(&latest.assets),
        }),
    )
}

/// GET /versions - every cached version, newest first.
pub async fn versions(State(state): State<AppState>) -> Result<Html<String>> {
    let history = state.history().await?;
    let summaries = query::versions(&history);

    let rows: Vec<serde_json::Value> = summaries
        .iter()
        .enumerate()
        .map(|(index, summary)| {
            json!({
                "version": summary.version,
                "date": format_date(&summary.date),
                "platform_count": summary.platforms.len(),
                "is_latest": index == 0,
            })
        })
        .collect();

    let repo = format!("{}/{}", state.config.account, state.config.repository);
    render("versions", &json!({ "repo": repo, "rows": rows }))
}

/// GET /versions/:version - download table for one version.
pub async fn version(
    State(state): State<AppState>,
    Path(version): Path<String>,
) -> Result<Html<String>> {
    let history = state.history().await?;
    let assets = query::version_assets(&history, &version);
    if assets.is_empty() {
        return Err(PaddockError::VersionNotFound(version));
    }

    let notes = assets
        .values()
        .next()
        .map(|asset| asset.notes.clone())
        .unwrap_or_default();

    let repo = format!("{}/{}", state.config.account, state.config.repository);
    render(
        "version",
        &json!({
            "repo": repo,
            "version": version.strip_prefix('v').unwrap_or(&version),
            "notes": notes,
            "files": file_rows(&assets),
        }),
    )
}

/// Table rows for a download table, sorted by display name.
fn file_rows(assets: &BTreeMap<PlatformIdentifier, PlatformAsset>) -> Vec<serde_json::Value> {
    let mut rows: Vec<(&'static str, serde_json::Value)> = assets
        .iter()
        .map(|(id, asset)| {
            let filename = asset.url.rsplit('/').next().unwrap_or_default();
            (
                id.name(),
                json!({
                    "id": id.as_str(),
                    "platform": id.name(),
                    "arch": id.arch(),
                    "ext": id.ext(),
                    "filename": filename,
                    "version": asset.version,
                    "size": asset.size,
                }),
            )
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    rows.into_iter().map(|(_, row)| row).collect()
}

/// Render an upstream RFC 3339 timestamp for humans; unparseable input is
/// shown as-is.
fn format_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(version: &str) -> PlatformAsset {
        PlatformAsset {
            version: version.to_string(),
            date: "2024-05-01T12:00:00Z".to_string(),
            notes: String::new(),
            url: format!("https://example.com/releases/app-{version}-darwin-arm64.zip"),
            api_url: "https://api.example.com/assets/1".to_string(),
            content_type: "application/zip".to_string(),
            size: 2.5,
            releases_index: None,
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-05-01T12:00:00Z"), "May 1, 2024");
        assert_eq!(format_date("garbage"), "garbage");
    }

    #[test]
    fn test_file_rows_sorted_by_display_name() {
        let mut assets = BTreeMap::new();
        assets.insert(PlatformIdentifier::Win32X64, asset("1.0.0"));
        assets.insert(PlatformIdentifier::DarwinArm64, asset("1.0.0"));

        let rows = file_rows(&assets);
        assert_eq!(rows[0]["platform"], "macOS Apple Silicon");
        assert_eq!(rows[1]["platform"], "Windows 64-bit");
        assert_eq!(rows[0]["filename"], "app-1.0.0-darwin-arm64.zip");
    }

    #[test]
    fn test_templates_parse() {
        // Force registration; a malformed template fails here rather than
        // on the first request.
        let _ = templates();
    }
}
