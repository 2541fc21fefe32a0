//! GitHub release-listing API: wire types and a thin authenticated client.

use std::time::Duration;

use reqwest::header;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Config;
use crate::error::Result;

/// One release as returned by the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubRelease {
    pub name: Option<String>,
    pub body: Option<String>,
    pub draft: bool,
    pub tag_name: String,
    pub prerelease: bool,
    pub published_at: Option<String>,
    #[serde(default)]
    pub assets: Vec<GithubAsset>,
}

/// A single downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubAsset {
    /// Authenticated content-fetch endpoint.
    pub url: String,
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub browser_download_url: String,
}

/// Thin client over the GitHub REST endpoints the server needs.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    http_no_redirect: reqwest::Client,
    account: String,
    repository: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let http = reqwest::Client::builder()
            .user_agent(concat!("a3s-paddock/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        let http_no_redirect = reqwest::Client::builder()
            .user_agent(concat!("a3s-paddock/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            http_no_redirect,
            account: config.account.clone(),
            repository: config.repository.clone(),
            token: config.token.clone(),
        })
    }

    /// List the most recent releases, one page of up to 100.
    ///
    /// Repositories with a longer history are served from the newest 100
    /// releases only; this is a documented scale limit, not pagination left
    /// for later. `Ok(None)` means upstream declined (rate limit or any
    /// other non-success status) and the caller should fall back.
    pub async fn list_releases(&self) -> Result<Option<Vec<GithubRelease>>> {
        let url = format!(
            "https://api.github.com/repos/{}/{}/releases?per_page=100",
            urlencoding::encode(&self.account),
            urlencoding::encode(&self.repository),
        );

        let mut request = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/vnd.github.preview");
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("token {token}"));
        }

        let response = request.send().await?;
        if response.status() == StatusCode::FORBIDDEN {
            tracing::warn!("GitHub rate limit hit while listing releases");
            return Ok(None);
        }
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "GitHub release listing failed");
            return Ok(None);
        }

        Ok(Some(response.json().await?))
    }

    /// Fetch the text body of a delta-update index asset.
    pub async fn fetch_index(&self, asset_url: &str) -> Result<String> {
        let mut request = self
            .http
            .get(asset_url)
            .header(header::ACCEPT, "application/octet-stream");
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Resolve the storage location an asset's content endpoint redirects
    /// to, without following the redirect, so downloads can be proxied with
    /// a plain 302.
    pub async fn resolve_download(&self, asset_url: &str) -> Result<Option<String>> {
        let mut request = self
            .http_no_redirect
            .get(asset_url)
            .header(header::ACCEPT, "application/octet-stream");
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        Ok(location)
    }
}
