//! Release engine: upstream fetching, platform classification, caching, and
//! lookup over the per-platform release history.

pub mod cache;
pub mod fetcher;
pub mod github;
pub mod query;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::platform::PlatformIdentifier;

/// Full per-platform release history, rebuilt wholesale on each refresh.
///
/// Entries within a platform's list are ordered newest release first, the
/// order the upstream listing returns them.
pub type ReleaseHistory = BTreeMap<PlatformIdentifier, Vec<PlatformAsset>>;

/// One platform's projection of a release asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformAsset {
    /// Normalized semver version (leading `v` stripped from the tag).
    pub version: String,
    /// Publish timestamp as reported upstream (RFC 3339).
    pub date: String,
    /// Release notes body.
    pub notes: String,
    /// Public browser download URL.
    pub url: String,
    /// Authenticated content-fetch endpoint for the same asset.
    pub api_url: String,
    pub content_type: String,
    /// Size in megabytes, rounded to one decimal.
    pub size: f64,
    /// Squirrel delta-update index body. Only ever present on
    /// Windows-family entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub releases_index: Option<String>,
}
