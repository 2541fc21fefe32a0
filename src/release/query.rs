//! Lookup façade over the cached history: latest-per-platform, per-version
//! views, and delta-index URL rewriting.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use semver::Version;
use serde::Serialize;

use crate::platform::PlatformIdentifier;
use crate::release::{PlatformAsset, ReleaseHistory};

/// Computed "latest per platform" view plus representative display fields.
#[derive(Debug, Clone, Serialize)]
pub struct LatestReleases {
    /// Highest-semver entry for each platform that has one.
    pub assets: BTreeMap<PlatformIdentifier, PlatformAsset>,
    pub platforms: Vec<PlatformIdentifier>,
    /// Version of the first platform present in taxonomy order. Display
    /// convenience only; individual platforms may lag behind.
    pub version: Option<String>,
    pub date: Option<String>,
}

/// Per-version roll-up of the whole history, newest version first.
#[derive(Debug, Clone, Serialize)]
pub struct VersionSummary {
    pub version: String,
    pub date: String,
    pub notes: String,
    pub platforms: Vec<PlatformIdentifier>,
}

/// Compute the highest-semver entry per platform.
pub fn latest(history: &ReleaseHistory) -> LatestReleases {
    let mut assets = BTreeMap::new();
    for (platform, entries) in history {
        if let Some(best) = best_entry(entries) {
            assets.insert(*platform, best.clone());
        }
    }

    let platforms: Vec<PlatformIdentifier> = assets.keys().copied().collect();
    let representative = assets.values().next();
    LatestReleases {
        version: representative.map(|a| a.version.clone()),
        date: representative.map(|a| a.date.clone()),
        platforms,
        assets,
    }
}

/// The highest-semver entry for one platform, if it has any.
pub fn latest_for(
    history: &ReleaseHistory,
    platform: PlatformIdentifier,
) -> Option<&PlatformAsset> {
    best_entry(history.get(&platform)?)
}

/// Exact-match version lookup within one platform's history.
pub fn version<'a>(
    history: &'a ReleaseHistory,
    platform: PlatformIdentifier,
    version: &str,
) -> Option<&'a PlatformAsset> {
    let wanted = version.strip_prefix('v').unwrap_or(version);
    history.get(&platform)?.iter().find(|e| e.version == wanted)
}

/// Every platform's entry for one version.
pub fn version_assets(
    history: &ReleaseHistory,
    wanted: &str,
) -> BTreeMap<PlatformIdentifier, PlatformAsset> {
    let wanted = wanted.strip_prefix('v').unwrap_or(wanted);
    let mut assets = BTreeMap::new();
    for (platform, entries) in history {
        if let Some(entry) = entries.iter().find(|e| e.version == wanted) {
            assets.insert(*platform, entry.clone());
        }
    }
    assets
}

/// Roll the history up by version, newest first.
pub fn versions(history: &ReleaseHistory) -> Vec<VersionSummary> {
    let mut by_version: BTreeMap<Version, VersionSummary> = BTreeMap::new();
    for (platform, entries) in history {
        for entry in entries {
            let Ok(parsed) = Version::parse(&entry.version) else {
                continue;
            };
            by_version
                .entry(parsed)
                .or_insert_with(|| VersionSummary {
                    version: entry.version.clone(),
                    date: entry.date.clone(),
                    notes: entry.notes.clone(),
                    platforms: Vec::new(),
                })
                .platforms
                .push(*platform);
        }
    }
    by_version.into_values().rev().collect()
}

/// Rewrite delta-package URLs inside a Squirrel RELEASES body so clients
/// pull packages through this server's download proxy instead of upstream.
///
/// `base_url` must end with a slash. Lines look like
/// `<sha1> <name>.nupkg <size>`; hash and size pass through untouched.
pub fn patch_releases_index(body: &str, base_url: &str) -> String {
    static LINE: OnceLock<Regex> = OnceLock::new();
    let line = LINE.get_or_init(|| {
        Regex::new(r"([A-Fa-f0-9]+)\s([^\s]+\.nupkg)\s(\d+)")
            .expect("releases line pattern must compile")
    });
    line.replace_all(body, format!("$1 {base_url}download/nupkg/$2 $3").as_str())
        .into_owned()
}

fn best_entry(entries: &[PlatformAsset]) -> Option<&PlatformAsset> {
    entries
        .iter()
        .filter_map(|e| Version::parse(&e.version).ok().map(|v| (v, e)))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, e)| e)
}
