//! Builds the per-platform release history from the upstream feed.

use std::collections::BTreeMap;

use futures::future::join_all;
use semver::Version;

use crate::platform::classify;
use crate::release::github::{GithubClient, GithubRelease};
use crate::release::{PlatformAsset, ReleaseHistory};

/// Reserved asset filename carrying the Squirrel delta-update index.
const INDEX_ASSET_NAME: &str = "RELEASES";

/// Fetch the release feed and build the complete per-platform history.
///
/// Every upstream failure is soft: the result is `None` and the cache layer
/// decides whether a backup snapshot can stand in. Nothing here returns an
/// error to callers.
pub async fn fetch_all(client: &GithubClient) -> Option<ReleaseHistory> {
    let releases = match client.list_releases().await {
        Ok(Some(releases)) => releases,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Release listing request failed: {e}");
            return None;
        }
    };

    let (mut history, indexes) = build_history(&releases);
    attach_indexes(client, &mut history, &indexes).await;
    Some(history)
}

/// Project the raw release list into per-platform history, collecting each
/// version's delta-index asset URL along the way.
///
/// Releases with a non-semver tag, drafts, and prereleases never enter the
/// history. Scanning is newest-first (the listing order); an asset that
/// collides with an existing (platform, version) entry replaces it, so the
/// most recently processed asset wins.
pub(crate) fn build_history(
    releases: &[GithubRelease],
) -> (ReleaseHistory, BTreeMap<String, String>) {
    let mut history = ReleaseHistory::new();
    let mut indexes = BTreeMap::new();

    for release in releases {
        let version = match parse_version(&release.tag_name) {
            Some(version) => version.to_string(),
            None => {
                tracing::debug!(tag = %release.tag_name, "Skipping release with non-semver tag");
                continue;
            }
        };
        if release.draft || release.prerelease {
            continue;
        }

        for asset in &release.assets {
            if asset.name == INDEX_ASSET_NAME {
                indexes.insert(version.clone(), asset.url.clone());
                continue;
            }

            let platforms = classify(&asset.name);
            if platforms.is_empty() {
                tracing::debug!(asset = %asset.name, "Dropping unclassifiable asset");
                continue;
            }

            for platform in platforms {
                let projected = PlatformAsset {
                    version: version.clone(),
                    date: release.published_at.clone().unwrap_or_default(),
                    notes: release.body.clone().unwrap_or_default(),
                    url: asset.browser_download_url.clone(),
                    api_url: asset.url.clone(),
                    content_type: asset.content_type.clone(),
                    size: round_megabytes(asset.size),
                    releases_index: None,
                };

                let entries = history.entry(platform).or_default();
                match entries.iter_mut().find(|e| e.version == projected.version) {
                    Some(existing) => *existing = projected,
                    None => entries.push(projected),
                }
            }
        }
    }

    (history, indexes)
}

/// Fetch delta-index bodies in parallel and attach them to Windows-family
/// entries of the matching version.
///
/// Each fetch fails independently: a version whose index cannot be fetched
/// is simply served without one, and the refresh as a whole proceeds.
async fn attach_indexes(
    client: &GithubClient,
    history: &mut ReleaseHistory,
    indexes: &BTreeMap<String, String>,
) {
    let wanted: Vec<(&String, &String)> = indexes
        .iter()
        .filter(|(version, _)| {
            history.iter().any(|(platform, entries)| {
                platform.is_windows() && entries.iter().any(|e| &e.version == *version)
            })
        })
        .collect();
    if wanted.is_empty() {
        return;
    }

    let fetches = wanted.into_iter().map(|(version, url)| async move {
        match client.fetch_index(url).await {
            Ok(body) => Some((version.clone(), body)),
            Err(e) => {
                tracing::warn!(version = %version, "Delta index fetch failed: {e}");
                None
            }
        }
    });

    let bodies: Vec<(String, String)> = join_all(fetches).await.into_iter().flatten().collect();
    attach_index_bodies(history, &bodies);
}

/// Attach fetched index bodies to the Windows-family entries of their
/// version. Entries of other platforms never carry an index.
fn attach_index_bodies(history: &mut ReleaseHistory, bodies: &[(String, String)]) {
    for (version, body) in bodies {
        for (platform, entries) in history.iter_mut() {
            if !platform.is_windows() {
                continue;
            }
            for entry in entries.iter_mut().filter(|e| &e.version == version) {
                entry.releases_index = Some(body.clone());
            }
        }
    }
}

/// Parse a release tag as semver, tolerating a leading `v`.
fn parse_version(tag: &str) -> Option<Version> {
    Version::parse(tag.strip_prefix('v').unwrap_or(tag)).ok()
}

/// Asset size in megabytes, rounded to one decimal.
fn round_megabytes(bytes: u64) -> f64 {
    (bytes as f64 / 1_000_000.0 * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformIdentifier;
    use crate::release::github::GithubAsset;

    fn asset(name: &str, size: u64) -> GithubAsset {
        GithubAsset {
            url: format!("https://api.example.com/assets/{name}"),
            name: name.to_string(),
            size,
            content_type: "application/octet-stream".to_string(),
            browser_download_url: format!("https://example.com/releases/{name}"),
        }
    }

    fn release(tag: &str, assets: Vec<GithubAsset>) -> GithubRelease {
        GithubRelease {
            name: Some(tag.to_string()),
            body: Some(format!("notes for {tag}")),
            draft: false,
            tag_name: tag.to_string(),
            prerelease: false,
            published_at: Some("2024-05-01T12:00:00Z".to_string()),
            assets,
        }
    }

    #[test]
    fn test_build_history_classifies_assets() {
        let releases = vec![release(
            "v1.2.3",
            vec![
                asset("app-1.2.3-darwin-arm64.zip", 2_500_000),
                asset("app-1.2.3-win32-x64-setup.exe", 80_000_000),
            ],
        )];

        let (history, indexes) = build_history(&releases);
        assert!(indexes.is_empty());

        let darwin = &history[&PlatformIdentifier::DarwinArm64];
        assert_eq!(darwin.len(), 1);
        assert_eq!(darwin[0].version, "1.2.3");
        assert_eq!(darwin[0].size, 2.5);
        assert_eq!(darwin[0].notes, "notes for v1.2.3");

        let windows = &history[&PlatformIdentifier::Win32X64];
        assert_eq!(windows[0].version, "1.2.3");
    }

    #[test]
    fn test_build_history_excludes_drafts_prereleases_and_bad_tags() {
        let mut draft = release("1.1.0", vec![asset("app-1.1.0-darwin-x64.zip", 1)]);
        draft.draft = true;
        let mut prerelease = release("1.2.0", vec![asset("app-1.2.0-darwin-x64.zip", 1)]);
        prerelease.prerelease = true;
        let bad_tag = release("not-a-version", vec![asset("app-darwin-x64.zip", 1)]);
        let stable = release("1.0.0", vec![asset("app-1.0.0-darwin-x64.zip", 1)]);

        let (history, _) = build_history(&[draft, prerelease, bad_tag, stable]);

        let darwin = &history[&PlatformIdentifier::DarwinX64];
        assert_eq!(darwin.len(), 1);
        assert_eq!(darwin[0].version, "1.0.0");
    }

    #[test]
    fn test_build_history_strips_v_prefix() {
        let releases = vec![release("v2.0.0", vec![asset("app-darwin-x64.zip", 1)])];
        let (history, _) = build_history(&releases);
        assert_eq!(history[&PlatformIdentifier::DarwinX64][0].version, "2.0.0");
    }

    #[test]
    fn test_build_history_collision_last_write_wins() {
        let releases = vec![release(
            "1.0.0",
            vec![
                asset("app-first-darwin-x64.zip", 1_000_000),
                asset("app-second-darwin-x64.zip", 2_000_000),
            ],
        )];

        let (history, _) = build_history(&releases);
        let darwin = &history[&PlatformIdentifier::DarwinX64];
        assert_eq!(darwin.len(), 1);
        assert!(darwin[0].url.contains("app-second"));
    }

    #[test]
    fn test_build_history_universal_asset_lands_on_both_macos_targets() {
        let releases = vec![release(
            "1.0.0",
            vec![asset("app-1.0.0-darwin-universal.zip", 1)],
        )];

        let (history, _) = build_history(&releases);
        assert!(history.contains_key(&PlatformIdentifier::DarwinArm64));
        assert!(history.contains_key(&PlatformIdentifier::DarwinX64));
    }

    #[test]
    fn test_build_history_collects_index_assets() {
        let releases = vec![release(
            "1.0.0",
            vec![
                asset("RELEASES", 1_000),
                asset("app-1.0.0-full.nupkg", 50_000_000),
            ],
        )];

        let (history, indexes) = build_history(&releases);
        assert_eq!(indexes.len(), 1);
        assert!(indexes["1.0.0"].contains("RELEASES"));
        // The index asset itself never lands in the history.
        assert_eq!(history.len(), 1);
        assert!(history.contains_key(&PlatformIdentifier::Nupkg));
    }

    #[test]
    fn test_build_history_keeps_multiple_versions_newest_first() {
        let releases = vec![
            release("1.2.0", vec![asset("app-1.2.0-darwin-x64.zip", 1)]),
            release("1.1.0", vec![asset("app-1.1.0-darwin-x64.zip", 1)]),
        ];

        let (history, _) = build_history(&releases);
        let darwin = &history[&PlatformIdentifier::DarwinX64];
        assert_eq!(darwin.len(), 2);
        assert_eq!(darwin[0].version, "1.2.0");
        assert_eq!(darwin[1].version, "1.1.0");
    }

    #[test]
    fn test_attach_index_bodies_scoped_to_windows_family() {
        let releases = vec![release(
            "1.0.0",
            vec![
                asset("app-1.0.0-darwin-x64.zip", 1),
                asset("app-1.0.0-win32-x64-setup.exe", 1),
                asset("app-1.0.0-full.nupkg", 1),
            ],
        )];
        let (mut history, _) = build_history(&releases);

        let bodies = vec![("1.0.0".to_string(), "HASH app-1.0.0-full.nupkg 123".to_string())];
        attach_index_bodies(&mut history, &bodies);

        assert!(history[&PlatformIdentifier::Win32X64][0].releases_index.is_some());
        assert!(history[&PlatformIdentifier::Nupkg][0].releases_index.is_some());
        assert!(history[&PlatformIdentifier::DarwinX64][0].releases_index.is_none());
    }

    #[test]
    fn test_attach_index_bodies_only_touches_matching_version() {
        let releases = vec![
            release("1.1.0", vec![asset("app-1.1.0-win32-x64-setup.exe", 1)]),
            release("1.0.0", vec![asset("app-1.0.0-win32-x64-setup.exe", 1)]),
        ];
        let (mut history, _) = build_history(&releases);

        let bodies = vec![("1.0.0".to_string(), "HASH app-1.0.0-full.nupkg 123".to_string())];
        attach_index_bodies(&mut history, &bodies);

        let windows = &history[&PlatformIdentifier::Win32X64];
        assert!(windows[0].releases_index.is_none());
        assert!(windows[1].releases_index.is_some());
    }

    #[test]
    fn test_round_megabytes() {
        assert_eq!(round_megabytes(2_500_000), 2.5);
        assert_eq!(round_megabytes(1_230_000), 1.2);
        assert_eq!(round_megabytes(1_250_000), 1.3);
        assert_eq!(round_megabytes(0), 0.0);
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_version("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_version("not-a-version"), None);
        assert_eq!(parse_version(""), None);
    }
}
