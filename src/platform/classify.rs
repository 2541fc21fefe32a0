//! Asset filename classification and request-token resolution.

use crate::platform::{compiled_patterns, PlatformIdentifier};

/// Normalize a filename or request token for matching: lowercase, `_` → `-`.
fn normalize(input: &str) -> String {
    input.to_lowercase().replace('_', "-")
}

/// Classify an asset filename into every platform it satisfies.
///
/// Returns matches in taxonomy order; a universal macOS build legitimately
/// matches both the arm64 and x64 identifiers. Filenames with no
/// architecture marker at all are retried with `-x64` inserted before the
/// extension, which is how older releases named their x64 artifacts. An
/// empty result means the asset is unclassifiable and should be dropped.
pub fn classify(filename: &str) -> Vec<PlatformIdentifier> {
    let normalized = normalize(filename);
    let matches = classify_normalized(&normalized);
    if !matches.is_empty() {
        return matches;
    }

    match with_default_arch(&normalized) {
        Some(fallback) => classify_normalized(&fallback),
        None => Vec::new(),
    }
}

fn classify_normalized(name: &str) -> Vec<PlatformIdentifier> {
    let mut matches = Vec::new();
    for (id, patterns) in compiled_patterns() {
        if patterns.iter().any(|p| p.is_match(name)) {
            matches.push(*id);
        }
    }
    matches
}

/// Insert an `-x64` architecture marker immediately before the extension.
fn with_default_arch(name: &str) -> Option<String> {
    let dot = name.rfind('.')?;
    if dot == 0 {
        return None;
    }
    Some(format!("{}-x64{}", &name[..dot], &name[dot..]))
}

/// Resolve a user-supplied platform token to a canonical identifier.
///
/// Accepts the canonical name or any registered alias, after the same
/// normalization as filenames. `None` is a client-input condition, not a
/// server fault.
pub fn resolve_request(token: &str) -> Option<PlatformIdentifier> {
    let normalized = normalize(token);
    PlatformIdentifier::ALL.into_iter().find(|id| {
        id.as_str() == normalized || id.aliases().contains(&normalized.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformIdentifier::*;

    #[test]
    fn test_classify_arch_tagged_names() {
        assert_eq!(classify("app-1.2.3-darwin-arm64.zip"), vec![DarwinArm64]);
        assert_eq!(classify("app-1.2.3-darwin-x64.zip"), vec![DarwinX64]);
        assert_eq!(classify("app-1.2.3-win32-x64-setup.exe"), vec![Win32X64]);
        assert_eq!(classify("app-1.2.3-win32-ia32-setup.exe"), vec![Win32Ia32]);
        assert_eq!(classify("app-1.2.3-full.nupkg"), vec![Nupkg]);
        assert_eq!(classify("app-1.2.3-mac-arm64.dmg"), vec![DmgArm64]);
    }

    #[test]
    fn test_classify_linux_packages() {
        assert_eq!(classify("app_1.2.3_amd64.deb"), vec![DebX64]);
        assert_eq!(classify("app_1.2.3_arm64.deb"), vec![DebArm64]);
        assert_eq!(classify("app-1.2.3.aarch64.rpm"), vec![RpmArm64]);
        assert_eq!(classify("app-1.2.3.x86_64.rpm"), vec![RpmX64]);
        assert_eq!(classify("app-1.2.3-armv7l.AppImage"), vec![AppimageArm]);
        assert_eq!(classify("app_1.2.3_amd64.snap"), vec![SnapX64]);
    }

    #[test]
    fn test_classify_universal_matches_both_macos_targets() {
        assert_eq!(
            classify("app-1.2.3-darwin-universal.zip"),
            vec![DarwinArm64, DarwinX64]
        );
        assert_eq!(
            classify("app-1.2.3-mac-universal.dmg"),
            vec![DmgArm64, DmgX64]
        );
    }

    #[test]
    fn test_classify_case_and_separator_insensitive() {
        assert_eq!(classify("App-1.2.3-Darwin_ARM64.ZIP"), vec![DarwinArm64]);
        assert_eq!(classify("APP_1.2.3_WIN32_X64.EXE"), vec![Win32X64]);
    }

    #[test]
    fn test_classify_missing_arch_falls_back_to_x64() {
        // Older releases did not tag the architecture; they were x64 builds.
        assert_eq!(classify("app-1.2.3-darwin.zip"), vec![DarwinX64]);
        assert_eq!(classify("app-1.2.3-win32.exe"), vec![Win32X64]);
    }

    #[test]
    fn test_classify_unmatchable_is_empty() {
        assert!(classify("SHASUMS256.txt").is_empty());
        assert!(classify("app-1.2.3-source.tar.gz").is_empty());
        assert!(classify("RELEASES").is_empty());
    }

    #[test]
    fn test_every_registered_pattern_shape_classifies() {
        // One representative filename per platform, shaped after its first
        // registered pattern.
        let cases = [
            ("app-darwin-arm64.dmg", DmgArm64),
            ("app-darwin-x64.dmg", DmgX64),
            ("app-darwin-arm64.zip", DarwinArm64),
            ("app-darwin-x64.zip", DarwinX64),
            ("app-win32-ia32.exe", Win32Ia32),
            ("app-win32-arm64.exe", Win32Arm64),
            ("app-win32-x64.exe", Win32X64),
            ("app-full.nupkg", Nupkg),
            ("app-arm64.appimage", AppimageArm64),
            ("app-x64.appimage", AppimageX64),
            ("app-armhf.appimage", AppimageArm),
            ("app-arm64.deb", DebArm64),
            ("app-x64.deb", DebX64),
            ("app-armhf.deb", DebArm),
            ("app-arm64.rpm", RpmArm64),
            ("app-x64.rpm", RpmX64),
            ("app-armhf.rpm", RpmArm),
            ("app-arm64.snap", SnapArm64),
            ("app-x64.snap", SnapX64),
            ("app-armhf.snap", SnapArm),
        ];
        for (filename, expected) in cases {
            assert!(
                classify(filename).contains(&expected),
                "{filename} should classify as {expected}"
            );
        }
    }

    #[test]
    fn test_resolve_canonical_names() {
        for id in PlatformIdentifier::ALL {
            assert_eq!(resolve_request(id.as_str()), Some(id));
        }
    }

    #[test]
    fn test_resolve_aliases() {
        assert_eq!(resolve_request("mac"), Some(DarwinX64));
        assert_eq!(resolve_request("macos-arm64"), Some(DarwinArm64));
        assert_eq!(resolve_request("exe"), Some(Win32X64));
        assert_eq!(resolve_request("windows"), Some(Win32X64));
        assert_eq!(resolve_request("x86"), Some(Win32Ia32));
        assert_eq!(resolve_request("debian"), Some(DebX64));
        assert_eq!(resolve_request("fedora"), Some(RpmX64));
        assert_eq!(resolve_request("linux"), Some(AppimageX64));
        assert_eq!(resolve_request("snap"), Some(SnapX64));
    }

    #[test]
    fn test_resolve_normalizes_case_and_separators() {
        assert_eq!(resolve_request("Darwin_ARM64"), Some(DarwinArm64));
        assert_eq!(resolve_request("darwin-arm64"), Some(DarwinArm64));
        assert_eq!(resolve_request("darwin_arm64"), Some(DarwinArm64));
    }

    #[test]
    fn test_resolve_unknown_token() {
        assert_eq!(resolve_request("freebsd"), None);
        assert_eq!(resolve_request(""), None);
    }
}
