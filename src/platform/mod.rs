//! Platform taxonomy: the closed set of download targets the server knows
//! how to classify and serve.

pub mod classify;

pub use classify::{classify, resolve_request};

use std::sync::OnceLock;

use regex::Regex;

/// Canonical identifier for one supported download target: OS, architecture,
/// and packaging format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlatformIdentifier {
    DmgArm64,
    DmgX64,
    DarwinArm64,
    DarwinX64,
    Win32Ia32,
    Win32Arm64,
    Win32X64,
    Nupkg,
    AppimageArm64,
    AppimageX64,
    AppimageArm,
    DebArm64,
    DebX64,
    DebArm,
    RpmArm64,
    RpmX64,
    RpmArm,
    SnapArm64,
    SnapX64,
    SnapArm,
}

/// Static metadata for one platform identifier.
struct PlatformMeta {
    name: &'static str,
    os: &'static str,
    arch: &'static str,
    ext: &'static str,
    aliases: &'static [&'static str],
    patterns: &'static [&'static str],
}

impl PlatformIdentifier {
    /// Every identifier, in filename-matching priority order: arch-tagged
    /// patterns must be tried before the generic fallbacks that would
    /// otherwise shadow them.
    pub const ALL: [PlatformIdentifier; 20] = [
        PlatformIdentifier::DmgArm64,
        PlatformIdentifier::DmgX64,
        PlatformIdentifier::DarwinArm64,
        PlatformIdentifier::DarwinX64,
        PlatformIdentifier::Win32Ia32,
        PlatformIdentifier::Win32Arm64,
        PlatformIdentifier::Win32X64,
        PlatformIdentifier::Nupkg,
        PlatformIdentifier::AppimageArm64,
        PlatformIdentifier::AppimageX64,
        PlatformIdentifier::AppimageArm,
        PlatformIdentifier::DebArm64,
        PlatformIdentifier::DebX64,
        PlatformIdentifier::DebArm,
        PlatformIdentifier::RpmArm64,
        PlatformIdentifier::RpmX64,
        PlatformIdentifier::RpmArm,
        PlatformIdentifier::SnapArm64,
        PlatformIdentifier::SnapX64,
        PlatformIdentifier::SnapArm,
    ];

    /// Canonical string form, used in URLs and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformIdentifier::DmgArm64 => "dmg-arm64",
            PlatformIdentifier::DmgX64 => "dmg-x64",
            PlatformIdentifier::DarwinArm64 => "darwin-arm64",
            PlatformIdentifier::DarwinX64 => "darwin-x64",
            PlatformIdentifier::Win32Ia32 => "win32-ia32",
            PlatformIdentifier::Win32Arm64 => "win32-arm64",
            PlatformIdentifier::Win32X64 => "win32-x64",
            PlatformIdentifier::Nupkg => "nupkg",
            PlatformIdentifier::AppimageArm64 => "appimage-arm64",
            PlatformIdentifier::AppimageX64 => "appimage-x64",
            PlatformIdentifier::AppimageArm => "appimage-arm",
            PlatformIdentifier::DebArm64 => "deb-arm64",
            PlatformIdentifier::DebX64 => "deb-x64",
            PlatformIdentifier::DebArm => "deb-arm",
            PlatformIdentifier::RpmArm64 => "rpm-arm64",
            PlatformIdentifier::RpmX64 => "rpm-x64",
            PlatformIdentifier::RpmArm => "rpm-arm",
            PlatformIdentifier::SnapArm64 => "snap-arm64",
            PlatformIdentifier::SnapX64 => "snap-x64",
            PlatformIdentifier::SnapArm => "snap-arm",
        }
    }

    fn meta(self) -> PlatformMeta {
        match self {
            PlatformIdentifier::DmgArm64 => PlatformMeta {
                name: "macOS Apple Silicon",
                os: "darwin",
                arch: "arm64",
                ext: "dmg",
                aliases: &["dmg-arm64"],
                patterns: &[
                    r".*darwin.*arm64.*\.dmg$",
                    r".*mac.*arm64.*\.dmg$",
                    r".*osx.*arm64.*\.dmg$",
                    r".*darwin.*universal.*\.dmg$",
                    r".*mac.*universal.*\.dmg$",
                    r".*osx.*universal.*\.dmg$",
                ],
            },
            PlatformIdentifier::DmgX64 => PlatformMeta {
                name: "macOS Intel",
                os: "darwin",
                arch: "x64",
                ext: "dmg",
                aliases: &["dmg"],
                patterns: &[
                    r".*darwin.*x64.*\.dmg$",
                    r".*mac.*x64.*\.dmg$",
                    r".*osx.*x64.*\.dmg$",
                    r".*darwin.*universal.*\.dmg$",
                    r".*mac.*universal.*\.dmg$",
                    r".*osx.*universal.*\.dmg$",
                ],
            },
            PlatformIdentifier::DarwinArm64 => PlatformMeta {
                name: "macOS Apple Silicon",
                os: "darwin",
                arch: "arm64",
                ext: "zip",
                aliases: &["darwin-arm64", "mac-arm64", "macos-arm64", "osx-arm64"],
                patterns: &[
                    r".*darwin.*arm64.*\.zip$",
                    r".*mac.*arm64.*\.zip$",
                    r".*osx.*arm64.*\.zip$",
                    r".*darwin.*universal.*\.zip$",
                    r".*mac.*universal.*\.zip$",
                    r".*osx.*universal.*\.zip$",
                ],
            },
            PlatformIdentifier::DarwinX64 => PlatformMeta {
                name: "macOS Intel",
                os: "darwin",
                arch: "x64",
                ext: "zip",
                aliases: &["darwin", "mac", "macos", "osx"],
                patterns: &[
                    r".*darwin.*x64.*\.zip$",
                    r".*mac.*x64.*\.zip$",
                    r".*osx.*x64.*\.zip$",
                    r".*darwin.*universal.*\.zip$",
                    r".*mac.*universal.*\.zip$",
                    r".*osx.*universal.*\.zip$",
                ],
            },
            PlatformIdentifier::Win32Ia32 => PlatformMeta {
                name: "Windows 32-bit",
                os: "win32",
                arch: "ia32",
                ext: "exe",
                aliases: &["x86"],
                patterns: &[r".*win32.*ia32.*\.exe$"],
            },
            PlatformIdentifier::Win32Arm64 => PlatformMeta {
                name: "Windows ARM",
                os: "win32",
                arch: "arm64",
                ext: "exe",
                aliases: &[],
                patterns: &[r".*win32.*arm64.*\.exe$"],
            },
            PlatformIdentifier::Win32X64 => PlatformMeta {
                name: "Windows 64-bit",
                os: "win32",
                arch: "x64",
                ext: "exe",
                aliases: &["exe", "win", "win32", "windows", "win64", "x64"],
                patterns: &[r".*win32.*x64.*\.exe$"],
            },
            PlatformIdentifier::Nupkg => PlatformMeta {
                name: "Windows Update",
                os: "win32",
                arch: "x64",
                ext: "nupkg",
                aliases: &[],
                patterns: &[r".*\.nupkg$"],
            },
            PlatformIdentifier::AppimageArm64 => PlatformMeta {
                name: "Linux aarch64",
                os: "linux",
                arch: "arm64",
                ext: "AppImage",
                aliases: &["appimage-arm64", "linux-arm64"],
                patterns: &[r".*arm64.*\.appimage$", r".*aarch64.*\.appimage$"],
            },
            PlatformIdentifier::AppimageX64 => PlatformMeta {
                name: "Linux x86_64",
                os: "linux",
                arch: "x64",
                ext: "AppImage",
                aliases: &["appimage", "linux"],
                patterns: &[
                    r".*x64.*\.appimage$",
                    r".*amd64.*\.appimage$",
                    r".*x86-64.*\.appimage$",
                ],
            },
            PlatformIdentifier::AppimageArm => PlatformMeta {
                name: "Linux armhf",
                os: "linux",
                arch: "arm",
                ext: "AppImage",
                aliases: &["appimage-armhf"],
                patterns: &[
                    r".*armhf.*\.appimage$",
                    r".*armv7l.*\.appimage$",
                    r".*armv7hl.*\.appimage$",
                ],
            },
            PlatformIdentifier::DebArm64 => PlatformMeta {
                name: "Debian aarch64",
                os: "linux",
                arch: "arm64",
                ext: "deb",
                aliases: &["deb-arm64", "debian-arm64"],
                patterns: &[r".*arm64.*\.deb$", r".*aarch64.*\.deb$"],
            },
            PlatformIdentifier::DebX64 => PlatformMeta {
                name: "Debian x86_64",
                os: "linux",
                arch: "x64",
                ext: "deb",
                aliases: &["deb", "debian"],
                patterns: &[
                    r".*x64.*\.deb$",
                    r".*amd64.*\.deb$",
                    r".*x86-64.*\.deb$",
                ],
            },
            PlatformIdentifier::DebArm => PlatformMeta {
                name: "Debian armhf",
                os: "linux",
                arch: "arm",
                ext: "deb",
                aliases: &["deb-armhf", "debian-armhf"],
                patterns: &[
                    r".*armhf.*\.deb$",
                    r".*armv7l.*\.deb$",
                    r".*armv7hl.*\.deb$",
                ],
            },
            PlatformIdentifier::RpmArm64 => PlatformMeta {
                name: "Fedora aarch64",
                os: "linux",
                arch: "arm64",
                ext: "rpm",
                aliases: &["rpm-arm64"],
                patterns: &[r".*arm64.*\.rpm$", r".*aarch64.*\.rpm$"],
            },
            PlatformIdentifier::RpmX64 => PlatformMeta {
                name: "Fedora x86_64",
                os: "linux",
                arch: "x64",
                ext: "rpm",
                aliases: &["fedora", "rpm"],
                patterns: &[
                    r".*x64.*\.rpm$",
                    r".*amd64.*\.rpm$",
                    r".*x86-64.*\.rpm$",
                ],
            },
            PlatformIdentifier::RpmArm => PlatformMeta {
                name: "Fedora armhf",
                os: "linux",
                arch: "arm",
                ext: "rpm",
                aliases: &["rpm-armhf"],
                patterns: &[
                    r".*armhf.*\.rpm$",
                    r".*armv7l.*\.rpm$",
                    r".*armv7hl.*\.rpm$",
                ],
            },
            PlatformIdentifier::SnapArm64 => PlatformMeta {
                name: "Linux aarch64",
                os: "linux",
                arch: "arm64",
                ext: "snap",
                aliases: &["snap-arm64"],
                patterns: &[r".*arm64.*\.snap$", r".*aarch64.*\.snap$"],
            },
            PlatformIdentifier::SnapX64 => PlatformMeta {
                name: "Linux x86_64",
                os: "linux",
                arch: "x64",
                ext: "snap",
                aliases: &["snap"],
                patterns: &[
                    r".*x64.*\.snap$",
                    r".*amd64.*\.snap$",
                    r".*x86-64.*\.snap$",
                ],
            },
            PlatformIdentifier::SnapArm => PlatformMeta {
                name: "Linux armhf",
                os: "linux",
                arch: "arm",
                ext: "snap",
                aliases: &["snap-armhf"],
                patterns: &[
                    r".*armhf.*\.snap$",
                    r".*armv7l.*\.snap$",
                    r".*armv7hl.*\.snap$",
                ],
            },
        }
    }

    /// Human display name (e.g. "macOS Apple Silicon").
    pub fn name(self) -> &'static str {
        self.meta().name
    }

    /// Operating system family: "darwin", "win32", or "linux".
    pub fn os(self) -> &'static str {
        self.meta().os
    }

    /// CPU architecture: "x64", "arm64", "ia32", or "arm".
    pub fn arch(self) -> &'static str {
        self.meta().arch
    }

    /// Canonical file extension for this packaging format.
    pub fn ext(self) -> &'static str {
        self.meta().ext
    }

    /// Request tokens accepted as shorthand for this platform.
    pub fn aliases(self) -> &'static [&'static str] {
        self.meta().aliases
    }

    /// Whether this platform belongs to the Windows/Squirrel family that
    /// consumes RELEASES delta indexes.
    pub fn is_windows(self) -> bool {
        matches!(
            self,
            PlatformIdentifier::Win32Ia32
                | PlatformIdentifier::Win32Arm64
                | PlatformIdentifier::Win32X64
                | PlatformIdentifier::Nupkg
        )
    }
}

impl std::fmt::Display for PlatformIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for PlatformIdentifier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Filename patterns for every platform, compiled once and cached.
///
/// Patterns are matched against normalized filenames (lowercase, `_` → `-`),
/// so they are written in that form.
pub fn compiled_patterns() -> &'static [(PlatformIdentifier, Vec<Regex>)] {
    static PATTERNS: OnceLock<Vec<(PlatformIdentifier, Vec<Regex>)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        PlatformIdentifier::ALL
            .iter()
            .map(|&id| {
                let patterns = id
                    .meta()
                    .patterns
                    .iter()
                    .map(|p| Regex::new(p).expect("platform pattern must compile"))
                    .collect();
                (id, patterns)
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_canonical_name_uniquely() {
        let mut names: Vec<&str> = PlatformIdentifier::ALL.iter().map(|p| p.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PlatformIdentifier::ALL.len());
    }

    #[test]
    fn test_every_platform_has_patterns() {
        for (id, patterns) in compiled_patterns() {
            assert!(!patterns.is_empty(), "{id} has no filename patterns");
        }
    }

    #[test]
    fn test_windows_family() {
        assert!(PlatformIdentifier::Win32X64.is_windows());
        assert!(PlatformIdentifier::Win32Ia32.is_windows());
        assert!(PlatformIdentifier::Win32Arm64.is_windows());
        assert!(PlatformIdentifier::Nupkg.is_windows());
        assert!(!PlatformIdentifier::DarwinArm64.is_windows());
        assert!(!PlatformIdentifier::DebX64.is_windows());
    }

    #[test]
    fn test_serialize_as_canonical_string() {
        let json = serde_json::to_string(&PlatformIdentifier::DarwinArm64).unwrap();
        assert_eq!(json, "\"darwin-arm64\"");
    }
}
