use std::path::PathBuf;

/// Returns the base directory for Paddock data.
///
/// Uses `$A3S_PADDOCK_HOME` if set, otherwise defaults to `~/.a3s/paddock`.
pub fn paddock_home() -> PathBuf {
    if let Ok(home) = std::env::var("A3S_PADDOCK_HOME") {
        return PathBuf::from(home);
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".a3s")
        .join("paddock")
}

/// Returns the path to the user configuration file.
pub fn config_path() -> PathBuf {
    paddock_home().join("config.toml")
}
