use serde::{Deserialize, Serialize};

use crate::dirs;
use crate::error::{PaddockError, Result};

/// User-configurable settings for the Paddock server and CLI.
///
/// Repository coordinates may come from the config file or from the
/// `A3S_PADDOCK_ACCOUNT` / `A3S_PADDOCK_REPOSITORY` / `A3S_PADDOCK_TOKEN`
/// environment variables; the environment wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub account (user or organization) that owns the repository.
    #[serde(default)]
    pub account: String,

    /// Repository whose releases are mirrored.
    #[serde(default)]
    pub repository: String,

    /// Optional API token, required for private repositories and useful
    /// against rate limits on busy servers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Host address for the HTTP server (default: 127.0.0.1)
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the HTTP server (default: 3030)
    #[serde(default = "default_port")]
    pub port: u16,

    /// How long a fetched release snapshot stays fresh, in seconds
    /// (default: 900)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Timeout for each upstream request, in seconds (default: 15)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3030
}

fn default_cache_ttl_secs() -> u64 {
    900
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account: String::new(),
            repository: String::new(),
            token: None,
            host: default_host(),
            port: default_port(),
            cache_ttl_secs: default_cache_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file path and apply
    /// environment overrides.
    ///
    /// A missing file is fine as long as the environment supplies the
    /// repository coordinates.
    pub fn load() -> Result<Self> {
        let path = dirs::config_path();
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                PaddockError::Config(format!(
                    "Failed to read config file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Save the current configuration to the default config file path.
    pub fn save(&self) -> Result<()> {
        let path = dirs::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(account) = std::env::var("A3S_PADDOCK_ACCOUNT") {
            self.account = account;
        }
        if let Ok(repository) = std::env::var("A3S_PADDOCK_REPOSITORY") {
            self.repository = repository;
        }
        if let Ok(token) = std::env::var("A3S_PADDOCK_TOKEN") {
            self.token = Some(token);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.account.is_empty() || self.repository.is_empty() {
            return Err(PaddockError::Config(
                "Missing repository coordinates: set account and repository in the config \
                 file or A3S_PADDOCK_ACCOUNT / A3S_PADDOCK_REPOSITORY in the environment"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the server bind address string (e.g., "127.0.0.1:3030").
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3030);
        assert_eq!(config.cache_ttl_secs, 900);
        assert_eq!(config.request_timeout_secs, 15);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_bind_address() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "127.0.0.1:3030");
    }

    #[test]
    fn test_config_deserialize() {
        let toml_str = r#"
            account = "a3s-lab"
            repository = "studio"
            host = "0.0.0.0"
            port = 8080
            cache_ttl_secs = 60
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.account, "a3s-lab");
        assert_eq!(config.repository, "studio");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_ttl_secs, 60);
    }

    #[test]
    fn test_validate_rejects_missing_coordinates() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let config = Config {
            account: "a3s-lab".to_string(),
            repository: "studio".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        // Same pinned home as the dirs tests; see the note there.
        std::env::set_var("A3S_PADDOCK_HOME", "/tmp/paddock-test-home");

        let config = Config {
            account: "a3s-lab".to_string(),
            repository: "studio".to_string(),
            token: Some("sekrit".to_string()),
            port: 9999,
            ..Config::default()
        };
        config.save().unwrap();

        let loaded = Config::load().unwrap();
        assert_eq!(loaded.account, "a3s-lab");
        assert_eq!(loaded.repository, "studio");
        assert_eq!(loaded.token.as_deref(), Some("sekrit"));
        assert_eq!(loaded.port, 9999);
    }
}
