//! Skill configuration
//!
//! Loaded from an optional TOML file, then overridden from `SQUEEZE_*`
//! environment variables. Every field has a default so an empty file (or no
//! file at all) yields a config pointing at a server on localhost.

use crate::core::error::{Result, SkillError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default LMS JSON-RPC port
pub const DEFAULT_PORT: u16 = 9000;

/// Configuration for the skill and its media server connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// Base URL of the media server, without port (e.g. `http://192.168.1.10`)
    pub server_url: String,

    /// JSON-RPC port of the media server
    pub server_port: u16,

    /// HTTP basic auth user, if the server is password protected
    pub username: Option<String>,

    /// HTTP basic auth password
    pub password: Option<String>,

    /// Start every `StartPlayer` request with a fresh random mix instead of
    /// resuming the current playlist
    pub randomize_on_play: bool,

    /// File holding the last-used player name between sessions
    pub state_file: PathBuf,

    /// Timeout for a single JSON-RPC request
    pub request_timeout_secs: u64,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost".into(),
            server_port: DEFAULT_PORT,
            username: None,
            password: None,
            randomize_on_play: false,
            state_file: PathBuf::from("last-player.json"),
            request_timeout_secs: 10,
        }
    }
}

impl SkillConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file, apply environment overrides and validate
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SkillError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a config file
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from `SQUEEZE_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SQUEEZE_SERVER_URL") {
            self.server_url = url;
        }
        if let Some(port) = lookup("SQUEEZE_SERVER_PORT") {
            match port.parse() {
                Ok(port) => self.server_port = port,
                Err(_) => tracing::warn!("Ignoring invalid SQUEEZE_SERVER_PORT: {}", port),
            }
        }
        if let Some(username) = lookup("SQUEEZE_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = lookup("SQUEEZE_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(flag) = lookup("SQUEEZE_RANDOMIZE_ON_PLAY") {
            self.randomize_on_play = matches!(flag.as_str(), "1" | "true" | "yes");
        }
        if let Some(path) = lookup("SQUEEZE_STATE_FILE") {
            self.state_file = PathBuf::from(path);
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(SkillError::Config(format!(
                "server_url ({}) must start with http:// or https://",
                self.server_url
            )));
        }

        if self.server_port == 0 {
            return Err(SkillError::Config("server_port must be non-zero".into()));
        }

        // Basic auth needs both halves
        if self.username.is_some() != self.password.is_some() {
            return Err(SkillError::Config(
                "username and password must be set together".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(SkillError::Config(
                "request_timeout_secs must be positive".into(),
            ));
        }

        Ok(())
    }

    /// JSON-RPC endpoint of the media server
    pub fn endpoint(&self) -> String {
        format!(
            "{}:{}/jsonrpc.js",
            self.server_url.trim_end_matches('/'),
            self.server_port
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_is_valid() {
        let config = SkillConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint(), "http://localhost:9000/jsonrpc.js");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SkillConfig::from_toml(
            r#"
            server_url = "http://192.168.1.20/"
            randomize_on_play = true
            "#,
        )
        .unwrap();

        assert_eq!(config.server_port, DEFAULT_PORT);
        assert!(config.randomize_on_play);
        assert_eq!(config.endpoint(), "http://192.168.1.20:9000/jsonrpc.js");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result = SkillConfig::from_toml("server_port = \"nine thousand\"");
        assert!(matches!(result, Err(SkillError::TomlError(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("SQUEEZE_SERVER_URL", "https://lms.example.net"),
            ("SQUEEZE_SERVER_PORT", "9002"),
            ("SQUEEZE_USERNAME", "admin"),
            ("SQUEEZE_PASSWORD", "secret"),
            ("SQUEEZE_RANDOMIZE_ON_PLAY", "yes"),
        ]
        .into_iter()
        .collect();

        let mut config = SkillConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server_url, "https://lms.example.net");
        assert_eq!(config.server_port, 9002);
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert!(config.randomize_on_play);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = SkillConfig::default();
        config.apply_overrides(|key| (key == "SQUEEZE_SERVER_PORT").then(|| "abc".to_string()));
        assert_eq!(config.server_port, DEFAULT_PORT);
    }

    #[test]
    fn test_validate_rejects_half_credentials() {
        let config = SkillConfig {
            username: Some("admin".into()),
            ..SkillConfig::default()
        };
        assert!(matches!(config.validate(), Err(SkillError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bare_host() {
        let config = SkillConfig {
            server_url: "192.168.1.20".into(),
            ..SkillConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
