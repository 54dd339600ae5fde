//! Core configuration types and loading.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Services configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// This process's server identity.
    pub server: ServerConfig,
    /// Query API and pseudo-client configuration.
    pub webserv: WebServConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name (e.g., "services.straylight.net").
    pub name: String,
    /// Server ID for TS6 (3 characters).
    pub sid: String,
    /// Server description.
    pub description: String,
    /// Prometheus metrics HTTP port (default: 9090, 0 disables).
    pub metrics_port: Option<u16>,
}

/// WebServ configuration.
#[derive(Clone, Deserialize)]
pub struct WebServConfig {
    /// Address the JSON API binds to.
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    /// Shared secret clients pass as `?key=`.
    pub key: String,
    /// Pseudo-client nickname.
    #[serde(default = "default_pseudo_name")]
    pub nickname: String,
    /// Pseudo-client username.
    #[serde(default = "default_pseudo_name")]
    pub username: String,
    /// Pseudo-client realname.
    #[serde(default = "default_pseudo_name")]
    pub realname: String,
}

// The key must never reach a log line.
impl std::fmt::Debug for WebServConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebServConfig")
            .field("listen", &self.listen)
            .field("key", &"<redacted>")
            .field("nickname", &self.nickname)
            .field("username", &self.username)
            .field("realname", &self.realname)
            .finish()
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_pseudo_name() -> String {
    "WebServ".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"
[server]
name = "services.straylight.net"
sid = "00A"
description = "Straylight IRC Services"
metrics_port = 0

[webserv]
listen = "0.0.0.0:8181"
key = "a-long-enough-shared-secret"
nickname = "API"
username = "api"
realname = "JSON API"
"#;

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(FULL).unwrap();
        assert_eq!(config.server.sid, "00A");
        assert_eq!(config.server.metrics_port, Some(0));
        assert_eq!(config.webserv.listen, "0.0.0.0:8181".parse::<SocketAddr>().unwrap());
        assert_eq!(config.webserv.nickname, "API");
        assert_eq!(config.webserv.realname, "JSON API");
    }

    #[test]
    fn webserv_defaults_apply() {
        let config: Config = toml::from_str(
            r#"
[server]
name = "services.straylight.net"
sid = "00A"
description = "Services"

[webserv]
key = "a-long-enough-shared-secret"
"#,
        )
        .unwrap();
        assert_eq!(config.server.metrics_port, None);
        assert_eq!(config.webserv.listen, default_listen());
        assert_eq!(config.webserv.nickname, "WebServ");
        assert_eq!(config.webserv.username, "WebServ");
        assert_eq!(config.webserv.realname, "WebServ");
    }

    #[test]
    fn missing_key_is_a_parse_error() {
        let result: Result<Config, _> = toml::from_str(
            r#"
[server]
name = "services.straylight.net"
sid = "00A"
description = "Services"

[webserv]
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.name, "services.straylight.net");
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn debug_output_redacts_key() {
        let config: Config = toml::from_str(FULL).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("a-long-enough-shared-secret"));
    }
}
