use std::path::Path;

use anyhow::{Context, Result};
use iwara_core::ClientConfig;
use serde::{Deserialize, Serialize};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Contents of `config.toml`
///
/// ```toml
/// token = "..."
/// log_format = "json"
///
/// [client]
/// base_url = "https://ecchi.iwara.tv"
/// timeout_secs = 20
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub token: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        Self::parse(&raw).with_context(|| format!("Invalid config file {}", path))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

/// Resolves the config file: `--config`, then `IWARA_CONFIG`, then the XDG
/// and home config directories
pub fn get_config_path(explicit: Option<&str>) -> Option<String> {
    if let Some(path) = explicit {
        return Some(path.to_string());
    }

    if let Ok(path) = std::env::var("IWARA_CONFIG") {
        return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = format!("{}/iwara/config.toml", xdg_config_home);
        if Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = format!("{}/.config/iwara/config.toml", home.display());
        if Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.client.base_url, "https://ecchi.iwara.tv");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_client_section() {
        let config = Config::parse(
            r#"
            token = "abc"
            log_format = "json"

            [client]
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.client.timeout_secs, 5);
        assert_eq!(config.client.api_url, "https://api.iwara.tv");
    }

    #[test]
    fn test_unknown_log_format_is_error() {
        assert!(Config::parse(r#"log_format = "xml""#).is_err());
    }

    #[test]
    fn test_explicit_path_wins() {
        assert_eq!(
            get_config_path(Some("/tmp/iwara.toml")).as_deref(),
            Some("/tmp/iwara.toml")
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(Config::from_file("/nonexistent/iwara/config.toml").is_err());
    }
}
