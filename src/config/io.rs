//! Configuration file I/O operations
//!
//! This module handles reading, writing, and updating the mensa
//! configuration file. All operations include automatic validation.

use super::paths::get_config_path;
use super::schema::MensaConfig;
use super::API_URL_ENV;
use anyhow::{Context, Result};
use std::fs;

/// Load configuration from disk
///
/// The API base URL is a required setting: with no config file and no
/// MENSA_API_URL environment variable this is a fatal error. The
/// environment variable, when set, overrides the file.
pub fn load_config() -> Result<MensaConfig> {
    let path = get_config_path()?;

    let mut config = if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?
    } else if let Ok(url) = std::env::var(API_URL_ENV) {
        MensaConfig::new(url)
    } else {
        anyhow::bail!(
            "API base URL is not configured.\n\
             Run 'mensa configure --api-url <URL>' or set {}.",
            API_URL_ENV
        );
    };

    if let Ok(url) = std::env::var(API_URL_ENV) {
        config.api_base_url = url;
    }

    if let Err(errors) = config.validate() {
        anyhow::bail!(
            "Config validation failed in {}:\n  {}",
            path.display(),
            errors.join("\n  ")
        );
    }

    Ok(config)
}

/// Save configuration to disk
///
/// Creates parent directories if needed. Validates the config before saving.
pub fn save_config(config: &MensaConfig) -> Result<()> {
    if let Err(errors) = config.validate() {
        anyhow::bail!("cannot save invalid config:\n  {}", errors.join("\n  "));
    }

    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;

    Ok(())
}

/// Update config with a modification function
///
/// Handles the load → modify → validate → save cycle in one place.
pub fn update_config<F>(f: F) -> Result<()>
where
    F: FnOnce(&mut MensaConfig) -> Result<()>,
{
    let mut config = load_config()?;
    f(&mut config)?;
    save_config(&config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config = MensaConfig::new("https://mensa.example.com");

        let content = toml::to_string_pretty(&config).unwrap();
        fs::write(&config_path, content).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        let loaded: MensaConfig = toml::from_str(&content).unwrap();

        assert_eq!(loaded.api_base_url, "https://mensa.example.com");
        assert_eq!(loaded.request_timeout_secs, 30);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let loaded: MensaConfig =
            toml::from_str("api_base_url = \"http://localhost:1337\"").unwrap();
        assert_eq!(loaded.request_timeout_secs, 30);
    }

    #[test]
    fn test_missing_base_url_fails_to_parse() {
        let result: std::result::Result<MensaConfig, _> = toml::from_str("request_timeout_secs = 10");
        assert!(result.is_err());
    }
}
