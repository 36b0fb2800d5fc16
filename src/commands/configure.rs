//! `mensa configure` — manage the configuration file

use anyhow::Result;

use crate::config::{self, MensaConfig};

/// Set configuration values, creating the file if it does not exist yet
pub fn set(api_url: Option<String>, timeout_secs: Option<u64>) -> Result<()> {
    if config::get_config_path()?.exists() {
        config::update_config(|config| {
            apply(config, api_url, timeout_secs);
            Ok(())
        })?;
    } else {
        // First run: start from the URL being set right now
        let Some(url) = api_url.clone() else {
            anyhow::bail!("no configuration found, run 'mensa configure --api-url <URL>' first");
        };
        let mut config = MensaConfig::new(url);
        apply(&mut config, api_url, timeout_secs);
        config::save_config(&config)?;
    }

    println!("Configuration saved to {}", config::get_config_path()?.display());
    Ok(())
}

fn apply(config: &mut MensaConfig, api_url: Option<String>, timeout_secs: Option<u64>) {
    if let Some(url) = api_url {
        config.api_base_url = url;
    }
    if let Some(secs) = timeout_secs {
        config.request_timeout_secs = secs;
    }
}

/// Print the effective configuration
pub fn show() -> Result<()> {
    let config = config::load_config()?;
    println!("api_base_url = {}", config.api_base_url);
    println!("request_timeout_secs = {}", config.request_timeout_secs);
    Ok(())
}
