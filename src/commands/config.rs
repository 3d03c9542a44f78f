//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::Config;
use crate::error::Result;

fn or_unset(value: Option<&str>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "not set".dimmed().to_string(),
    }
}

/// Show current configuration
pub fn cmd_config_show(json: bool) -> Result<()> {
    let config = Config::load()?;
    let user_id = config.user_id();

    let json_output = json!({
        "api": {
            "base_url": config.api_base_url(),
            "timeout": config.api.timeout,
        },
        "user": {
            "id": user_id,
        },
        "grid": {
            "zoom": config.grid.zoom,
        },
        "purchase": {
            "proof_url": config.purchase.proof_url,
            "revalidate": config.purchase.revalidate,
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    let zoom = match config.grid.zoom {
        Some(level) => level.to_string(),
        None => "by raffle size".dimmed().to_string(),
    };
    let mut text = String::new();
    text.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text.push_str(&format!("{}:\n", "api".cyan()));
    text.push_str(&format!("  base_url: {}\n", config.api_base_url()));
    text.push_str(&format!("  timeout: {}s\n\n", config.api.timeout));

    text.push_str(&format!("{}:\n", "user".cyan()));
    text.push_str(&format!("  id: {}\n\n", or_unset(user_id.as_deref())));

    text.push_str(&format!("{}:\n", "grid".cyan()));
    text.push_str(&format!("  zoom: {zoom}\n\n"));

    text.push_str(&format!("{}:\n", "purchase".cyan()));
    text.push_str(&format!("  proof_url: {}\n", config.purchase.proof_url));
    text.push_str(&format!("  revalidate: {}\n\n", config.purchase.revalidate));

    text.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output).with_text(text).print(json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, json: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let stored = config.get(key)?;
    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": stored,
        "success": true,
    }))
    .with_text(format!(
        "Set {} to {}",
        key.cyan(),
        stored.as_deref().unwrap_or(value)
    ))
    .print(json)
}

/// Get a configuration value
pub fn cmd_config_get(key: &str, json: bool) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;

    CommandOutput::new(json!({
        "key": key,
        "value": value,
    }))
    .with_text(value.unwrap_or_default())
    .print(json)
}
