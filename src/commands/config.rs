//! Configuration commands.
//!
//! - `config show`: Display the effective configuration
//! - `config set`: Set a configuration value
//! - `config path`: Print where the config file lives

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::Config;
use crate::error::Result;
use crate::paths::{config_path, data_root, storage_path};

/// Show current configuration
pub fn cmd_config_show(json: bool) -> Result<()> {
    let config = Config::load()?;

    let json_output = json!({
        "api_base_url": config.api_base_url,
        "page_size": config.page_size,
        "retry": {
            "max_attempts": config.retry.max_attempts,
            "backoff_ms": config.retry.backoff_ms,
        },
        "remote_timeout": config.remote_timeout,
        "offline": config.offline,
        "config_file": config_path().to_string_lossy(),
        "storage_file": storage_path().to_string_lossy(),
    });

    let mut text = String::new();
    text.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));
    text.push_str(&format!("{}: {}\n", "api_base_url".cyan(), config.api_base_url));
    text.push_str(&format!("{}: {}\n", "page_size".cyan(), config.page_size));
    text.push_str(&format!("{}:\n", "retry".cyan()));
    text.push_str(&format!("  max_attempts: {}\n", config.retry.max_attempts));
    text.push_str(&format!("  backoff_ms: {}\n", config.retry.backoff_ms));
    text.push_str(&format!(
        "{}: {}s\n",
        "remote_timeout".cyan(),
        config.remote_timeout
    ));
    text.push_str(&format!("{}: {}\n", "offline".cyan(), config.offline));
    text.push('\n');
    text.push_str(
        &format!("Data root: {}", data_root().display())
            .dimmed()
            .to_string(),
    );

    CommandOutput::new(json_output).with_text(text).print(json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, json: bool) -> Result<()> {
    // Env overrides are not written back to disk.
    let mut config = Config::load_from(&config_path())?;
    config.set_value(key, value)?;
    config.save()?;

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": value,
        "success": true,
    }))
    .with_text(format!("Set {} = {}", key.cyan(), value))
    .print(json)
}

/// Print the config file path
pub fn cmd_config_path() -> Result<()> {
    println!("{}", config_path().display());
    Ok(())
}
