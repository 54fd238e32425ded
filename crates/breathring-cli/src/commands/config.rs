use std::path::Path;

use breathring_core::{Config, ConfigError, Result};
use clap::Subcommand;

use super::load_config;

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Get a config value
    Get {
        /// Dotted config key (e.g. "timer.inhale_ms", "ring.size")
        key: String,
    },
    /// Print the default config file location
    Path,
}

pub fn run(action: ConfigAction, config_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            print!("{}", config.to_toml_string()?);
        }
        ConfigAction::Get { key } => {
            let config = load_config(config_path)?;
            let value = config.get(&key).ok_or_else(|| ConfigError::InvalidValue {
                key: key.clone(),
                message: "unknown key".to_string(),
            })?;
            println!("{value}");
        }
        ConfigAction::Path => {
            println!("{}", Config::path().display());
        }
    }
    Ok(())
}
