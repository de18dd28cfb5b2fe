//! `hipaa-guardian config`: configuration inspection.

use std::path::Path;

use clap::Subcommand;
use hipaa_guardian_config::{AppConfig, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file path
    Path,

    /// Print a default config file
    Default,
}

pub fn run(
    action: ConfigAction,
    config_path: &Path,
    loaded: Result<AppConfig, ConfigError>,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = loaded?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => println!("{}", config_path.display()),
        ConfigAction::Default => print!("{}", AppConfig::default_toml()),
    }
    Ok(())
}
