//! Implementation of the `prefab config` subcommands.
//!
//! Reads and writes the TOML configuration file directly. The known keys
//! are a fixed set; anything else is rejected with the list of valid keys.

use std::path::PathBuf;

use tracing::instrument;

use crate::{
    cli::{ConfigCommands, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute a `prefab config` subcommand.
#[instrument(skip_all)]
pub fn execute(cmd: ConfigCommands, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let path = global
        .config
        .clone()
        .unwrap_or_else(AppConfig::config_path);

    match cmd {
        ConfigCommands::Path => {
            output.print(&path.display().to_string())?;
            Ok(())
        }
        ConfigCommands::List => {
            let config = AppConfig::load(Some(&path)).map_err(config_error)?;
            let rendered = toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                message: "failed to render configuration".into(),
                source: Some(Box::new(e)),
            })?;
            output.print(rendered.trim_end())?;
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let config = AppConfig::load(Some(&path)).map_err(config_error)?;
            output.print(&get_key(&config, &key)?)?;
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            let mut config = AppConfig::load(Some(&path)).map_err(config_error)?;
            set_key(&mut config, &key, &value)?;
            write_config(&path, &config)?;
            output.success(&format!("{key} updated in {}", path.display()))?;
            Ok(())
        }
    }
}

fn config_error(e: anyhow::Error) -> CliError {
    CliError::ConfigError {
        message: e.to_string(),
        source: None,
    }
}

fn get_key(config: &AppConfig, key: &str) -> CliResult<String> {
    match key {
        "defaults.destination" => Ok(config
            .defaults
            .destination
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(unset)".into())),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        _ => Err(CliError::UnknownConfigKey { key: key.into() }),
    }
}

fn set_key(config: &mut AppConfig, key: &str, value: &str) -> CliResult<()> {
    match key {
        "defaults.destination" => {
            config.defaults.destination = Some(PathBuf::from(value));
        }
        "output.no_color" => {
            config.output.no_color = value.parse().map_err(|_| CliError::InvalidInput {
                message: format!("output.no_color expects true/false, got '{value}'"),
            })?;
        }
        "output.format" => {
            config.output.format = value.into();
        }
        _ => return Err(CliError::UnknownConfigKey { key: key.into() }),
    }
    Ok(())
}

fn write_config(path: &PathBuf, config: &AppConfig) -> CliResult<()> {
    let rendered = toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
        message: "failed to render configuration".into(),
        source: Some(Box::new(e)),
    })?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, rendered)?;
    Ok(())
}
