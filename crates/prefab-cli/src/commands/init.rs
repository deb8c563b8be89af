//! Implementation of the `prefab init` command.
//!
//! Writes a starter configuration file with the built-in defaults, either
//! at the global config location or as `.prefab.toml` in the current
//! directory.

use std::path::PathBuf;

use tracing::instrument;

use crate::{
    cli::{InitArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Local config file name written by `prefab init --local`.
pub const LOCAL_CONFIG: &str = ".prefab.toml";

/// Execute the `prefab init` command.
#[instrument(skip_all)]
pub fn execute(args: InitArgs, _global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let path = target_path(&args);

    if path.exists() && !args.force {
        return Err(CliError::ConfigError {
            message: format!(
                "configuration already exists at '{}' (use --force to overwrite)",
                path.display()
            ),
            source: None,
        });
    }

    let rendered =
        toml::to_string_pretty(&AppConfig::default()).map_err(|e| CliError::ConfigError {
            message: "failed to render default configuration".into(),
            source: Some(Box::new(e)),
        })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, rendered)?;

    output.success(&format!("Configuration written to {}", path.display()))?;
    Ok(())
}

fn target_path(args: &InitArgs) -> PathBuf {
    if args.local {
        PathBuf::from(LOCAL_CONFIG)
    } else {
        // --global and the default both use the platform config location.
        AppConfig::config_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_flag_targets_cwd() {
        let args = InitArgs {
            global: false,
            local: true,
            force: false,
        };
        assert_eq!(target_path(&args), PathBuf::from(LOCAL_CONFIG));
    }

    #[test]
    fn default_targets_global_location() {
        let args = InitArgs {
            global: false,
            local: false,
            force: false,
        };
        assert_eq!(target_path(&args), AppConfig::config_path());
    }
}
