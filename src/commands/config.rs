//! Config command handler.
//!
//! Displays or resets the robotree configuration.

use crate::config::{config_path, load_config, save_config, Config};
use crate::error::{Result, RobotreeError};
use crate::output::{print_info, Palette};
use std::path::Path;

/// Show the effective configuration, or overwrite it with defaults.
///
/// Header colors follow `display.color` unless `no_color` is set.
pub fn config_command(reset: bool, no_color: bool) -> Result<()> {
    let path = config_path()?;

    if reset {
        save_config(&Config::default())?;
        print_info(&format!("Reset configuration at {}", path.display()));
        return Ok(());
    }

    let config = load_config()?;
    let palette = Palette::new(config.display.color && !no_color);
    print!("{}", config_header(&path, &palette));
    print!("{}", config_to_toml_string(&config)?);
    Ok(())
}

/// Title and path comment lines printed above the TOML.
fn config_header(path: &Path, palette: &Palette) -> String {
    format!(
        "{}# robotree config{}\n{}# {}{}\n\n",
        palette.bold,
        palette.reset,
        palette.gray,
        path.display(),
        palette.reset
    )
}

/// Render a configuration the way it would be saved.
pub fn config_to_toml_string(config: &Config) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| RobotreeError::Config(format!("Failed to serialize config: {}", e)))
}
