use crate::error::{Result, RobotreeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "robotree";

/// The filename for the configuration file.
const CONFIG_FILENAME: &str = "config.toml";

// ============================================================================
// Parser Configuration
// ============================================================================

/// What the reducer does with a suite end that matches no open suite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnmatchedSuiteEnd {
    /// Discard the boundary; the open suites stay `RUNNING`.
    #[default]
    Drop,
    /// Close the innermost open suite with the end's status and summary.
    CloseTop,
}

/// Knobs for the linearizer and reducer.
///
/// None of these change how lines are classified; they only cover the
/// places where the engine has to guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Name given to a test when neither its status line nor any buffered
    /// line identifies it.
    #[serde(default = "default_placeholder_test_name")]
    pub placeholder_test_name: String,

    /// How many text nodes the suite-close rule scans backward from a
    /// summary line looking for its status line.
    #[serde(default = "default_summary_lookback")]
    pub summary_lookback: usize,

    #[serde(default)]
    pub unmatched_suite_end: UnmatchedSuiteEnd,
}

fn default_placeholder_test_name() -> String {
    "Unnamed Test".to_string()
}

fn default_summary_lookback() -> usize {
    5
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            placeholder_test_name: default_placeholder_test_name(),
            summary_lookback: default_summary_lookback(),
            unmatched_suite_end: UnmatchedSuiteEnd::default(),
        }
    }
}

// ============================================================================
// Display Configuration
// ============================================================================

/// Terminal rendering preferences for the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Emit ANSI colors.
    #[serde(default = "default_true")]
    pub color: bool,

    /// Print captured test output under open tests.
    #[serde(default = "default_true")]
    pub show_logs: bool,

    /// How often `robotree watch` polls the log file.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Helper function for serde default values (true).
fn default_true() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_logs: true,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Complete robotree configuration.
///
/// # Example
///
/// ```toml
/// [parser]
/// placeholder_test_name = "Unnamed Test"
/// summary_lookback = 5
/// unmatched_suite_end = "drop"
///
/// [display]
/// color = true
/// show_logs = true
/// poll_interval_ms = 500
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

// ============================================================================
// Config Validation
// ============================================================================

use std::error::Error;
use std::fmt;

/// Error type for configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The suite-close rule needs at least one node to look at.
    ZeroSummaryLookback,

    /// `watch` would spin without sleeping.
    ZeroPollInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroSummaryLookback => {
                write!(f, "`parser.summary_lookback` must be at least 1")
            }
            ConfigError::ZeroPollInterval => {
                write!(f, "`display.poll_interval_ms` must be at least 1")
            }
        }
    }
}

impl Error for ConfigError {}

/// Validate a configuration for logical consistency.
///
/// # Example
///
/// ```
/// use robotree::config::{validate_config, Config};
///
/// let mut config = Config::default();
/// assert!(validate_config(&config).is_ok());
///
/// config.parser.summary_lookback = 0;
/// assert!(validate_config(&config).is_err());
/// ```
pub fn validate_config(config: &Config) -> std::result::Result<(), ConfigError> {
    if config.parser.summary_lookback == 0 {
        return Err(ConfigError::ZeroSummaryLookback);
    }
    if config.display.poll_interval_ms == 0 {
        return Err(ConfigError::ZeroPollInterval);
    }
    Ok(())
}

// ============================================================================
// Config File Management
// ============================================================================

/// Default config file content with explanatory comments.
const DEFAULT_CONFIG_WITH_COMMENTS: &str = r#"# robotree configuration

[parser]
# Name used for a test that nothing in the log identifies
placeholder_test_name = "Unnamed Test"

# How many buffered lines to scan back from a summary line for its status line
summary_lookback = 5

# What to do with a suite end whose name matches no open suite
# - "drop": ignore it, the open suite keeps running
# - "close-top": close the innermost open suite instead
unmatched_suite_end = "drop"

[display]
# Colored output
color = true

# Show captured output of open tests
show_logs = true

# Poll interval for `robotree watch`, in milliseconds
poll_interval_ms = 500
"#;

/// Get the robotree config directory path (~/.config/robotree/).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| RobotreeError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Get the path to the config file.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILENAME))
}

/// Load the configuration from `~/.config/robotree/config.toml`.
///
/// If the file doesn't exist, it is created with default values and
/// comments explaining each option.
pub fn load_config() -> Result<Config> {
    load_config_at(&config_path()?)
}

fn load_config_at(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(config_path, DEFAULT_CONFIG_WITH_COMMENTS)?;
        return Ok(Config::default());
    }

    let content = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&content).map_err(|e| {
        RobotreeError::Config(format!(
            "Failed to parse config file at {:?}: {}",
            config_path, e
        ))
    })?;

    validate_config(&config).map_err(|e| RobotreeError::Config(e.to_string()))?;
    Ok(config)
}

/// Save the configuration to `~/.config/robotree/config.toml`.
///
/// Note that this overwrites any existing file, including user comments.
pub fn save_config(config: &Config) -> Result<()> {
    save_config_at(&config_path()?, config)
}

fn save_config_at(config_path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| RobotreeError::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(config_path, content)?;
    Ok(())
}
