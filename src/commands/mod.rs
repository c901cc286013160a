//! CLI command handlers for robotree.
//!
//! - [`parse`] - Parse a captured console log
//! - [`watch`] - Follow a growing console log
//! - [`config`] - Show or reset the configuration

mod config;
mod parse;
mod watch;

pub use config::{config_command, config_to_toml_string};
pub use parse::{parse_command, parse_file, ParseOptions, ParseReport};
pub use watch::{watch_command, LogFollower};

use crate::error::{Result, RobotreeError};
use std::fs;
use std::path::Path;

/// Read a log file into lines.
///
/// Invalid UTF-8 is replaced rather than rejected, since runner output can
/// carry arbitrary bytes from the system under test. With `complete_only`,
/// a trailing line that has no newline yet is left out.
pub fn read_log_lines(path: &Path, complete_only: bool) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RobotreeError::LogNotFound(path.to_path_buf()),
        _ => RobotreeError::Io(e),
    })?;
    Ok(split_lines(&String::from_utf8_lossy(&bytes), complete_only))
}

fn split_lines(content: &str, complete_only: bool) -> Vec<String> {
    let mut lines: Vec<String> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();
    // The piece after the last newline is either empty or still being written.
    let tail = lines.pop().unwrap_or_default();
    if !complete_only && !tail.is_empty() {
        lines.push(tail);
    }
    lines
}
