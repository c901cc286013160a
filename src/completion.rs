//! Shell completion scripts for the `robotree` binary.

use crate::cli::Cli;
use crate::error::{Result, RobotreeError};
use clap::CommandFactory;
use clap_complete::{generate, Shell};

/// Shells with supported completion output.
pub const SUPPORTED_SHELLS: &[&str] = &["bash", "zsh", "fish"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
}

impl ShellType {
    /// Parse a shell name or a path to a shell binary (`/bin/zsh`).
    pub fn from_name(name: &str) -> Result<Self> {
        let shell_name = std::path::Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name);

        match shell_name {
            "bash" => Ok(ShellType::Bash),
            "zsh" => Ok(ShellType::Zsh),
            "fish" => Ok(ShellType::Fish),
            _ => Err(RobotreeError::Completion(format!(
                "Unsupported shell: '{}'",
                shell_name
            ))),
        }
    }

    fn to_clap_shell(self) -> Shell {
        match self {
            ShellType::Bash => Shell::Bash,
            ShellType::Zsh => Shell::Zsh,
            ShellType::Fish => Shell::Fish,
        }
    }
}

/// Generate the completion script for a shell.
pub fn generate_completion_script(shell: ShellType) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell.to_clap_shell(), &mut cmd, "robotree", &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}

/// Print the completion script to stdout.
pub fn print_completion_script(shell: ShellType) {
    print!("{}", generate_completion_script(shell));
}
