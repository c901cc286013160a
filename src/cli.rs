//! Command-line definition for the `robotree` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "robotree")]
#[command(
    version,
    about = "Turn Robot Framework console output into a suite/test tree",
    after_help = "EXAMPLES:
    # Show the tree of a captured run
    robotree parse results/console.log

    # Follow a run while it is still writing output
    robotree watch results/console.log

    # Emit the tree as JSON for another tool
    robotree parse results/console.log --json"
)]
pub struct Cli {
    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a captured console log and print its tree
    #[command(after_help = "EXAMPLES:
    robotree parse console.log                 # Print the tree
    robotree parse console.log --chunk 1       # Feed one line at a time
    robotree parse console.log --live          # Stop before finishing the run
    robotree parse console.log --json          # Machine-readable output")]
    Parse {
        /// Path to the console log
        file: PathBuf,

        /// Feed the log in batches of this many lines, like a live stream
        #[arg(long)]
        chunk: Option<usize>,

        /// Treat the log as still running: keep trailing lines pending and
        /// show in-progress output as a running test
        #[arg(long)]
        live: bool,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,

        /// Hide captured output of tests
        #[arg(long)]
        no_logs: bool,
    },

    /// Follow a growing console log and redraw its tree
    #[command(after_help = "EXAMPLES:
    robotree watch console.log                 # Poll at the configured interval
    robotree watch console.log --interval 200  # Poll every 200ms

Press Ctrl+C to stop. A truncated file restarts parsing from the top.")]
    Watch {
        /// Path to the console log
        file: PathBuf,

        /// Poll interval in milliseconds (overrides config)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Hide captured output of tests
        #[arg(long)]
        no_logs: bool,
    },

    /// Show the effective configuration (~/.config/robotree/config.toml)
    Config {
        /// Overwrite the config file with defaults
        #[arg(long)]
        reset: bool,
    },

    /// Output shell completion script to stdout (hidden utility command)
    #[command(hide = true)]
    Completions {
        /// Shell type to generate completions for (bash, zsh, or fish)
        shell: String,
    },
}
