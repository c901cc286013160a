//! Terminal output formatting for robotree.
//!
//! - [`banner`] - Run result banner
//! - [`messages`] - Error, warning, and info messages
//! - [`tree`] - Tree rendering

pub mod banner;
pub mod messages;
pub mod tree;

/// ANSI color codes for terminal output.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";
}

pub use colors::*;

pub use banner::{print_run_banner, RunTally};
pub use messages::{print_error, print_info, print_warning};
pub use tree::{print_tree, render_rows, Palette};
