//! Run result banner.
//!
//! Printed after a tree to sum up how the run went.

use terminal_size::{terminal_size, Width};

use super::tree::Palette;
use crate::node::{Status, TreeNode};
use crate::reduce::walk;

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const MIN_BANNER_WIDTH: usize = 20;
const MAX_BANNER_WIDTH: usize = 80;

/// Test counts over a whole tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTally {
    pub passed: usize,
    pub failed: usize,
    pub running: usize,
}

impl RunTally {
    pub fn from_tree(tree: &[TreeNode]) -> Self {
        let mut tally = Self::default();
        walk(tree, &mut |node, _| {
            if let TreeNode::Test(test) = node {
                match test.status {
                    Status::Pass => tally.passed += 1,
                    Status::Fail => tally.failed += 1,
                    Status::Running => tally.running += 1,
                }
            }
        });
        tally
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.running
    }

    /// Overall verdict: running wins over failed, failed over passed.
    pub fn status(&self) -> Status {
        if self.running > 0 {
            Status::Running
        } else if self.failed > 0 {
            Status::Fail
        } else {
            Status::Pass
        }
    }

    /// Same wording as the runner's own summary lines.
    pub fn label(&self) -> String {
        let noun = if self.total() == 1 { "test" } else { "tests" };
        let mut label = format!(
            "{} {}, {} passed, {} failed",
            self.total(),
            noun,
            self.passed,
            self.failed
        );
        if self.running > 0 {
            label.push_str(&format!(", {} running", self.running));
        }
        label
    }
}

fn get_terminal_width_for_banner() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
}

/// Build a banner of the form `━━━ label ━━━`, `width` columns wide.
pub fn format_banner(label: &str, status: Status, palette: &Palette, width: usize) -> String {
    let banner_width = width.clamp(MIN_BANNER_WIDTH, MAX_BANNER_WIDTH);
    let padded = format!(" {} ", label);
    let remaining = banner_width.saturating_sub(padded.chars().count());
    let left_padding = remaining / 2;
    let right_padding = remaining - left_padding;

    format!(
        "{}{}{}{}{}{}",
        palette.status(status),
        palette.bold,
        "━".repeat(left_padding),
        padded,
        "━".repeat(right_padding),
        palette.reset
    )
}

/// Print the tally banner for a tree.
pub fn print_run_banner(tree: &[TreeNode], palette: &Palette) {
    let tally = RunTally::from_tree(tree);
    println!(
        "{}",
        format_banner(
            &tally.label(),
            tally.status(),
            palette,
            get_terminal_width_for_banner()
        )
    );
}
