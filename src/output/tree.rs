//! Tree rendering.
//!
//! Turns the visible [`Row`]s of a tree into indented, status-colored lines.

use std::fmt::Write as _;

use terminal_size::{terminal_size, Width};

use super::colors::*;
use crate::node::{Status, TreeNode};
use crate::view::{Row, RowKind, ViewState};

const OPEN_MARKER: &str = "▾";
const CLOSED_MARKER: &str = "▸";
const LOG_GUTTER: &str = "│";
const ELLIPSIS: char = '…';
const MIN_LABEL_WIDTH: usize = 8;

/// Escape codes used while rendering; all empty when color is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub reset: &'static str,
    pub bold: &'static str,
    pub dim: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub red: &'static str,
    pub cyan: &'static str,
    pub gray: &'static str,
}

impl Palette {
    pub fn ansi() -> Self {
        Self {
            reset: RESET,
            bold: BOLD,
            dim: DIM,
            green: GREEN,
            yellow: YELLOW,
            red: RED,
            cyan: CYAN,
            gray: GRAY,
        }
    }

    pub fn plain() -> Self {
        Self {
            reset: "",
            bold: "",
            dim: "",
            green: "",
            yellow: "",
            red: "",
            cyan: "",
            gray: "",
        }
    }

    pub fn new(color: bool) -> Self {
        if color {
            Self::ansi()
        } else {
            Self::plain()
        }
    }

    pub fn status(&self, status: Status) -> &'static str {
        match status {
            Status::Pass => self.green,
            Status::Fail => self.red,
            Status::Running => self.yellow,
        }
    }
}

/// Current terminal width, if stdout is a terminal.
pub fn terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push(ELLIPSIS);
    cut
}

/// Render rows, one line each.
///
/// With a `width`, labels are shortened so the uncolored line fits.
pub fn render_rows(rows: &[Row], palette: &Palette, width: Option<usize>) -> String {
    let mut out = String::new();
    for row in rows {
        let indent = "  ".repeat(row.depth);
        let fit = |label: &str, used: usize| match width {
            Some(width) => truncate(label, width.saturating_sub(used).max(MIN_LABEL_WIDTH)),
            None => label.to_string(),
        };

        match row.kind {
            RowKind::Suite | RowKind::Test => {
                let marker = if row.open { OPEN_MARKER } else { CLOSED_MARKER };
                let status = row.status.unwrap_or(Status::Running);
                let tag = format!("[{}]", status.as_str());
                // indent + marker + space + label + space + tag
                let used = indent.chars().count() + 2 + 1 + tag.len();
                let label = fit(&row.label, used);
                let (name_start, name_end) = if row.kind == RowKind::Suite {
                    (palette.bold, palette.reset)
                } else {
                    ("", "")
                };
                let _ = write!(
                    out,
                    "{indent}{marker} {name_start}{label}{name_end} {}{tag}{}",
                    palette.status(status),
                    palette.reset
                );
                if let Some(detail) = row.detail.as_deref().filter(|d| !d.is_empty()) {
                    let _ = write!(out, "  {}{}{}", palette.dim, detail, palette.reset);
                }
            }
            RowKind::Text => {
                let label = fit(&row.label, indent.chars().count() + 2);
                let _ = write!(out, "{indent}  {}{label}{}", palette.gray, palette.reset);
            }
            RowKind::Log => {
                let label = fit(&row.label, indent.chars().count() + 2);
                let _ = write!(
                    out,
                    "{indent}{}{LOG_GUTTER}{} {}{label}{}",
                    palette.cyan, palette.reset, palette.dim, palette.reset
                );
            }
        }
        out.push('\n');
    }
    out
}

/// Print the visible part of a tree to stdout.
pub fn print_tree(tree: &[TreeNode], view: &ViewState, show_logs: bool, palette: &Palette) {
    let rows = view.rows(tree, show_logs);
    print!("{}", render_rows(&rows, palette, terminal_width()));
}
