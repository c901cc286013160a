//! Parse command handler.
//!
//! Reads a captured console log and prints its tree, either rendered for
//! the terminal or as JSON.

use crate::config::{Config, ParserConfig};
use crate::error::Result;
use crate::node::TreeNode;
use crate::output::{print_run_banner, print_tree, Palette};
use crate::session::LogSession;
use crate::view::ViewState;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use super::read_log_lines;

/// Flags of `robotree parse`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Feed this many lines per update instead of the whole file at once.
    pub chunk: Option<usize>,
    /// Leave the run unfinished.
    pub live: bool,
    pub json: bool,
    pub show_logs: bool,
    pub color: bool,
}

/// JSON document printed by `robotree parse --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    pub run_id: String,
    pub finished: bool,
    pub tree: Vec<TreeNode>,
    pub pending_lines: Vec<String>,
}

impl ParseReport {
    pub fn from_session(session: &LogSession) -> Self {
        let tree = if session.is_finished() {
            session.tree()
        } else {
            session.live_tree()
        };
        Self {
            run_id: session.run_id.clone(),
            finished: session.is_finished(),
            tree,
            pending_lines: session.pending_lines().to_vec(),
        }
    }
}

/// Run a log file through a fresh session.
///
/// With `chunk`, lines arrive in batches and the linearizer runs after each,
/// the way it would against a live run.
pub fn parse_file(
    path: &Path,
    chunk: Option<usize>,
    live: bool,
    config: &ParserConfig,
) -> Result<LogSession> {
    let lines = read_log_lines(path, false)?;
    let run_id = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut session = LogSession::new(run_id, config.clone());

    let batch = chunk.filter(|&n| n > 0).unwrap_or(lines.len().max(1));
    for piece in lines.chunks(batch) {
        for line in piece {
            session.push_line(line);
        }
        session.update();
    }
    if !live {
        session.finish();
    }

    debug!(
        path = %path.display(),
        lines = session.lines().len(),
        nodes = session.history().len(),
        "parsed log"
    );
    Ok(session)
}

/// Parse a log file and print its tree.
pub fn parse_command(path: &Path, options: &ParseOptions, config: &Config) -> Result<()> {
    let session = parse_file(path, options.chunk, options.live, &config.parser)?;
    let report = ParseReport::from_session(&session);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let palette = Palette::new(options.color);
    print_tree(&report.tree, &ViewState::new(), options.show_logs, &palette);
    println!();
    print_run_banner(&report.tree, &palette);
    Ok(())
}
