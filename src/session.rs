//! Per-run parsing sessions.
//!
//! A [`LogSession`] owns everything needed to turn one run's output into a
//! tree: the raw lines, the linearizer state, and whether the run has ended.
//! [`SessionRegistry`] keeps one session per run id so concurrent runs never
//! share parsing state.

use crate::config::ParserConfig;
use crate::error::{Result, RobotreeError};
use crate::linearize::{Linearizer, LinearizerState};
use crate::node::{LinearNode, TreeNode};
use crate::reduce::reduce;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Prefix the runner puts in front of lines read from the child's stderr.
pub const STDERR_PREFIX: &str = "STDERR: ";

/// Parsing state for a single test run.
#[derive(Debug, Clone)]
pub struct LogSession {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    lines: Vec<String>,
    linearizer: Linearizer,
    config: ParserConfig,
}

impl LogSession {
    pub fn new(run_id: impl Into<String>, config: ParserConfig) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Utc::now(),
            finished_at: None,
            lines: Vec::new(),
            linearizer: Linearizer::new(config.clone()),
            config,
        }
    }

    /// Append one line of stdout.
    pub fn push_line(&mut self, line: &str) {
        self.lines
            .push(line.trim_end_matches(['\r', '\n']).to_string());
    }

    /// Append one line of stderr, tagged the way the runner forwards it.
    pub fn push_stderr_line(&mut self, line: &str) {
        let line = line.trim_end_matches(['\r', '\n']);
        self.lines.push(format!("{STDERR_PREFIX}{line}"));
    }

    /// Append every line of a chunk of output.
    pub fn push_chunk(&mut self, chunk: &str) {
        for line in chunk.lines() {
            self.push_line(line);
        }
    }

    /// Replace the line view with the host's full history.
    ///
    /// A history shorter than what was seen before means the stream
    /// restarted; the next [`update`](Self::update) starts over from line 0.
    pub fn sync(&mut self, lines: &[String]) {
        if lines.len() < self.lines.len() {
            info!(run_id = %self.run_id, "output restarted");
            self.finished_at = None;
        }
        self.lines.clear();
        self.lines.extend_from_slice(lines);
    }

    /// Linearize newly arrived lines. Returns how many were consumed.
    pub fn update(&mut self) -> usize {
        let consumed = if self.finished_at.is_some() {
            self.linearizer.finish(&self.lines)
        } else {
            self.linearizer.update(&self.lines)
        };
        if consumed > 0 {
            debug!(
                run_id = %self.run_id,
                consumed,
                nodes = self.linearizer.history().len(),
                "session updated"
            );
        }
        consumed
    }

    /// Mark the run as ended and flush the trailing deferred line, if any.
    pub fn finish(&mut self) -> usize {
        self.finished_at = Some(Utc::now());
        self.update()
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Clear lines and parsing state in one step.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.linearizer.reset();
        self.finished_at = None;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn history(&self) -> &[LinearNode] {
        self.linearizer.history()
    }

    pub fn state(&self) -> &LinearizerState {
        self.linearizer.state()
    }

    /// Lines received but not yet attributed to any node.
    pub fn pending_lines(&self) -> &[String] {
        self.linearizer.pending(&self.lines)
    }

    /// Tree of everything linearized so far.
    pub fn tree(&self) -> Vec<TreeNode> {
        reduce(self.linearizer.history(), self.config.unmatched_suite_end)
    }

    /// Tree including in-progress content: a `RUNNING` test for unattributed
    /// trailing output, and pending lines.
    pub fn live_tree(&self) -> Vec<TreeNode> {
        let history = self.linearizer.live_history(&self.lines);
        reduce(&history, self.config.unmatched_suite_end)
    }
}

/// Sessions keyed by run id.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, LogSession>,
    config: ParserConfig,
}

impl SessionRegistry {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
        }
    }

    /// Open a session for a run id chosen by the caller.
    pub fn start(&mut self, run_id: &str) -> Result<&mut LogSession> {
        if self.sessions.contains_key(run_id) {
            return Err(RobotreeError::SessionExists(run_id.to_string()));
        }
        let session = LogSession::new(run_id, self.config.clone());
        Ok(self.sessions.entry(run_id.to_string()).or_insert(session))
    }

    /// Open a session under a fresh random run id.
    pub fn start_new(&mut self) -> Result<&mut LogSession> {
        let run_id = Uuid::new_v4().to_string();
        self.start(&run_id)
    }

    pub fn get(&self, run_id: &str) -> Result<&LogSession> {
        self.sessions
            .get(run_id)
            .ok_or_else(|| RobotreeError::SessionNotFound(run_id.to_string()))
    }

    pub fn get_mut(&mut self, run_id: &str) -> Result<&mut LogSession> {
        self.sessions
            .get_mut(run_id)
            .ok_or_else(|| RobotreeError::SessionNotFound(run_id.to_string()))
    }

    /// Append a line to a run and linearize it.
    pub fn push_line(&mut self, run_id: &str, line: &str) -> Result<usize> {
        let session = self.get_mut(run_id)?;
        session.push_line(line);
        Ok(session.update())
    }

    /// Mark a run finished.
    pub fn finish(&mut self, run_id: &str) -> Result<usize> {
        Ok(self.get_mut(run_id)?.finish())
    }

    pub fn remove(&mut self, run_id: &str) -> Result<LogSession> {
        self.sessions
            .remove(run_id)
            .ok_or_else(|| RobotreeError::SessionNotFound(run_id.to_string()))
    }

    /// Run ids ordered by session start time.
    pub fn ids(&self) -> Vec<&str> {
        let mut sessions: Vec<&LogSession> = self.sessions.values().collect();
        sessions.sort_by(|a, b| {
            a.started_at
                .cmp(&b.started_at)
                .then_with(|| a.run_id.cmp(&b.run_id))
        });
        sessions.into_iter().map(|s| s.run_id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
