//! Watch command handler.
//!
//! Polls a console log that a running test process is still writing and
//! redraws the live tree whenever new lines arrive.

use crate::config::{Config, ParserConfig};
use crate::error::{Result, RobotreeError};
use crate::node::TreeNode;
use crate::output::{print_info, print_run_banner, print_tree, print_warning, Palette};
use crate::session::LogSession;
use crate::signal::StopSignal;
use crate::view::ViewState;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use super::read_log_lines;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Keeps one session in step with a file on disk.
#[derive(Debug)]
pub struct LogFollower {
    path: PathBuf,
    session: LogSession,
    view: ViewState,
    seen_lines: usize,
    seen_pending: usize,
}

impl LogFollower {
    pub fn new(path: &Path, config: &ParserConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            session: LogSession::new(path.display().to_string(), config.clone()),
            view: ViewState::new(),
            seen_lines: 0,
            seen_pending: 0,
        }
    }

    /// Re-read the file and linearize whatever is new.
    ///
    /// Returns whether anything visible changed. A file that shrank or
    /// disappeared counts as a restarted run.
    pub fn poll(&mut self) -> Result<bool> {
        let lines = match read_log_lines(&self.path, true) {
            Ok(lines) => lines,
            Err(RobotreeError::LogNotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };

        let restarted = lines.len() < self.seen_lines;
        if restarted {
            info!(path = %self.path.display(), "log truncated, starting over");
        }
        self.session.sync(&lines);
        let consumed = self.session.update();
        if restarted {
            self.view.retain_present(&self.session.live_tree());
        }

        let pending = self.session.pending_lines().len();
        let changed = restarted || lines.len() != self.seen_lines || pending != self.seen_pending;
        if changed {
            debug!(lines = lines.len(), consumed, pending, "log changed");
        }
        self.seen_lines = lines.len();
        self.seen_pending = pending;
        Ok(changed)
    }

    /// Flush the trailing deferred line once the run is over.
    pub fn finish(&mut self) {
        self.session.finish();
    }

    pub fn session(&self) -> &LogSession {
        &self.session
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Tree to draw: live while the run is going, final after [`finish`](Self::finish).
    pub fn tree(&self) -> Vec<TreeNode> {
        if self.session.is_finished() {
            self.session.tree()
        } else {
            self.session.live_tree()
        }
    }
}

/// Poll interval from `--interval`, falling back to the config for a missing or zero value.
fn poll_interval_ms(requested: Option<u64>, config: &Config) -> u64 {
    match requested {
        Some(0) => {
            print_warning("--interval must be at least 1ms, using the configured interval");
            config.display.poll_interval_ms
        }
        Some(ms) => ms,
        None => config.display.poll_interval_ms,
    }
}

/// Follow a log file until Ctrl+C, redrawing on every change.
pub fn watch_command(
    path: &Path,
    interval_ms: Option<u64>,
    show_logs: bool,
    color: bool,
    config: &Config,
) -> Result<()> {
    if !path.exists() {
        return Err(RobotreeError::LogNotFound(path.to_path_buf()));
    }

    let interval = Duration::from_millis(poll_interval_ms(interval_ms, config));
    let palette = Palette::new(color);
    let stop = StopSignal::install()?;
    let mut follower = LogFollower::new(path, &config.parser);

    info!(path = %path.display(), interval_ms = interval.as_millis() as u64, "watching log");

    while !stop.is_stop_requested() {
        if follower.poll()? {
            print!("{CLEAR_SCREEN}");
            print_tree(&follower.tree(), follower.view(), show_logs, &palette);
        }
        thread::sleep(interval);
    }

    follower.finish();
    print!("{CLEAR_SCREEN}");
    let tree = follower.tree();
    print_tree(&tree, follower.view(), show_logs, &palette);
    println!();
    print_run_banner(&tree, &palette);
    print_info("Stopped watching");
    Ok(())
}
