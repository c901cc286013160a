//! Ctrl+C handling for long-running commands.
//!
//! `robotree watch` polls a log file until the user interrupts it. The
//! handler only flips a flag; the poll loop checks it between iterations and
//! exits cleanly after rendering its last tree.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Result, RobotreeError};

/// Shared "stop requested" flag set by SIGINT.
#[derive(Clone, Default)]
pub struct StopSignal {
    stop_flag: Arc<AtomicBool>,
}

impl StopSignal {
    /// Register the process-wide SIGINT handler.
    ///
    /// `ctrlc` allows a single registration per process, so this is called
    /// once from the command that needs it.
    pub fn install() -> Result<Self> {
        let signal = Self::default();
        let flag = Arc::clone(&signal.stop_flag);

        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })
        .map_err(|e| RobotreeError::SignalHandler(e.to_string()))?;

        Ok(signal)
    }

    /// Non-blocking check used by poll loops.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_flag.load(Ordering::SeqCst)
    }
}
