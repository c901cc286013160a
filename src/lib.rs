//! Incremental Robot Framework console-output parsing.
//!
//! Raw console lines go through a [`Linearizer`] into a flat history of
//! [`LinearNode`]s, which [`reduce`] folds into a suite/test tree. A
//! [`LogSession`] bundles both steps for one run.

pub mod classify;
pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod linearize;
pub mod node;
pub mod output;
pub mod reduce;
pub mod session;
pub mod signal;
pub mod view;

pub use config::{Config, ParserConfig, UnmatchedSuiteEnd};
pub use error::{Result, RobotreeError};
pub use linearize::{Linearizer, LinearizerState};
pub use node::{LinearNode, NodeId, Status, SuiteNode, TestNode, TreeNode};
pub use reduce::reduce;
pub use session::{LogSession, SessionRegistry};
pub use view::ViewState;
