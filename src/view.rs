//! Open/closed bookkeeping for rendering a tree.
//!
//! The tree is rebuilt on every update, so user choices are stored as a set
//! of toggled [`NodeId`]s. A toggle flips a node relative to its default:
//! suites start open, tests start open while running or after failing.

use crate::node::{NodeId, Status, TreeNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What a [`Row`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Suite,
    Test,
    Text,
    /// A captured log line under an open test.
    Log,
}

/// One visible line of a flattened tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub id: NodeId,
    pub depth: usize,
    pub kind: RowKind,
    pub label: String,
    pub detail: Option<String>,
    pub status: Option<Status>,
    pub open: bool,
}

/// User toggles, keyed by stable node id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    toggled: BTreeSet<NodeId>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a node relative to its default.
    pub fn toggle(&mut self, id: NodeId) {
        if !self.toggled.remove(&id) {
            self.toggled.insert(id);
        }
    }

    pub fn is_toggled(&self, id: NodeId) -> bool {
        self.toggled.contains(&id)
    }

    pub fn is_open(&self, node: &TreeNode) -> bool {
        default_open(node) != self.is_toggled(node.id())
    }

    /// Forget toggles for nodes that no longer exist, e.g. after a stream reset.
    pub fn retain_present(&mut self, tree: &[TreeNode]) {
        let mut present = BTreeSet::new();
        crate::reduce::walk(tree, &mut |node, _| {
            present.insert(node.id());
        });
        self.toggled.retain(|id| present.contains(id));
    }

    pub fn clear(&mut self) {
        self.toggled.clear();
    }

    /// Flatten the visible part of a tree, depth first.
    ///
    /// Children of closed nodes are skipped. Test log lines are emitted as
    /// [`RowKind::Log`] rows only when `show_logs` is set.
    pub fn rows(&self, tree: &[TreeNode], show_logs: bool) -> Vec<Row> {
        let mut rows = Vec::new();
        self.push_rows(tree, 0, show_logs, &mut rows);
        rows
    }

    fn push_rows(&self, nodes: &[TreeNode], depth: usize, show_logs: bool, rows: &mut Vec<Row>) {
        for node in nodes {
            let open = self.is_open(node);
            match node {
                TreeNode::Suite(suite) => {
                    rows.push(Row {
                        id: suite.id,
                        depth,
                        kind: RowKind::Suite,
                        label: suite.name.clone(),
                        detail: suite.summary.clone(),
                        status: Some(suite.status),
                        open,
                    });
                    if open {
                        self.push_rows(&suite.children, depth + 1, show_logs, rows);
                    }
                }
                TreeNode::Test(test) => {
                    rows.push(Row {
                        id: test.id,
                        depth,
                        kind: RowKind::Test,
                        label: test.name.clone(),
                        detail: test.documentation.clone(),
                        status: Some(test.status),
                        open,
                    });
                    if open && show_logs {
                        rows.extend(test.logs.iter().map(|line| Row {
                            id: test.id,
                            depth: depth + 1,
                            kind: RowKind::Log,
                            label: line.clone(),
                            detail: None,
                            status: None,
                            open: false,
                        }));
                    }
                }
                TreeNode::Text { id, content } => rows.push(Row {
                    id: *id,
                    depth,
                    kind: RowKind::Text,
                    label: content.clone(),
                    detail: None,
                    status: None,
                    open: false,
                }),
            }
        }
    }
}

/// Open/closed state of a node nobody has toggled.
pub fn default_open(node: &TreeNode) -> bool {
    match node {
        TreeNode::Suite(_) => true,
        TreeNode::Test(test) => matches!(test.status, Status::Running | Status::Fail),
        TreeNode::Text { .. } => false,
    }
}
