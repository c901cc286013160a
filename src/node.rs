//! Node types shared by the linearizer, the reducer and the view layer.
//!
//! Every node carries a [`NodeId`] derived from the position of the raw line
//! it originates from, so rebuilding a tree from the same linear history
//! always yields the same identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stream-position identity of a node.
///
/// The wrapped value is the zero-based index of the raw line that defines the
/// node: the line itself for text, the name line for a suite start, the status
/// line for a suite end, and the first captured line for a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Terminal (or in-flight) result of a test or suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
    Running,
}

impl Status {
    /// Parse the status cell of a status line.
    pub fn from_cell(cell: &str) -> Option<Self> {
        match cell.trim() {
            "PASS" => Some(Status::Pass),
            "FAIL" => Some(Status::Fail),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Running => "RUNNING",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A test record, shared verbatim between the linear history and the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestNode {
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub status: Status,
    /// Every raw line belonging to this test, in arrival order.
    pub logs: Vec<String>,
}

/// One entry of the flat, append-only history produced by the linearizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinearNode {
    Text {
        id: NodeId,
        content: String,
    },
    SuiteStart {
        id: NodeId,
        name: String,
        original_line: String,
        /// Raw lines folded into this boundary (name line plus dividers).
        header_lines: usize,
    },
    Test(TestNode),
    SuiteEnd {
        id: NodeId,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        documentation: Option<String>,
        status: Status,
        summary: String,
    },
}

impl LinearNode {
    pub fn id(&self) -> NodeId {
        match self {
            LinearNode::Text { id, .. }
            | LinearNode::SuiteStart { id, .. }
            | LinearNode::SuiteEnd { id, .. } => *id,
            LinearNode::Test(test) => test.id,
        }
    }

    /// Text content if this is a plain text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LinearNode::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, LinearNode::Text { .. })
    }

    /// Number of raw input lines this node accounts for.
    pub fn line_count(&self) -> usize {
        match self {
            LinearNode::Text { .. } => 1,
            LinearNode::SuiteStart { header_lines, .. } => *header_lines,
            LinearNode::Test(test) => test.logs.len(),
            // closing status line plus its summary line
            LinearNode::SuiteEnd { .. } => 2,
        }
    }
}

/// Reconstructed, nested view of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Text {
        id: NodeId,
        content: String,
    },
    Test(TestNode),
    Suite(SuiteNode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteNode {
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn id(&self) -> NodeId {
        match self {
            TreeNode::Text { id, .. } => *id,
            TreeNode::Test(test) => test.id,
            TreeNode::Suite(suite) => suite.id,
        }
    }

    pub fn status(&self) -> Option<Status> {
        match self {
            TreeNode::Text { .. } => None,
            TreeNode::Test(test) => Some(test.status),
            TreeNode::Suite(suite) => Some(suite.status),
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Suite(suite) => &suite.children,
            _ => &[],
        }
    }
}

/// Split a `name :: documentation` string into its two halves.
pub(crate) fn split_documentation(raw: &str) -> (String, Option<String>) {
    match raw.split_once("::") {
        Some((name, doc)) => {
            let doc = doc.trim();
            let doc = (!doc.is_empty()).then(|| doc.to_string());
            (name.trim().to_string(), doc)
        }
        None => (raw.trim().to_string(), None),
    }
}
