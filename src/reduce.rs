//! Folding the linear history into a nested suite/test tree.
//!
//! The reducer is a pure function of the history and is re-run from scratch
//! on every update. Node identities come straight from the linear nodes, so
//! the same history always yields the same tree.

use crate::classify::names_match;
use crate::config::UnmatchedSuiteEnd;
use crate::node::{LinearNode, NodeId, Status, SuiteNode, TreeNode};
use tracing::warn;

/// Suite under construction, plus the raw line it was opened with.
struct OpenSuite {
    node: SuiteNode,
    original_line: String,
}

#[derive(Default)]
struct Reducer {
    root: Vec<TreeNode>,
    stack: Vec<OpenSuite>,
    /// The last child of the current container is a `RUNNING` test taking text.
    test_open: bool,
    policy: UnmatchedSuiteEnd,
}

/// Build the tree for a linear history.
///
/// Suites still open at the end of the history are kept with status
/// `RUNNING`.
pub fn reduce(history: &[LinearNode], policy: UnmatchedSuiteEnd) -> Vec<TreeNode> {
    let mut reducer = Reducer {
        policy,
        ..Reducer::default()
    };
    for node in history {
        reducer.apply(node);
    }
    reducer.finish()
}

impl Reducer {
    fn apply(&mut self, node: &LinearNode) {
        match node {
            LinearNode::SuiteStart {
                id,
                name,
                original_line,
                ..
            } => {
                self.test_open = false;
                self.stack.push(OpenSuite {
                    node: SuiteNode {
                        id: *id,
                        name: name.clone(),
                        documentation: None,
                        status: Status::Running,
                        summary: None,
                        children: Vec::new(),
                    },
                    original_line: original_line.clone(),
                });
            }
            LinearNode::SuiteEnd {
                id,
                name,
                documentation,
                status,
                summary,
            } => {
                self.test_open = false;
                self.close_suite(*id, name, documentation.as_deref(), *status, summary);
            }
            LinearNode::Test(test) => {
                self.test_open = test.status == Status::Running;
                self.container().push(TreeNode::Test(test.clone()));
            }
            LinearNode::Text { id, content } => {
                if self.test_open {
                    if let Some(TreeNode::Test(test)) = self.container().last_mut() {
                        test.logs.push(content.clone());
                        return;
                    }
                }
                self.container().push(TreeNode::Text {
                    id: *id,
                    content: content.clone(),
                });
            }
        }
    }

    fn container(&mut self) -> &mut Vec<TreeNode> {
        match self.stack.last_mut() {
            Some(open) => &mut open.node.children,
            None => &mut self.root,
        }
    }

    fn close_suite(
        &mut self,
        id: NodeId,
        name: &str,
        documentation: Option<&str>,
        status: Status,
        summary: &str,
    ) {
        let matched = self.stack.iter().rposition(|open| {
            names_match(&open.node.name, name) || names_match(&open.original_line, name)
        });
        let position = match (matched, self.policy) {
            (Some(position), _) => position,
            (None, UnmatchedSuiteEnd::CloseTop) if !self.stack.is_empty() => {
                warn!(suite = %name, id = %id, "suite end matches no open suite, closing innermost");
                self.stack.len() - 1
            }
            (None, _) => {
                warn!(suite = %name, id = %id, "suite end matches no open suite, dropping it");
                return;
            }
        };

        // suites above the match stay RUNNING inside it
        while self.stack.len() > position + 1 {
            self.pop_into_parent();
        }
        if let Some(open) = self.stack.last_mut() {
            open.node.status = status;
            open.node.summary = Some(summary.to_string());
            if let Some(doc) = documentation {
                open.node.documentation = Some(doc.to_string());
            }
        }
        self.pop_into_parent();
    }

    fn pop_into_parent(&mut self) {
        if let Some(open) = self.stack.pop() {
            self.container().push(TreeNode::Suite(open.node));
        }
    }

    fn finish(mut self) -> Vec<TreeNode> {
        while !self.stack.is_empty() {
            self.pop_into_parent();
        }
        self.root
    }
}

/// Depth-first walk over every node of a tree.
pub fn walk<'a>(nodes: &'a [TreeNode], visit: &mut impl FnMut(&'a TreeNode, usize)) {
    fn go<'a>(nodes: &'a [TreeNode], depth: usize, visit: &mut impl FnMut(&'a TreeNode, usize)) {
        for node in nodes {
            visit(node, depth);
            go(node.children(), depth + 1, visit);
        }
    }
    go(nodes, 0, visit);
}

/// Raw lines represented by a tree: standalone text plus every test log line.
pub fn count_lines(nodes: &[TreeNode]) -> usize {
    let mut total = 0;
    walk(nodes, &mut |node, _| match node {
        TreeNode::Text { .. } => total += 1,
        TreeNode::Test(test) => total += test.logs.len(),
        TreeNode::Suite(_) => {}
    });
    total
}
