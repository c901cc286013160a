//! Incremental linearization of console output into structural events.
//!
//! The [`Linearizer`] consumes only the lines it has not seen yet and appends
//! [`LinearNode`]s to a persisted history. All cross-batch memory (cursor,
//! unattributed text run, active fail group) lives in [`LinearizerState`], a
//! plain serializable value, so a stream restart is a state replacement.
//!
//! A status line alone is ambiguous: followed by a summary line it closes a
//! suite, otherwise it closes a test. A status line on the last available line
//! is therefore never consumed until its successor arrives (or the stream is
//! declared finished).

use crate::classify::{
    is_double_divider, is_single_divider, is_suite_header, is_summary_line,
    is_system_or_artifact, names_match, normalize_name, parse_status_line, StatusLine,
};
use crate::config::ParserConfig;
use crate::node::{split_documentation, LinearNode, NodeId, Status, TestNode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything the linearizer remembers between invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearizerState {
    /// Number of raw lines already consumed.
    pub cursor: usize,
    /// Largest total line count seen; a smaller one signals a restarted stream.
    pub observed: usize,
    /// Append-only structural history.
    pub history: Vec<LinearNode>,
    /// Start of the trailing run of text nodes not yet attributed to a test.
    pub buffer_start: usize,
    /// History index of the failed test currently collecting failure detail.
    pub active_fail: Option<usize>,
}

/// Stateful, incremental line-to-event converter for one stream.
#[derive(Debug, Clone, Default)]
pub struct Linearizer {
    state: LinearizerState,
    config: ParserConfig,
}

impl Linearizer {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            state: LinearizerState::default(),
            config,
        }
    }

    /// Resume from a previously captured state.
    pub fn from_state(state: LinearizerState, config: ParserConfig) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &LinearizerState {
        &self.state
    }

    pub fn history(&self) -> &[LinearNode] {
        &self.state.history
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    /// Drop all accumulated state: history, cursor, buffer and fail group together.
    pub fn reset(&mut self) {
        self.state = LinearizerState::default();
    }

    /// Lines the linearizer has not consumed yet.
    pub fn pending<'a, S: AsRef<str>>(&self, lines: &'a [S]) -> &'a [S] {
        lines.get(self.state.cursor..).unwrap_or(&[])
    }

    /// Process every line after the cursor. Returns the number of lines consumed.
    ///
    /// `lines` is the full arrival-ordered history of the stream. Calling this
    /// again with the same lines is a no-op.
    pub fn update<S: AsRef<str>>(&mut self, lines: &[S]) -> usize {
        self.advance(lines, false)
    }

    /// Like [`update`](Self::update), but no further lines will arrive, so a
    /// trailing status line is resolved as a test end.
    pub fn finish<S: AsRef<str>>(&mut self, lines: &[S]) -> usize {
        self.advance(lines, true)
    }

    fn advance<S: AsRef<str>>(&mut self, lines: &[S], end_of_stream: bool) -> usize {
        if lines.len() < self.state.observed {
            info!(
                previous = self.state.observed,
                current = lines.len(),
                "line stream restarted, resetting linearizer"
            );
            self.reset();
        }
        self.state.observed = lines.len();

        let start = self.state.cursor;
        let mut cursor = start;
        while cursor < lines.len() {
            let line = lines[cursor].as_ref();
            if let Some(status) = parse_status_line(line) {
                match lines.get(cursor + 1).map(|next| next.as_ref()) {
                    None if !end_of_stream => break,
                    Some(next) if is_summary_line(next) => {
                        self.close_suite(cursor, status, next);
                        cursor += 2;
                    }
                    _ => {
                        self.close_test(cursor, line, status);
                        cursor += 1;
                    }
                }
                continue;
            }
            self.consume_plain(cursor, line);
            cursor += 1;
        }
        self.state.cursor = cursor;
        cursor - start
    }

    fn consume_plain(&mut self, index: usize, line: &str) {
        if is_double_divider(line) {
            self.state.active_fail = None;
            self.on_double_divider(index, line);
            return;
        }
        if is_single_divider(line) || is_system_or_artifact(line) {
            self.state.active_fail = None;
            self.push_text(index, line);
            return;
        }
        if let Some(at) = self.state.active_fail {
            if let Some(LinearNode::Test(test)) = self.state.history.get_mut(at) {
                test.logs.push(line.to_string());
                return;
            }
        }
        self.push_text(index, line);
    }

    fn on_double_divider(&mut self, index: usize, line: &str) {
        let last_is_summary = self
            .state
            .history
            .last()
            .and_then(LinearNode::as_text)
            .is_some_and(is_summary_line);
        if last_is_summary && self.close_suite_from_text() {
            self.push_text(index, line);
            return;
        }
        if !self.open_suite_from_sandwich() {
            self.push_text(index, line);
        }
    }

    /// `====` / name / `====` becomes a suite start. A divider shared with a
    /// preceding suite boundary is never popped.
    fn open_suite_from_sandwich(&mut self) -> bool {
        let len = self.state.history.len();
        if len <= self.state.buffer_start {
            return false;
        }
        let name_line = match self.state.history[len - 1].as_text() {
            Some(text) if is_suite_name_candidate(text) => text.to_string(),
            _ => return false,
        };
        let header_lines = match len.checked_sub(2).map(|i| &self.state.history[i]) {
            Some(LinearNode::Text { content, .. }) if is_double_divider(content) => 3,
            Some(LinearNode::SuiteStart { .. } | LinearNode::SuiteEnd { .. }) => 2,
            _ => return false,
        };

        let id = self.state.history[len - 1].id();
        // name line, plus the opening divider when it is not shared
        self.state.history.truncate(len + 1 - header_lines);

        let original_line = name_line.trim().to_string();
        let (name, _) = split_documentation(&original_line);
        debug!(suite = %name, id = %id, "suite started");
        self.push_structural(LinearNode::SuiteStart {
            id,
            name,
            original_line,
            header_lines,
        });
        true
    }

    /// Recover a suite end whose status and summary lines were stored as text.
    fn close_suite_from_text(&mut self) -> bool {
        let len = self.state.history.len();
        let Some(summary_at) = len.checked_sub(1) else {
            return false;
        };
        let floor = summary_at.saturating_sub(self.config.summary_lookback);

        let mut found = None;
        for at in (floor..summary_at).rev() {
            let Some(text) = self.state.history[at].as_text() else {
                break;
            };
            if let Some(status) = parse_status_line(text) {
                found = Some((at, status));
                break;
            }
        }
        let Some((status_at, status)) = found else {
            return false;
        };

        let summary = self.state.history.remove(summary_at);
        let summary = summary.as_text().unwrap_or_default().trim().to_string();
        let id = self.state.history.remove(status_at).id();
        debug!(suite = %status.name, id = %id, "suite closed from buffered text");
        self.push_structural(LinearNode::SuiteEnd {
            id,
            name: status.name,
            documentation: status.documentation,
            status: status.status,
            summary,
        });
        true
    }

    fn close_suite(&mut self, index: usize, status: StatusLine, summary: &str) {
        debug!(suite = %status.name, status = %status.status, "suite ended");
        self.push_structural(LinearNode::SuiteEnd {
            id: NodeId(index),
            name: status.name,
            documentation: status.documentation,
            status: status.status,
            summary: summary.trim().to_string(),
        });
    }

    fn close_test(&mut self, index: usize, line: &str, status: StatusLine) {
        let region_start = self.state.buffer_start.min(self.state.history.len());
        let name_at = find_name_line(&self.state.history[region_start..], &status.name)
            .map(|offset| region_start + offset);

        let mut logs = Vec::new();
        let mut id = NodeId(index);
        let mut line_parts = None;
        if let Some(at) = name_at {
            id = self.state.history[at].id();
            line_parts = self.state.history[at]
                .as_text()
                .map(split_documentation)
                .filter(|(name, _)| !name.is_empty());
            logs.extend(
                self.state
                    .history
                    .drain(at..)
                    .filter_map(|node| match node {
                        LinearNode::Text { content, .. } => Some(content),
                        _ => None,
                    }),
            );
        }
        logs.push(line.to_string());

        // Robot cuts long status-line names with `...`; the name line has them whole.
        let shortened = status.raw_name.ends_with("...");
        let (name, documentation) = match line_parts {
            Some((line_name, line_doc))
                if status.name.is_empty()
                    || (shortened && names_match(&line_name, &status.name)) =>
            {
                (line_name, line_doc.or(status.documentation))
            }
            _ if !status.name.is_empty() => (status.name, status.documentation),
            _ => {
                debug!(id = %id, "no test name found, using placeholder");
                (self.config.placeholder_test_name.clone(), status.documentation)
            }
        };

        debug!(test = %name, status = %status.status, "test ended");
        let failed = status.status == Status::Fail;
        self.push_structural(LinearNode::Test(TestNode {
            id,
            name,
            documentation,
            status: status.status,
            logs,
        }));
        if failed {
            self.state.active_fail = Some(self.state.history.len() - 1);
        }
    }

    fn push_text(&mut self, index: usize, line: &str) {
        self.state.history.push(LinearNode::Text {
            id: NodeId(index),
            content: line.to_string(),
        });
    }

    fn push_structural(&mut self, node: LinearNode) {
        self.state.active_fail = None;
        self.state.history.push(node);
        self.state.buffer_start = self.state.history.len();
    }

    /// History with in-progress content projected in.
    ///
    /// Unattributed trailing text and pending lines are appended as text; the
    /// first line that could name a test becomes a `RUNNING` test so the
    /// reducer routes the lines after it into that test's logs.
    pub fn live_history<S: AsRef<str>>(&self, lines: &[S]) -> Vec<LinearNode> {
        let mut history = self.state.history.clone();
        let pending_start = history.len();
        history.extend(self.pending(lines).iter().enumerate().map(|(i, line)| {
            LinearNode::Text {
                id: NodeId(self.state.cursor + i),
                content: line.as_ref().to_string(),
            }
        }));
        if self.state.active_fail.is_some() {
            return history;
        }

        let region_start = self.state.buffer_start.min(pending_start);
        let candidate = (region_start..history.len()).find(|&at| {
            history[at]
                .as_text()
                .is_some_and(|text| is_name_candidate(text) && !is_live_noise(text))
                && !opens_suite_header(&history, at)
        });
        if let Some(at) = candidate {
            if let LinearNode::Text { id, content } = &history[at] {
                let (name, documentation) = split_documentation(content);
                history[at] = LinearNode::Test(TestNode {
                    id: *id,
                    name,
                    documentation,
                    status: Status::Running,
                    logs: vec![content.clone()],
                });
            }
        }
        history
    }
}

/// Locate the buffered line naming a test.
///
/// Order matters: first a line starting with the status name, then one
/// containing it, then the first non-empty line that is neither a divider nor
/// a suite header.
fn find_name_line(region: &[LinearNode], status_name: &str) -> Option<usize> {
    let wanted = normalize_name(status_name);
    let texts = || {
        region
            .iter()
            .enumerate()
            .filter_map(|(i, node)| node.as_text().map(|text| (i, text.trim())))
    };
    if !wanted.is_empty() {
        if let Some((i, _)) = texts().find(|(_, text)| text.starts_with(wanted)) {
            return Some(i);
        }
        if let Some((i, _)) = texts().find(|(_, text)| text.contains(wanted)) {
            return Some(i);
        }
    }
    texts()
        .find(|(_, text)| is_name_candidate(text))
        .map(|(i, _)| i)
}

/// The node at `at` sits right after a `====` divider or a suite end, where a
/// suite name goes rather than a test name.
fn opens_suite_header(history: &[LinearNode], at: usize) -> bool {
    match at.checked_sub(1).map(|prev| &history[prev]) {
        Some(LinearNode::Text { content, .. }) => is_double_divider(content),
        Some(LinearNode::SuiteEnd { .. }) => true,
        _ => false,
    }
}

fn is_name_candidate(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && !is_double_divider(text) && !is_single_divider(text) && !is_suite_header(text)
}

fn is_live_noise(text: &str) -> bool {
    is_system_or_artifact(text) || is_summary_line(text) || parse_status_line(text).is_some()
}

fn is_suite_name_candidate(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty()
        && !is_double_divider(trimmed)
        && !is_single_divider(trimmed)
        && !is_system_or_artifact(trimmed)
        && !is_summary_line(trimmed)
        && parse_status_line(trimmed).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EQ: &str = "==============================================================================";
    const DASH: &str = "------------------------------------------------------------------------------";

    fn linearize(lines: &[&str]) -> Linearizer {
        let mut linearizer = Linearizer::default();
        linearizer.update(lines);
        linearizer
    }

    fn kinds(history: &[LinearNode]) -> Vec<&'static str> {
        history
            .iter()
            .map(|node| match node {
                LinearNode::Text { .. } => "text",
                LinearNode::SuiteStart { .. } => "start",
                LinearNode::Test(_) => "test",
                LinearNode::SuiteEnd { .. } => "end",
            })
            .collect()
    }

    fn accounted(linearizer: &Linearizer) -> usize {
        linearizer.history().iter().map(LinearNode::line_count).sum()
    }

    fn sample_run() -> Vec<&'static str> {
        vec![
            EQ,
            "Mobile",
            EQ,
            "Mobile.Login :: Login flows",
            EQ,
            "Valid Login :: happy path                                     | PASS |",
            DASH,
            "Invalid Login                                                 | FAIL |",
            "Element 'id=error' did not appear in 5 seconds.",
            "Screenshot saved to selenium-1.png",
            DASH,
            "Mobile.Login :: Login flows                                   | FAIL |",
            "2 tests, 1 passed, 1 failed",
            EQ,
            "Mobile.Settings",
            EQ,
            "[ WARN ] Keyword 'Tap' is deprecated.",
            "Toggle Wifi                                                   | PASS |",
            DASH,
            "Mobile.Settings                                               | PASS |",
            "1 test, 1 passed, 0 failed",
            EQ,
            "Mobile                                                        | FAIL |",
            "3 tests, 2 passed, 1 failed",
            EQ,
            "Output:  /tmp/results/output.xml",
            "Log:     /tmp/results/log.html",
            "Report:  /tmp/results/report.html",
        ]
    }

    #[test]
    fn test_end_to_end_history() {
        let lines = [
            "==========",
            "Suite A",
            "==========",
            "Test 1 | PASS |",
            "Suite A | PASS |",
            "1 tests, 1 passed, 0 failed",
        ];
        let linearizer = linearize(&lines);
        assert_eq!(kinds(linearizer.history()), vec!["start", "test", "end"]);
        assert_eq!(linearizer.cursor(), 6);
        match &linearizer.history()[0] {
            LinearNode::SuiteStart {
                id,
                name,
                header_lines,
                ..
            } => {
                assert_eq!(*id, NodeId(1));
                assert_eq!(name, "Suite A");
                assert_eq!(*header_lines, 3);
            }
            other => panic!("expected suite start, got {:?}", other),
        }
    }

    #[test]
    fn test_status_line_deferred_until_successor() {
        let mut lines = vec!["MyTest | PASS |".to_string()];
        let mut linearizer = Linearizer::default();
        assert_eq!(linearizer.update(&lines), 0);
        assert!(linearizer.history().is_empty());
        assert_eq!(linearizer.pending(&lines), &lines[..]);

        // repeated ticks with no new input stay deferred
        assert_eq!(linearizer.update(&lines), 0);
        assert!(linearizer.history().is_empty());

        lines.push("5 tests, 5 passed, 0 failed".to_string());
        assert_eq!(linearizer.update(&lines), 2);
        assert_eq!(kinds(linearizer.history()), vec!["end"]);
        match &linearizer.history()[0] {
            LinearNode::SuiteEnd { name, summary, .. } => {
                assert_eq!(name, "MyTest");
                assert_eq!(summary, "5 tests, 5 passed, 0 failed");
            }
            other => panic!("expected suite end, got {:?}", other),
        }
    }

    #[test]
    fn test_status_line_resolves_to_test_when_successor_is_not_summary() {
        let mut lines = vec!["MyTest | PASS |".to_string()];
        let mut linearizer = Linearizer::default();
        linearizer.update(&lines);
        lines.push("NextTest".to_string());
        assert_eq!(linearizer.update(&lines), 2);
        assert_eq!(kinds(linearizer.history()), vec!["test", "text"]);
        match &linearizer.history()[0] {
            LinearNode::Test(test) => {
                assert_eq!(test.name, "MyTest");
                assert_eq!(test.status, Status::Pass);
                assert_eq!(test.logs, vec!["MyTest | PASS |"]);
            }
            other => panic!("expected test, got {:?}", other),
        }
    }

    #[test]
    fn test_finish_resolves_trailing_status_as_test() {
        let lines = ["Only Test | FAIL |"];
        let mut linearizer = Linearizer::default();
        linearizer.update(&lines);
        assert!(linearizer.history().is_empty());
        assert_eq!(linearizer.finish(&lines), 1);
        assert_eq!(kinds(linearizer.history()), vec!["test"]);
    }

    #[test]
    fn test_fail_detail_captured_until_divider() {
        let lines = ["T1 | FAIL |", "AssertionError: x != y", "----------"];
        let linearizer = linearize(&lines);
        assert_eq!(kinds(linearizer.history()), vec!["test", "text"]);
        match &linearizer.history()[0] {
            LinearNode::Test(test) => {
                assert_eq!(test.status, Status::Fail);
                assert_eq!(test.logs, vec!["T1 | FAIL |", "AssertionError: x != y"]);
            }
            other => panic!("expected test, got {:?}", other),
        }
        assert_eq!(linearizer.history()[1].as_text(), Some("----------"));
        assert_eq!(linearizer.state().active_fail, None);
    }

    #[test]
    fn test_fail_group_ends_at_system_line() {
        let lines = ["T1 | FAIL |", "detail", "[ ERROR ] boom", "after"];
        let linearizer = linearize(&lines);
        assert_eq!(kinds(linearizer.history()), vec!["test", "text", "text"]);
        match &linearizer.history()[0] {
            LinearNode::Test(test) => assert_eq!(test.logs.len(), 2),
            other => panic!("expected test, got {:?}", other),
        }
    }

    #[test]
    fn test_buffered_name_line_is_attached_to_test() {
        let lines = [
            "noise before",
            "Open App :: starts the app",
            "keyword output",
            "Open App :: starts the...   | PASS |",
            DASH,
        ];
        let linearizer = linearize(&lines);
        assert_eq!(kinds(linearizer.history()), vec!["text", "test", "text"]);
        match &linearizer.history()[1] {
            LinearNode::Test(test) => {
                assert_eq!(test.id, NodeId(1));
                assert_eq!(test.name, "Open App");
                assert_eq!(test.documentation.as_deref(), Some("starts the app"));
                assert_eq!(
                    test.logs,
                    vec![
                        "Open App :: starts the app",
                        "keyword output",
                        "Open App :: starts the...   | PASS |"
                    ]
                );
            }
            other => panic!("expected test, got {:?}", other),
        }
    }

    #[test]
    fn test_shortened_status_name_takes_full_name_line() {
        let lines = [
            "Verify Checkout Total Includes Shipping And Regional Tax :: full doc",
            "keyword output",
            "Verify Checkout Total Includes Shipping And Regi...  | PASS |",
            DASH,
        ];
        let linearizer = linearize(&lines);
        assert_eq!(kinds(linearizer.history()), vec!["test", "text"]);
        match &linearizer.history()[0] {
            LinearNode::Test(test) => {
                assert_eq!(
                    test.name,
                    "Verify Checkout Total Includes Shipping And Regional Tax"
                );
                assert_eq!(test.documentation.as_deref(), Some("full doc"));
                assert_eq!(test.id, NodeId(0));
                assert_eq!(test.logs.len(), 3);
            }
            other => panic!("expected test, got {:?}", other),
        }
    }

    #[test]
    fn test_full_status_name_is_kept_over_longer_name_line() {
        let lines = ["Checkout flow", "Checkout | PASS |", DASH];
        let linearizer = linearize(&lines);
        match &linearizer.history()[0] {
            LinearNode::Test(test) => {
                assert_eq!(test.name, "Checkout");
                assert_eq!(test.logs, vec!["Checkout flow", "Checkout | PASS |"]);
            }
            other => panic!("expected test, got {:?}", other),
        }
    }

    #[test]
    fn test_name_lookup_prefers_prefix_then_substring_then_first_line() {
        // substring match wins over the first plain line
        let lines = ["first line", "log: running Checkout now", "Checkout | PASS |", DASH];
        let linearizer = linearize(&lines);
        assert_eq!(kinds(linearizer.history()), vec!["text", "test", "text"]);

        // prefix match wins over an earlier substring match
        let lines = ["about Checkout", "Checkout flow", "Checkout | PASS |", DASH];
        let linearizer = linearize(&lines);
        assert_eq!(kinds(linearizer.history()), vec!["text", "test", "text"]);

        // no match: first non-special line is taken, dividers and headers skipped
        let lines = [DASH, "Top.Sub :: doc", "some output", "Other | PASS |", DASH];
        let linearizer = linearize(&lines);
        assert_eq!(
            kinds(linearizer.history()),
            vec!["text", "text", "test", "text"]
        );
        match &linearizer.history()[2] {
            LinearNode::Test(test) => {
                assert_eq!(test.name, "Other");
                assert_eq!(test.logs, vec!["some output", "Other | PASS |"]);
            }
            other => panic!("expected test, got {:?}", other),
        }
    }

    #[test]
    fn test_placeholder_name_when_nothing_identifies_test() {
        let lines = ["| PASS |", DASH];
        let linearizer = linearize(&lines);
        match &linearizer.history()[0] {
            LinearNode::Test(test) => assert_eq!(test.name, "Unnamed Test"),
            other => panic!("expected test, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_status_name_uses_buffered_line() {
        let lines = ["Scroll List :: doc", "| FAIL |", DASH];
        let linearizer = linearize(&lines);
        match &linearizer.history()[0] {
            LinearNode::Test(test) => {
                assert_eq!(test.name, "Scroll List");
                assert_eq!(test.id, NodeId(0));
            }
            other => panic!("expected test, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_divider_between_suites_is_not_popped() {
        let lines = [EQ, "Top", EQ, "Top.Child", EQ];
        let linearizer = linearize(&lines);
        assert_eq!(kinds(linearizer.history()), vec!["start", "start"]);
        match &linearizer.history()[1] {
            LinearNode::SuiteStart {
                name, header_lines, ..
            } => {
                assert_eq!(name, "Top.Child");
                assert_eq!(*header_lines, 2);
            }
            other => panic!("expected suite start, got {:?}", other),
        }
        assert_eq!(accounted(&linearizer), lines.len());
    }

    #[test]
    fn test_suite_start_keeps_original_line() {
        let lines = [EQ, "Mobile.Login :: Login flows", EQ];
        let linearizer = linearize(&lines);
        match &linearizer.history()[0] {
            LinearNode::SuiteStart {
                name,
                original_line,
                ..
            } => {
                assert_eq!(name, "Mobile.Login");
                assert_eq!(original_line, "Mobile.Login :: Login flows");
            }
            other => panic!("expected suite start, got {:?}", other),
        }
    }

    #[test]
    fn test_lone_divider_stays_text() {
        let linearizer = linearize(&[EQ, EQ, "[System] starting", EQ]);
        assert_eq!(kinds(linearizer.history()), vec!["text"; 4]);
    }

    #[test]
    fn test_suite_close_recovered_from_text() {
        let mut linearizer = Linearizer::from_state(
            LinearizerState {
                cursor: 3,
                observed: 3,
                history: vec![
                    LinearNode::Text {
                        id: NodeId(0),
                        content: "Suite X | PASS |".into(),
                    },
                    LinearNode::Text {
                        id: NodeId(1),
                        content: "STDERR: late output".into(),
                    },
                    LinearNode::Text {
                        id: NodeId(2),
                        content: "3 tests, 3 passed, 0 failed".into(),
                    },
                ],
                buffer_start: 0,
                active_fail: None,
            },
            ParserConfig::default(),
        );
        let lines = [
            "Suite X | PASS |",
            "STDERR: late output",
            "3 tests, 3 passed, 0 failed",
            EQ,
        ];
        linearizer.update(&lines);
        assert_eq!(kinds(linearizer.history()), vec!["text", "end", "text"]);
        match &linearizer.history()[1] {
            LinearNode::SuiteEnd { id, summary, .. } => {
                assert_eq!(*id, NodeId(0));
                assert_eq!(summary, "3 tests, 3 passed, 0 failed");
            }
            other => panic!("expected suite end, got {:?}", other),
        }
    }

    #[test]
    fn test_suite_close_lookback_is_bounded() {
        let mut history = vec![LinearNode::Text {
            id: NodeId(0),
            content: "Suite X | PASS |".into(),
        }];
        for i in 1..=6 {
            history.push(LinearNode::Text {
                id: NodeId(i),
                content: format!("filler {i}"),
            });
        }
        history.push(LinearNode::Text {
            id: NodeId(7),
            content: "1 test, 1 passed, 0 failed".into(),
        });
        let state = LinearizerState {
            cursor: 8,
            observed: 8,
            history,
            buffer_start: 0,
            active_fail: None,
        };
        let mut linearizer = Linearizer::from_state(state, ParserConfig::default());
        let mut lines: Vec<String> = (0..8).map(|i| format!("line {i}")).collect();
        lines.push(EQ.to_string());
        linearizer.update(&lines);
        assert!(linearizer.history().iter().all(LinearNode::is_text));
    }

    #[test]
    fn test_incremental_matches_single_batch_for_every_split() {
        let lines = sample_run();
        let whole = linearize(&lines);

        for split in 0..=lines.len() {
            let mut incremental = Linearizer::default();
            incremental.update(&lines[..split]);
            incremental.update(&lines);
            assert_eq!(
                incremental.history(),
                whole.history(),
                "split at {split} diverged"
            );
            assert_eq!(incremental.cursor(), whole.cursor());
        }
    }

    #[test]
    fn test_line_by_line_matches_single_batch() {
        let lines = sample_run();
        let whole = linearize(&lines);
        let mut incremental = Linearizer::default();
        for end in 0..=lines.len() {
            incremental.update(&lines[..end]);
            incremental.update(&lines[..end]);
        }
        assert_eq!(incremental.state(), whole.state());
    }

    #[test]
    fn test_no_line_is_lost() {
        let lines = sample_run();
        let mut linearizer = Linearizer::default();
        for end in 0..=lines.len() {
            linearizer.update(&lines[..end]);
            assert_eq!(accounted(&linearizer), linearizer.cursor());
            assert_eq!(
                linearizer.cursor() + linearizer.pending(&lines[..end]).len(),
                end
            );
        }
        assert_eq!(accounted(&linearizer), lines.len());
    }

    #[test]
    fn test_sample_run_structure() {
        let linearizer = linearize(&sample_run());
        assert_eq!(
            kinds(linearizer.history()),
            vec![
                "start", "start", "test", "text", "test", "text", "end", "start", "test",
                "text", "end", "text", "end", "text", "text", "text", "text"
            ]
        );
        // the fallback name lookup swallows the warning line into the test
        match &linearizer.history()[8] {
            LinearNode::Test(test) => {
                assert_eq!(test.name, "Toggle Wifi");
                assert_eq!(test.logs.len(), 2);
            }
            other => panic!("expected test, got {:?}", other),
        }
        match &linearizer.history()[4] {
            LinearNode::Test(test) => {
                assert_eq!(test.name, "Invalid Login");
                assert_eq!(test.logs.len(), 3);
            }
            other => panic!("expected test, got {:?}", other),
        }
    }

    #[test]
    fn test_rollback_resets_state() {
        let lines = sample_run();
        let mut linearizer = Linearizer::default();
        linearizer.update(&lines);

        let restarted = ["Fresh | PASS |", DASH];
        linearizer.update(&restarted);
        assert_eq!(linearizer.cursor(), 2);
        assert_eq!(kinds(linearizer.history()), vec!["test", "text"]);
        assert_eq!(linearizer.state().observed, 2);
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let lines = sample_run();
        let mut linearizer = Linearizer::default();
        linearizer.update(&lines[..10]);

        let json = serde_json::to_string(linearizer.state()).unwrap();
        let state: LinearizerState = serde_json::from_str(&json).unwrap();
        let mut resumed = Linearizer::from_state(state, ParserConfig::default());
        resumed.update(&lines);

        assert_eq!(resumed.history(), linearize(&lines).history());
    }

    #[test]
    fn test_live_history_projects_running_test() {
        let lines = [EQ, "Suite A", EQ, "Scroll Feed", "scrolling...", "Scroll Feed | PASS |"];
        let linearizer = linearize(&lines);
        assert_eq!(linearizer.pending(&lines).len(), 1);

        let live = linearizer.live_history(&lines);
        assert_eq!(kinds(&live), vec!["start", "test", "text", "text"]);
        match &live[1] {
            LinearNode::Test(test) => {
                assert_eq!(test.status, Status::Running);
                assert_eq!(test.name, "Scroll Feed");
                assert_eq!(test.id, NodeId(3));
            }
            other => panic!("expected running test, got {:?}", other),
        }
        // the persisted history is untouched
        assert_eq!(kinds(linearizer.history()), vec!["start", "text", "text"]);
    }

    #[test]
    fn test_live_history_does_not_project_suite_name_as_test() {
        let lines = ["==========", "Mobile"];
        let linearizer = linearize(&lines);
        let live = linearizer.live_history(&lines);
        assert_eq!(kinds(&live), vec!["text", "text"]);

        // once the header closes, the same line is a suite start
        let lines = ["==========", "Mobile", "==========", "Login"];
        let linearizer = linearize(&lines);
        let live = linearizer.live_history(&lines);
        assert_eq!(kinds(&live), vec!["start", "test"]);
        assert_eq!(live[0].id(), NodeId(1));
    }

    #[test]
    fn test_live_history_leaves_fail_detail_alone() {
        let lines = ["T1 | FAIL |", "detail", "more detail"];
        let linearizer = linearize(&lines);
        let live = linearizer.live_history(&lines);
        assert_eq!(kinds(&live), vec!["test"]);
    }
}
