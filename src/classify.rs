//! Context-free line classification for Robot Framework console output.
//!
//! Every function here is a pure predicate over a single line. Structural
//! decisions that need neighbouring lines live in [`crate::linearize`].

use crate::node::{split_documentation, Status};
use regex::Regex;
use std::sync::LazyLock;

static DOUBLE_DIVIDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^={10,}$").expect("double divider pattern"));

static SINGLE_DIVIDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-{10,}$").expect("single divider pattern"));

static STATUS_LOOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\s*(?:PASS|FAIL)\s*\|").expect("loose status pattern"));

static STATUS_STRICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.*?)\s*\|\s*(PASS|FAIL)\s*\|\s*$").expect("strict status pattern")
});

static SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+ tests?, \d+ passed, \d+ failed").expect("summary pattern")
});

static SYSTEM_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:STDERR:\s*)?\[\s*(?i:system|error|warn|warning)\s*\]")
        .expect("system tag pattern")
});

static ARTIFACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:Output|Log|Report):\s*\S+").expect("artifact pattern")
});

static SUITE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[\w-]+(?:\.[\w -]+)+\s+::(?:\s|$)").expect("suite header pattern")
});

/// A status line split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Everything left of the status cell, trimmed (may include `:: doc`).
    pub raw_name: String,
    /// Display name: `raw_name` up to the first `::`.
    pub name: String,
    pub documentation: Option<String>,
    pub status: Status,
}

/// Line of ten or more `=`.
pub fn is_double_divider(line: &str) -> bool {
    DOUBLE_DIVIDER.is_match(line.trim())
}

/// Line of ten or more `-`.
pub fn is_single_divider(line: &str) -> bool {
    SINGLE_DIVIDER.is_match(line.trim())
}

pub fn is_divider(line: &str) -> bool {
    is_double_divider(line) || is_single_divider(line)
}

/// Quick check for a `| PASS |` / `| FAIL |` cell anywhere in the line.
pub fn is_status_line(line: &str) -> bool {
    STATUS_LOOSE.is_match(line)
}

/// Anchored match of a status line, extracting name and status.
pub fn parse_status_line(line: &str) -> Option<StatusLine> {
    if !is_status_line(line) {
        return None;
    }
    let caps = STATUS_STRICT.captures(line)?;
    let raw_name = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
    let status = Status::from_cell(caps.get(2)?.as_str())?;
    let (name, documentation) = split_documentation(&raw_name);
    Some(StatusLine {
        raw_name,
        name,
        documentation,
        status,
    })
}

/// `<n> test(s), <n> passed, <n> failed` at the start of the trimmed line.
pub fn is_summary_line(line: &str) -> bool {
    SUMMARY.is_match(line.trim())
}

/// Bracketed system/error tag, or an `Output:`/`Log:`/`Report:` artifact path.
pub fn is_system_or_artifact(line: &str) -> bool {
    SYSTEM_TAG.is_match(line) || ARTIFACT.is_match(line)
}

/// Dotted, fully-qualified name followed by a `::` qualifier.
pub fn is_suite_header(line: &str) -> bool {
    SUITE_HEADER.is_match(line)
}

/// Name form used for matching: trimmed, with trailing ellipsis dots removed.
pub fn normalize_name(name: &str) -> &str {
    name.trim().trim_end_matches('.').trim_end()
}

/// Truncation-tolerant name comparison.
///
/// Robot shortens long names with a trailing `...` in one place but not the
/// other, so either normalized name being a prefix of the other counts as a
/// match. Empty names never match.
pub fn names_match(a: &str, b: &str) -> bool {
    let a = normalize_name(a);
    let b = normalize_name(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.starts_with(b) || b.starts_with(a)
}
