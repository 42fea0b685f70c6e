//! Element kind inference shared by every codec.
//!
//! Each parser decides the structural slot a piece of text came from; the
//! final kind is then a pure function of `(text, slot)`, so the same text
//! lands on the same kind no matter which format carried it.

use regex::Regex;
use sn_core::ElementKind;
use std::sync::LazyLock;

static RE_LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(?:[-*+]|\d{1,9}[.)])(?:[ \t]+|$)").unwrap());
static RE_THEMATIC_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap());
static RE_KEY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*\*)?([A-Za-z0-9_][A-Za-z0-9_ .\-/]{0,31}?)(?:\*\*)?:(?:[ \t]|$)").unwrap()
});
static RE_BOLD_KEY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*(.*?)\*\*:(?:[ \t]|$)").unwrap());
static RE_REQ_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:(?:[-*+]|\d{1,9}[.)])[ \t]+)?(?:\*\*)?(?:FR|NFR|REQ)-?\d+\b").unwrap()
});
static RE_REQ_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:MUST|SHALL|REQUIRED)\b").unwrap());
static RE_AC_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:(?:[-*+]|\d{1,9}[.)])[ \t]+)?(?:\*\*)?(?:AC|SC)-?\d+\b").unwrap()
});
static RE_GIVEN_WHEN_THEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bgiven\b.*\bwhen\b.*\bthen\b").unwrap());

/// Structural position text was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Paragraph,
    ListItem,
    KeyValue,
    CodeBlock,
    TableRow,
}

/// Shape of a line as seen by the Markdown block scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineShape {
    Blank,
    Fence,
    ThematicBreak,
    TableRow,
    ListItem,
    KeyLine,
    Text,
}

pub fn line_shape(line: &str) -> LineShape {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        LineShape::Blank
    } else if fence_marker(line).is_some() {
        LineShape::Fence
    } else if RE_THEMATIC_BREAK.is_match(line) {
        LineShape::ThematicBreak
    } else if trimmed.starts_with('|') {
        LineShape::TableRow
    } else if RE_LIST_MARKER.is_match(line) {
        LineShape::ListItem
    } else if is_key_line(line) {
        LineShape::KeyLine
    } else {
        LineShape::Text
    }
}

/// Opening fence character and run length, for lines indented at most 3 spaces.
pub fn fence_marker(line: &str) -> Option<(char, usize)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let ch = rest.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let run = rest.chars().take_while(|c| *c == ch).count();
    (run >= 3).then_some((ch, run))
}

/// A short `key:` prefix (at most three words, no sentence punctuation), or
/// a bold `**key**:` prefix of any length.
pub fn is_key_line(line: &str) -> bool {
    let short = RE_KEY_LINE
        .captures(line)
        .and_then(|cap| cap.get(1))
        .map(|key| key.as_str().split_whitespace().count() <= 3)
        .unwrap_or(false);
    short || RE_BOLD_KEY_LINE.is_match(line)
}

/// Slot a re-parse puts text of `kind` back into.
pub fn slot_for(kind: ElementKind) -> Slot {
    match kind {
        ElementKind::ListItem => Slot::ListItem,
        ElementKind::KeyValue => Slot::KeyValue,
        ElementKind::CodeBlock => Slot::CodeBlock,
        ElementKind::TableRow => Slot::TableRow,
        _ => Slot::Paragraph,
    }
}

pub fn is_requirement(text: &str) -> bool {
    RE_REQ_ID.is_match(text) || RE_REQ_KEYWORD.is_match(text)
}

pub fn is_acceptance_criterion(text: &str) -> bool {
    RE_AC_ID.is_match(text) || RE_GIVEN_WHEN_THEN.is_match(text)
}

/// Final element kind for `text` found in `slot`.
pub fn infer_kind(text: &str, slot: Slot) -> ElementKind {
    match slot {
        Slot::CodeBlock => ElementKind::CodeBlock,
        Slot::TableRow => ElementKind::TableRow,
        _ if is_acceptance_criterion(text) => ElementKind::AcceptanceCriterion,
        _ if is_requirement(text) => ElementKind::Requirement,
        Slot::ListItem => ElementKind::ListItem,
        Slot::KeyValue => ElementKind::KeyValue,
        Slot::Paragraph => {
            if text.lines().next().map(is_key_line).unwrap_or(false) {
                ElementKind::KeyValue
            } else {
                ElementKind::Paragraph
            }
        }
    }
}
