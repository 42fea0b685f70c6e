//! Line-oriented digest format.
//!
//! ```text
//! @format_version=1.0
//! >Requirements
//! req|- FR-001: The system MUST export reports.
//! >>Notes
//! p|Multi-line text uses \n escapes.
//! ```
//!
//! `@key=value` lines carry front matter, `>` repeated `depth` times opens a
//! section (bare `>` is anonymous), `tag|text` lines are elements of the most
//! recently opened section. Backslash escapes `\\`, `\n`, `\r`, a leading `\>`
//! and `\=` inside header keys.

use sn_core::{Document, Element, ElementKind, Format, Location, Result, Section, SnError};

use crate::traits::FormatCodec;

/// Compact codec.
pub struct CompactCodec;

impl CompactCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CompactCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

fn escape_title(title: &str) -> String {
    let escaped = escape(title);
    match escaped.strip_prefix('>') {
        Some(rest) => format!("\\>{rest}"),
        None => escaped,
    }
}

fn escape_key(key: &str) -> String {
    escape(key).replace('=', "\\=")
}

/// Byte offset of the first `=` not escaped by a backslash.
fn key_end(header: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in header.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '=' if !escaped => return Some(i),
            _ => escaped = false,
        }
    }
    None
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('>') => out.push('>'),
            Some('=') => out.push('='),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn error_at(line: usize, message: impl Into<String>) -> SnError {
    SnError::malformed(Format::Compact, Location::LineColumn { line, column: 1 }, message)
}

/// Pop the innermost open section into its parent.
fn close_top(stack: &mut Vec<Section>, roots: &mut Vec<Section>) {
    if let Some(done) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

fn render_section(section: &Section, depth: usize, out: &mut String) {
    out.push_str(&">".repeat(depth));
    if let Some(title) = &section.title {
        out.push_str(&escape_title(title));
    }
    out.push('\n');
    for element in &section.elements {
        out.push_str(element.kind().tag());
        out.push('|');
        out.push_str(&escape(element.text()));
        out.push('\n');
    }
    for child in &section.children {
        render_section(child, depth + 1, out);
    }
}

impl FormatCodec for CompactCodec {
    fn format(&self) -> Format {
        Format::Compact
    }

    fn detect(&self, content: &str) -> bool {
        content
            .lines()
            .find(|l| !l.trim().is_empty())
            .map(|l| l.starts_with('@') && l.contains('='))
            .unwrap_or(false)
    }

    fn parse(&self, content: &str) -> Result<Document> {
        let mut doc = Document::new(Format::Compact);
        let mut roots: Vec<Section> = Vec::new();
        let mut stack: Vec<Section> = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('@') {
                let end = key_end(header).ok_or_else(|| error_at(line_no, "header line without '='"))?;
                let (key, value) = (&header[..end], &header[end + 1..]);
                doc.front_matter.insert(unescape(key.trim()), unescape(value));
            } else if line.starts_with('>') {
                let depth = line.chars().take_while(|c| *c == '>').count();
                if depth > stack.len() + 1 {
                    return Err(error_at(
                        line_no,
                        format!("section depth {depth} under depth {}", stack.len()),
                    ));
                }
                while stack.len() >= depth {
                    close_top(&mut stack, &mut roots);
                }
                let title = &line[depth..];
                let section = if title.is_empty() {
                    Section::anonymous(depth)
                } else {
                    Section::titled(unescape(title), depth)
                };
                stack.push(section);
            } else {
                let (tag, text) = line
                    .split_once('|')
                    .ok_or_else(|| error_at(line_no, "element line without '|'"))?;
                let kind = ElementKind::from_tag(tag)
                    .ok_or_else(|| error_at(line_no, format!("unknown element tag '{tag}'")))?;
                if stack.is_empty() {
                    stack.push(Section::anonymous(1));
                }
                if let Some(section) = stack.last_mut() {
                    section.elements.push(Element::new(kind, unescape(text)));
                }
            }
        }
        while !stack.is_empty() {
            close_top(&mut stack, &mut roots);
        }

        doc.sections = roots;
        doc.assign_paths();
        Ok(doc)
    }

    fn render(&self, doc: &Document) -> Result<String> {
        let mut out = String::new();
        for (key, value) in crate::render_front_matter(doc) {
            out.push('@');
            out.push_str(&escape_key(&key));
            out.push('=');
            out.push_str(&escape(&value));
            out.push('\n');
        }
        for section in &doc.sections {
            render_section(section, 1, &mut out);
        }
        Ok(out)
    }
}
