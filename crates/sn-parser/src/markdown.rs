//! Markdown codec with structure-aware splitting.
//!
//! ATX headings outside code fences open sections; content before the first
//! heading becomes an anonymous preamble section. Any text is valid Markdown,
//! so parsing never fails.

use regex::Regex;
use sn_core::{Document, Element, Format, FrontMatter, Result, Section};
use std::sync::LazyLock;

use crate::inference::{fence_marker, infer_kind, line_shape, LineShape, Slot};
use crate::traits::FormatCodec;

static RE_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})[ \t]+(\S.*)$").unwrap());
static RE_CLOSING_HASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+#+[ \t]*$").unwrap());
static RE_FRONTMATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|$)").unwrap());

/// True when `content` opens with a closed `---` block.
pub fn has_front_matter(content: &str) -> bool {
    RE_FRONTMATTER.is_match(content)
}

/// Markdown parser and renderer.
pub struct MarkdownCodec;

impl MarkdownCodec {
    pub fn new() -> Self {
        Self
    }

    /// Split off a leading `---` block; values are read line by line.
    pub fn extract_frontmatter<'a>(&self, content: &'a str) -> (&'a str, Option<FrontMatter>) {
        let Some(cap) = RE_FRONTMATTER.captures(content) else {
            return (content, None);
        };
        let mut fm = FrontMatter::new();
        if let Some(block) = cap.get(1) {
            for line in block.as_str().lines() {
                if let Some((k, v)) = line.split_once(':') {
                    let key = k.trim();
                    if key.is_empty() || key.starts_with('#') {
                        continue;
                    }
                    let value = v.trim().trim_matches('"').trim_matches('\'');
                    fm.insert(key.to_string(), value.to_string());
                }
            }
        }
        let end = cap.get(0).map(|m| m.end()).unwrap_or(0);
        (&content[end..], Some(fm))
    }

    /// Heading level and title, if `line` is an ATX heading.
    pub fn heading(&self, line: &str) -> Option<(usize, String)> {
        let cap = RE_HEADING.captures(line)?;
        let level = cap[1].len();
        let title = RE_CLOSING_HASHES.replace(&cap[2], "").trim().to_string();
        (!title.is_empty()).then_some((level, title))
    }

    /// Group lines under the heading that precedes them, skipping fenced code.
    fn split_headings<'a>(&self, body: &'a str) -> Vec<(Option<(usize, String)>, Vec<&'a str>)> {
        let mut chunks: Vec<(Option<(usize, String)>, Vec<&'a str>)> = vec![(None, Vec::new())];
        let mut fence: Option<(char, usize)> = None;

        for line in body.lines() {
            if let Some((ch, run)) = fence {
                if is_closing_fence(line, ch, run) {
                    fence = None;
                }
            } else if let Some(marker) = fence_marker(line) {
                fence = Some(marker);
            } else if let Some(heading) = self.heading(line) {
                chunks.push((Some(heading), Vec::new()));
                continue;
            }
            if let Some(last) = chunks.last_mut() {
                last.1.push(line);
            }
        }
        chunks
    }

    /// Segment a section body into elements.
    pub fn segment(&self, lines: &[&str]) -> Vec<Element> {
        let mut elements = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            match line_shape(line) {
                LineShape::Blank | LineShape::ThematicBreak => i += 1,
                LineShape::Fence => {
                    let (ch, run) = fence_marker(line).unwrap_or(('`', 3));
                    let start = i;
                    i += 1;
                    while i < lines.len() {
                        i += 1;
                        if is_closing_fence(lines[i - 1], ch, run) {
                            break;
                        }
                    }
                    let text = lines[start..i].join("\n");
                    elements.push(Element::new(infer_kind(&text, Slot::CodeBlock), text));
                }
                LineShape::TableRow => {
                    let text = line.trim_end();
                    elements.push(Element::new(infer_kind(text, Slot::TableRow), text));
                    i += 1;
                }
                LineShape::ListItem => {
                    let start = i;
                    i += 1;
                    while i < lines.len() {
                        if continues_list_item(lines[i]) {
                            i += 1;
                            continue;
                        }
                        let next = skip_indented(lines, i);
                        if next == i {
                            break;
                        }
                        i = next;
                    }
                    let text = join_trimmed(&lines[start..i]);
                    elements.push(Element::new(infer_kind(&text, Slot::ListItem), text));
                }
                LineShape::KeyLine | LineShape::Text => {
                    let keyed = line_shape(line) == LineShape::KeyLine;
                    let start = i;
                    i += 1;
                    while i < lines.len() {
                        let next = line_shape(lines[i]);
                        let stop = match next {
                            LineShape::Text => false,
                            LineShape::KeyLine => keyed,
                            _ => true,
                        };
                        if !stop {
                            i += 1;
                            continue;
                        }
                        let after = if keyed { skip_indented(lines, i) } else { i };
                        if after == i {
                            break;
                        }
                        i = after;
                    }
                    let text = join_trimmed(&lines[start..i]);
                    elements.push(Element::new(infer_kind(&text, Slot::Paragraph), text));
                }
            }
        }
        elements
    }
}

fn is_closing_fence(line: &str, ch: char, run: usize) -> bool {
    match fence_marker(line) {
        Some((c, n)) => c == ch && n >= run && line.trim().chars().all(|x| x == ch),
        None => false,
    }
}

fn continues_list_item(line: &str) -> bool {
    matches!(line_shape(line), LineShape::Text | LineShape::KeyLine)
}

/// Continuation of a multi-line value: four spaces or a tab, whatever the
/// line looks like once unindented.
fn is_indented(line: &str) -> bool {
    (line.starts_with("    ") || line.starts_with('\t')) && !line.trim().is_empty()
}

/// Index past the indented lines starting at `i`, taking blank lines only
/// when more indented lines follow them.
fn skip_indented(lines: &[&str], mut i: usize) -> usize {
    let mut end = i;
    while i < lines.len() {
        if is_indented(lines[i]) {
            i += 1;
            end = i;
        } else if lines[i].trim().is_empty() {
            i += 1;
        } else {
            break;
        }
    }
    end
}

fn join_trimmed(lines: &[&str]) -> String {
    lines.iter().map(|l| l.trim_end()).collect::<Vec<_>>().join("\n")
}

/// Build the section tree from heading chunks; deeper headings nest under shallower ones.
fn build_tree(chunks: Vec<(Option<(usize, String)>, Vec<Element>)>) -> Vec<Section> {
    let mut roots: Vec<Section> = Vec::new();
    let mut stack: Vec<Section> = Vec::new();

    for (heading, elements) in chunks {
        let Some((level, title)) = heading else {
            if !elements.is_empty() {
                let mut preamble = Section::anonymous(0);
                preamble.elements = elements;
                roots.push(preamble);
            }
            continue;
        };
        while stack.last().map(|top| top.level >= level).unwrap_or(false) {
            close_top(&mut stack, &mut roots);
        }
        let mut section = Section::titled(title, level);
        section.elements = elements;
        stack.push(section);
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }
    roots
}

fn close_top(stack: &mut Vec<Section>, roots: &mut Vec<Section>) {
    if let Some(done) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

/// Line shape an element's first line presents to the block scanner.
fn leading_shape(element: &Element) -> LineShape {
    element.text().lines().next().map(line_shape).unwrap_or(LineShape::Blank)
}

/// Elements that re-split on their own first line can share a block.
fn packs_tight(prev: &Element, next: &Element) -> bool {
    let (a, b) = (leading_shape(prev), leading_shape(next));
    a == b && matches!(a, LineShape::ListItem | LineShape::TableRow | LineShape::KeyLine)
}

fn render_section(section: &Section, blocks: &mut Vec<String>) {
    // A blank title has no ATX form; its content follows the previous heading.
    if let Some(title) = section.title.as_deref().filter(|t| !t.trim().is_empty()) {
        blocks.push(format!("{} {}", "#".repeat(section.level.clamp(1, 6)), title));
    }
    let mut current: Option<String> = None;
    for (i, element) in section.elements.iter().enumerate() {
        let tight = i > 0 && packs_tight(&section.elements[i - 1], element);
        match current.as_mut() {
            Some(block) if tight => {
                block.push('\n');
                block.push_str(element.text());
            }
            _ => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                current = Some(element.text().to_string());
            }
        }
    }
    if let Some(block) = current {
        blocks.push(block);
    }
    for child in &section.children {
        render_section(child, blocks);
    }
}

impl FormatCodec for MarkdownCodec {
    fn format(&self) -> Format {
        Format::Markdown
    }

    fn detect(&self, content: &str) -> bool {
        if content.trim().is_empty() || has_front_matter(content) {
            return true;
        }
        self.split_headings(content).len() > 1
    }

    fn parse(&self, content: &str) -> Result<Document> {
        let mut doc = Document::new(Format::Markdown);
        let (body, frontmatter) = self.extract_frontmatter(content);
        if let Some(fm) = frontmatter {
            doc.front_matter = fm;
        }

        let chunks = self
            .split_headings(body)
            .into_iter()
            .map(|(heading, lines)| (heading, self.segment(&lines)))
            .collect();
        doc.sections = build_tree(chunks);
        doc.assign_paths();
        Ok(doc)
    }

    fn render(&self, doc: &Document) -> Result<String> {
        let mut out = String::from("---\n");
        for (key, value) in crate::render_front_matter(doc) {
            out.push_str(&format!("{key}: {value}\n"));
        }
        out.push_str("---\n");

        let mut blocks = Vec::new();
        for section in &doc.sections {
            render_section(section, &mut blocks);
        }
        if !blocks.is_empty() {
            out.push('\n');
            out.push_str(&blocks.join("\n\n"));
            out.push('\n');
        }
        Ok(out)
    }
}

impl Default for MarkdownCodec {
    fn default() -> Self {
        Self::new()
    }
}
