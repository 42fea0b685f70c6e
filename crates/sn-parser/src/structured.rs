//! Shared tree model for the YAML and JSON codecs.
//!
//! Both codecs lower their native value type into [`Tree`], which keeps
//! mapping order, and build Documents from it in one place. Two layouts are
//! understood: arbitrary data (mapping keys become sections) and the digest
//! layout written by the renderers, which restores a Document exactly.

use sn_core::{Document, Element, ElementKind, Format, Location, Result, Section, SnError};

use crate::inference::{infer_kind, line_shape, LineShape, Slot};

pub const DIGEST_KEY: &str = "_digest";
pub const SECTIONS_KEY: &str = "sections";
const TITLE_KEY: &str = "title";
const LEVEL_KEY: &str = "level";
const ELEMENTS_KEY: &str = "elements";
const WRAP_KEY: &str = "content";
const ITEM_TITLE_KEYS: [&str; 3] = ["id", "name", "title"];

/// Format-neutral structured value with ordered mappings.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Null,
    Scalar(String),
    /// Emitted for counters in digest metadata; never produced by lowering.
    Int(u64),
    Seq(Vec<Tree>),
    Map(Vec<(String, Tree)>),
}

impl Tree {
    fn get(&self, key: &str) -> Option<&Tree> {
        match self {
            Tree::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    fn as_text(&self) -> Option<String> {
        match self {
            Tree::Scalar(s) => Some(s.clone()),
            Tree::Int(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

// ========== Building Documents ==========

/// Build a Document from a lowered tree, choosing the digest layout when present.
pub fn document_from_tree(tree: Tree, format: Format) -> Result<Document> {
    let mut doc = Document::new(format);
    if tree.get(DIGEST_KEY).is_some() {
        read_digest(&tree, format, &mut doc)?;
    } else {
        ingest_root(tree, &mut doc);
    }
    doc.assign_paths();
    Ok(doc)
}

fn ingest_root(tree: Tree, doc: &mut Document) {
    let entries = match tree {
        Tree::Null => return,
        Tree::Map(entries) => entries,
        other => vec![(WRAP_KEY.to_string(), other)],
    };

    let mut preamble = Section::anonymous(0);
    let mut sections = Vec::new();
    for (key, value) in entries {
        match value {
            Tree::Map(_) | Tree::Seq(_) => sections.push(ingest_section(key, value, 1)),
            scalar => preamble.elements.push(key_value(&key, &scalar)),
        }
    }
    if !preamble.elements.is_empty() {
        doc.sections.push(preamble);
    }
    doc.sections.extend(sections);
}

fn ingest_section(title: String, value: Tree, level: usize) -> Section {
    let mut section = Section::titled(title, level);
    match value {
        Tree::Map(entries) => {
            for (key, value) in entries {
                match value {
                    Tree::Map(_) | Tree::Seq(_) => {
                        section.children.push(ingest_section(key, value, level + 1))
                    }
                    scalar => section.elements.push(key_value(&key, &scalar)),
                }
            }
        }
        Tree::Seq(items) => {
            for (i, item) in items.into_iter().enumerate() {
                match item {
                    Tree::Map(_) => {
                        let title = item_title(&item).unwrap_or_else(|| (i + 1).to_string());
                        section.children.push(ingest_section(title, item, level + 1));
                    }
                    Tree::Seq(_) => {
                        section.children.push(ingest_section((i + 1).to_string(), item, level + 1))
                    }
                    scalar => section.elements.push(list_item(&scalar)),
                }
            }
        }
        scalar => section.elements.push(key_value("value", &scalar)),
    }
    section
}

fn item_title(item: &Tree) -> Option<String> {
    ITEM_TITLE_KEYS
        .iter()
        .find_map(|key| item.get(key).and_then(Tree::as_text))
        .filter(|t| !t.trim().is_empty())
}

/// Continuation lines of a multi-line value are indented by four spaces, so
/// the Markdown scanner keeps them with their first line whatever they contain.
fn indent_continuation(value: &str) -> String {
    value
        .trim()
        .lines()
        .map(str::trim_end)
        .enumerate()
        .map(|(i, line)| if i == 0 || line.is_empty() { line.to_string() } else { format!("    {line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keys the plain `key:` shape cannot carry are written as `**key**:`.
fn key_label(key: &str) -> String {
    let key = key.replace(['\r', '\n'], " ");
    if line_shape(&format!("{key}:")) == LineShape::KeyLine {
        key
    } else {
        format!("**{key}**")
    }
}

fn key_value(key: &str, value: &Tree) -> Element {
    let label = key_label(key);
    let text = match value.as_text() {
        Some(v) if !v.trim().is_empty() => format!("{label}: {}", indent_continuation(&v)),
        _ => format!("{label}:"),
    };
    Element::new(infer_kind(&text, Slot::KeyValue), text)
}

fn list_item(value: &Tree) -> Element {
    let text = match value.as_text() {
        Some(v) if !v.trim().is_empty() => format!("- {}", indent_continuation(&v)),
        _ => "-".to_string(),
    };
    Element::new(infer_kind(&text, Slot::ListItem), text)
}

// ========== Digest layout ==========

fn malformed(format: Format, path: String, message: impl Into<String>) -> SnError {
    SnError::malformed(format, Location::Path(path), message)
}

fn read_digest(tree: &Tree, format: Format, doc: &mut Document) -> Result<()> {
    match tree.get(DIGEST_KEY) {
        Some(Tree::Map(entries)) => {
            for (key, value) in entries {
                match value {
                    Tree::Null => {}
                    other => {
                        let text = other.as_text().ok_or_else(|| {
                            malformed(
                                format,
                                format!("{DIGEST_KEY}.{key}"),
                                "metadata values must be scalars",
                            )
                        })?;
                        doc.front_matter.insert(key.clone(), text);
                    }
                }
            }
        }
        Some(Tree::Null) | None => {}
        Some(_) => {
            return Err(malformed(format, DIGEST_KEY.into(), "expected a mapping"));
        }
    }

    doc.sections = read_sections(tree.get(SECTIONS_KEY), SECTIONS_KEY, 1, format)?;
    Ok(())
}

fn read_sections(node: Option<&Tree>, at: &str, depth: usize, format: Format) -> Result<Vec<Section>> {
    let items = match node {
        None | Some(Tree::Null) => return Ok(Vec::new()),
        Some(Tree::Seq(items)) => items,
        Some(_) => return Err(malformed(format, at.into(), "expected a list of sections")),
    };

    let mut sections = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let here = format!("{at}[{i}]");
        if !matches!(item, Tree::Map(_)) {
            return Err(malformed(format, here, "expected a section mapping"));
        }

        let title = match item.get(TITLE_KEY) {
            None | Some(Tree::Null) => None,
            Some(t) => Some(t.as_text().ok_or_else(|| {
                malformed(format, format!("{here}.{TITLE_KEY}"), "title must be a scalar")
            })?),
        };
        let level = match item.get(LEVEL_KEY) {
            None | Some(Tree::Null) => depth,
            Some(l) => l
                .as_text()
                .and_then(|s| s.trim().parse::<usize>().ok())
                .ok_or_else(|| {
                    malformed(format, format!("{here}.{LEVEL_KEY}"), "level must be a non-negative integer")
                })?,
        };

        let mut section = Section::new(title, level);
        section.elements = read_elements(item.get(ELEMENTS_KEY), &format!("{here}.{ELEMENTS_KEY}"), format)?;
        section.children = read_sections(
            item.get(SECTIONS_KEY),
            &format!("{here}.{SECTIONS_KEY}"),
            depth + 1,
            format,
        )?;
        sections.push(section);
    }
    Ok(sections)
}

fn read_elements(node: Option<&Tree>, at: &str, format: Format) -> Result<Vec<Element>> {
    let items = match node {
        None | Some(Tree::Null) => return Ok(Vec::new()),
        Some(Tree::Seq(items)) => items,
        Some(_) => return Err(malformed(format, at.into(), "expected a list of elements")),
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let here = format!("{at}[{i}]");
            let (tag, value) = match item {
                Tree::Map(entries) if entries.len() == 1 => (&entries[0].0, &entries[0].1),
                _ => return Err(malformed(format, here, "expected a single `tag: text` entry")),
            };
            let kind = ElementKind::from_tag(tag)
                .ok_or_else(|| malformed(format, here.clone(), format!("unknown element tag '{tag}'")))?;
            let text = match value {
                Tree::Null => String::new(),
                other => other
                    .as_text()
                    .ok_or_else(|| malformed(format, here, "element text must be a scalar"))?,
            };
            Ok(Element::new(kind, text))
        })
        .collect()
}

/// Lower a Document into the digest layout.
pub fn tree_from_document(doc: &Document) -> Tree {
    let metadata = crate::render_front_matter(doc)
        .into_iter()
        .map(|(k, v)| {
            let value = match counter_value(&v) {
                Some(n) => Tree::Int(n),
                None => Tree::Scalar(v),
            };
            (k, value)
        })
        .collect();

    Tree::Map(vec![
        (DIGEST_KEY.to_string(), Tree::Map(metadata)),
        (
            SECTIONS_KEY.to_string(),
            Tree::Seq(doc.sections.iter().map(section_tree).collect()),
        ),
    ])
}

/// Plain decimal without leading zeros, so re-reading yields the same text.
fn counter_value(value: &str) -> Option<u64> {
    let canonical = !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_digit())
        && (value == "0" || !value.starts_with('0'));
    if canonical {
        value.parse().ok()
    } else {
        None
    }
}

fn section_tree(section: &Section) -> Tree {
    let mut entries = Vec::new();
    if let Some(title) = &section.title {
        entries.push((TITLE_KEY.to_string(), Tree::Scalar(title.clone())));
    }
    entries.push((LEVEL_KEY.to_string(), Tree::Int(section.level as u64)));
    if !section.elements.is_empty() {
        let elements = section
            .elements
            .iter()
            .map(|e| Tree::Map(vec![(e.kind().tag().to_string(), Tree::Scalar(e.text().to_string()))]))
            .collect();
        entries.push((ELEMENTS_KEY.to_string(), Tree::Seq(elements)));
    }
    if !section.children.is_empty() {
        entries.push((
            SECTIONS_KEY.to_string(),
            Tree::Seq(section.children.iter().map(section_tree).collect()),
        ));
    }
    Tree::Map(entries)
}

