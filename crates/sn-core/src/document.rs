//! Normalized, format-independent document model.
//!
//! A [`Document`] is a tree of [`Section`]s; each section owns an ordered run
//! of [`Element`]s followed by its child sections. Parsers build it, the
//! classifier fills in tiers, the optimizer derives reduced copies.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use crate::tokenizer::{self, TokenScheme};
use crate::types::{ElementKind, Format, Tier};

/// Key-value metadata carried ahead of the content.
pub type FrontMatter = BTreeMap<String, String>;

/// Ordered ancestor names identifying a section within its document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionPath(Vec<String>);

impl SectionPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" / "))
    }
}

/// Smallest classified unit of content.
///
/// `raw_text` is only reachable through [`Element::text`]; every mutation goes
/// through [`Element::replace_text`], which drops the memoized token count.
#[derive(Debug, Clone)]
pub struct Element {
    kind: ElementKind,
    raw_text: String,
    /// Unset until the classifier runs.
    pub tier: Option<Tier>,
    token_memo: OnceLock<(TokenScheme, usize)>,
}

impl Element {
    pub fn new(kind: ElementKind, raw_text: impl Into<String>) -> Self {
        Self {
            kind,
            raw_text: raw_text.into(),
            tier: None,
            token_memo: OnceLock::new(),
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.raw_text
    }

    /// Swap the content, invalidating the memoized token count.
    pub fn replace_text(&mut self, raw_text: impl Into<String>) {
        self.raw_text = raw_text.into();
        self.token_memo = OnceLock::new();
    }

    /// Token count of `raw_text`, memoized for the first scheme asked.
    pub fn token_count(&self, scheme: TokenScheme) -> usize {
        let (memo_scheme, n) = *self
            .token_memo
            .get_or_init(|| (scheme, tokenizer::count(&self.raw_text, scheme)));
        if memo_scheme == scheme {
            n
        } else {
            tokenizer::count(&self.raw_text, scheme)
        }
    }

    /// Key of a key-value element, with emphasis markers stripped.
    pub fn key(&self) -> Option<String> {
        if self.kind != ElementKind::KeyValue {
            return None;
        }
        let first_line = self.raw_text.lines().next()?;
        let key = match first_line.strip_prefix("**").and_then(|rest| rest.split_once("**:")) {
            Some((bold, _)) => bold,
            None => first_line.split_once(':')?.0,
        };
        let key = key.trim().trim_matches('*').trim();
        (!key.is_empty()).then(|| key.to_string())
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.raw_text == other.raw_text && self.tier == other.tier
    }
}

impl Eq for Element {}

/// A named or anonymous region of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading text or mapping key; `None` for anonymous regions.
    pub title: Option<String>,
    pub path: SectionPath,
    /// Heading level for Markdown, nesting depth for structured formats.
    pub level: usize,
    pub elements: Vec<Element>,
    pub children: Vec<Section>,
}

impl Section {
    pub fn new(title: Option<String>, level: usize) -> Self {
        Self {
            title,
            path: SectionPath::root(),
            level,
            elements: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn titled(title: impl Into<String>, level: usize) -> Self {
        Self::new(Some(title.into()), level)
    }

    pub fn anonymous(level: usize) -> Self {
        Self::new(None, level)
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_child(mut self, child: Section) -> Self {
        self.children.push(child);
        self
    }

    /// No elements and no children.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.children.is_empty()
    }

    /// Elements in this section and all descendants.
    pub fn element_count(&self) -> usize {
        self.elements.len() + self.children.iter().map(Section::element_count).sum::<usize>()
    }

    /// Tokens of the title plus this section's own elements (children excluded).
    pub fn own_tokens(&self, scheme: TokenScheme) -> usize {
        let title = self
            .title
            .as_deref()
            .map(|t| tokenizer::count(t, scheme))
            .unwrap_or(0);
        title + self.elements.iter().map(|e| e.token_count(scheme)).sum::<usize>()
    }

    /// Pre-order traversal including `self`.
    pub fn walk<'a>(&'a self, out: &mut Vec<&'a Section>) {
        out.push(self);
        for child in &self.children {
            child.walk(out);
        }
    }
}

/// Root container produced by a parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub format: Format,
    pub front_matter: FrontMatter,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            front_matter: FrontMatter::new(),
            sections: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// All sections in document order (pre-order).
    pub fn sections(&self) -> Vec<&Section> {
        let mut out = Vec::new();
        for section in &self.sections {
            section.walk(&mut out);
        }
        out
    }

    /// All elements in document order with the path of their section.
    pub fn elements(&self) -> Vec<(&SectionPath, &Element)> {
        self.sections()
            .into_iter()
            .flat_map(|s| s.elements.iter().map(move |e| (&s.path, e)))
            .collect()
    }

    pub fn element_count(&self) -> usize {
        self.sections.iter().map(Section::element_count).sum()
    }

    /// Kind and text of every element in order; ignores tiers and paths.
    pub fn content_signature(&self) -> Vec<(ElementKind, String)> {
        self.elements()
            .into_iter()
            .map(|(_, e)| (e.kind(), e.text().to_string()))
            .collect()
    }

    pub fn find_section(&self, path: &SectionPath) -> Option<&Section> {
        self.sections().into_iter().find(|s| &s.path == path)
    }

    pub fn total_tokens(&self, scheme: TokenScheme) -> usize {
        self.sections().iter().map(|s| s.own_tokens(scheme)).sum()
    }

    /// True once every element carries a tier.
    pub fn is_classified(&self) -> bool {
        self.elements().iter().all(|(_, e)| e.tier.is_some())
    }

    /// Recompute every section path from titles and sibling order.
    ///
    /// Titled sections use their trimmed title as segment; anonymous ones use
    /// `#n` (1-based sibling position). Repeated sibling titles get a `~k` suffix
    /// so paths stay unique within the document.
    pub fn assign_paths(&mut self) {
        assign_paths(&mut self.sections, &SectionPath::root());
    }
}

fn assign_paths(sections: &mut [Section], parent: &SectionPath) {
    let mut used: HashSet<String> = HashSet::new();
    for (i, section) in sections.iter_mut().enumerate() {
        let base = match section.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("#{}", i + 1),
        };
        let mut segment = base.clone();
        let mut n = 1;
        while used.contains(&segment) {
            n += 1;
            segment = format!("{base}~{n}");
        }
        used.insert(segment.clone());
        section.path = parent.child(segment);
        let path = section.path.clone();
        assign_paths(&mut section.children, &path);
    }
}
