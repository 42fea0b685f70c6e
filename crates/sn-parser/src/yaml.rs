use serde_yaml::{Mapping, Value};
use sn_core::{Document, Format, Location, Result, SnError};

use crate::markdown::has_front_matter;
use crate::structured::{document_from_tree, tree_from_document, Tree};
use crate::traits::FormatCodec;

/// YAML codec over [`serde_yaml`].
pub struct YamlCodec;

impl YamlCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for YamlCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Value> for Tree {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Tree::Null,
            Value::Bool(b) => Tree::Scalar(b.to_string()),
            Value::Number(n) => Tree::Scalar(n.to_string()),
            Value::String(s) => Tree::Scalar(s),
            Value::Sequence(items) => Tree::Seq(items.into_iter().map(Tree::from).collect()),
            Value::Mapping(map) => Tree::Map(
                map.into_iter()
                    .map(|(k, v)| (key_text(k), Tree::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Tree::from(tagged.value),
        }
    }
}

fn key_text(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn to_value(tree: Tree) -> Value {
    match tree {
        Tree::Null => Value::Null,
        Tree::Scalar(s) => Value::String(s),
        Tree::Int(n) => Value::Number(n.into()),
        Tree::Seq(items) => Value::Sequence(items.into_iter().map(to_value).collect()),
        Tree::Map(entries) => {
            let mut map = Mapping::new();
            for (k, v) in entries {
                map.insert(Value::String(k), to_value(v));
            }
            Value::Mapping(map)
        }
    }
}

/// serde_yaml appends the position to its message; the location is carried separately.
fn strip_position(message: String) -> String {
    match message.find(" at line ") {
        Some(i) => message[..i].to_string(),
        None => message,
    }
}

impl FormatCodec for YamlCodec {
    fn format(&self) -> Format {
        Format::Yaml
    }

    fn detect(&self, content: &str) -> bool {
        let first = content.lines().map(str::trim_end).find(|l| !l.trim().is_empty());
        match first {
            Some(line) if line.starts_with("%YAML") => true,
            Some(line) if line == "---" || line.starts_with("--- ") => !has_front_matter(content),
            _ => false,
        }
    }

    fn parse(&self, content: &str) -> Result<Document> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| {
            let location = e
                .location()
                .map(|l| Location::LineColumn {
                    line: l.line(),
                    column: l.column(),
                })
                .unwrap_or(Location::Unknown);
            SnError::malformed(Format::Yaml, location, strip_position(e.to_string()))
        })?;
        document_from_tree(Tree::from(value), Format::Yaml)
    }

    fn render(&self, doc: &Document) -> Result<String> {
        let value = to_value(tree_from_document(doc));
        let body = serde_yaml::to_string(&value).map_err(anyhow::Error::from)?;
        Ok(format!("---\n{body}"))
    }
}
