use serde_json::{Map, Value};
use sn_core::{Document, Format, Location, Result, SnError};

use crate::structured::{document_from_tree, tree_from_document, Tree};
use crate::traits::FormatCodec;

/// JSON codec over [`serde_json`]; object key order is preserved.
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonCodec {
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
            Value::Array(items) => Tree::Seq(items.into_iter().map(Tree::from).collect()),
            Value::Object(map) => Tree::Map(map.into_iter().map(|(k, v)| (k, Tree::from(v))).collect()),
        }
    }
}

fn to_value(tree: Tree) -> Value {
    match tree {
        Tree::Null => Value::Null,
        Tree::Scalar(s) => Value::String(s),
        Tree::Int(n) => Value::Number(n.into()),
        Tree::Seq(items) => Value::Array(items.into_iter().map(to_value).collect()),
        Tree::Map(entries) => {
            let mut map = Map::new();
            for (k, v) in entries {
                map.insert(k, to_value(v));
            }
            Value::Object(map)
        }
    }
}

impl FormatCodec for JsonCodec {
    fn format(&self) -> Format {
        Format::Json
    }

    fn detect(&self, content: &str) -> bool {
        matches!(content.trim_start().chars().next(), Some('{') | Some('['))
    }

    fn parse(&self, content: &str) -> Result<Document> {
        if content.trim().is_empty() {
            return Ok(Document::new(Format::Json));
        }
        let value: Value = serde_json::from_str(content).map_err(|e| {
            let location = Location::LineColumn {
                line: e.line(),
                column: e.column(),
            };
            let message = e.to_string();
            let message = match message.find(" at line ") {
                Some(i) => message[..i].to_string(),
                None => message,
            };
            SnError::malformed(Format::Json, location, message)
        })?;
        document_from_tree(Tree::from(value), Format::Json)
    }

    fn render(&self, doc: &Document) -> Result<String> {
        let value = to_value(tree_from_document(doc));
        let mut out = serde_json::to_string_pretty(&value).map_err(anyhow::Error::from)?;
        out.push('\n');
        Ok(out)
    }
}
