//! The structure-to-markup serializer at the heart of descriptor generation.
//!
//! Descriptor sections are assembled as [`Node`] trees - insertion-ordered
//! mappings whose leaves are strings or flat string lists - and rendered to
//! indented markup by [`render`]. Key order is contractual: the descriptor's
//! consumer reads some sections positionally, so the serializer emits keys
//! exactly in insertion order, end to end.
//!
//! The value domain is deliberately narrow. Numbers, booleans, nested
//! sequences and sequences of mappings have no representation here; the
//! conversion from user-supplied JSON ([`node_from_json`]) rejects them with
//! a typed error instead of coercing.

use crate::core::DevstackError;
use anyhow::Result;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// An insertion-ordered mapping of keys to [`Node`] values.
///
/// Duplicate inserts overwrite the value but keep the original position,
/// mirroring how the descriptor's consumer resolves duplicate keys.
pub type SectionMap = IndexMap<String, Node>;

/// A value in a descriptor section.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A string scalar, emitted inline after the key.
    Scalar(String),
    /// A nested mapping, emitted indented one level deeper.
    Map(SectionMap),
    /// A flat sequence of pre-formatted strings, emitted as `- item` lines.
    /// Elements are not recursively serialized.
    List(Vec<String>),
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

/// Render a section to indented markup.
///
/// Each mapping key is emitted at `level` indentation (two spaces per level)
/// followed by a colon; scalars stay inline on the same line, nested
/// mappings recurse one level deeper, and lists emit one `- item` line per
/// element at `level + 1`.
#[must_use]
pub fn render(map: &SectionMap, level: usize) -> String {
    let indent = "  ".repeat(level);
    let mut out = String::new();

    for (key, node) in map {
        out.push_str(&indent);
        out.push_str(key);
        out.push(':');

        match node {
            Node::Scalar(value) => {
                out.push(' ');
                out.push_str(value);
                out.push('\n');
            }
            Node::Map(nested) => {
                out.push('\n');
                out.push_str(&render(nested, level + 1));
            }
            Node::List(items) => {
                for item in items {
                    out.push('\n');
                    out.push_str(&indent);
                    out.push_str("  - ");
                    out.push_str(item);
                }
                out.push('\n');
            }
        }
    }

    out
}

/// Convert user-supplied JSON (a custom service block) into a [`Node`].
///
/// Supports exactly the serializer's value domain: strings, string arrays
/// and nested objects. Anything else - numbers, booleans, nulls, arrays of
/// non-strings - is a typed error; custom blocks are appended verbatim or
/// not at all.
pub fn node_from_json(value: &JsonValue) -> Result<Node> {
    json_to_node(value, "<root>")
}

fn json_to_node(value: &JsonValue, key: &str) -> Result<Node> {
    match value {
        JsonValue::String(s) => Ok(Node::Scalar(s.clone())),
        JsonValue::Object(map) => {
            let mut section = SectionMap::new();
            for (k, v) in map {
                section.insert(k.clone(), json_to_node(v, k)?);
            }
            Ok(Node::Map(section))
        }
        JsonValue::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    JsonValue::String(s) => list.push(s.clone()),
                    other => {
                        return Err(DevstackError::UnsupportedValue {
                            key: key.to_string(),
                            kind: json_kind(other).to_string(),
                        }
                        .into());
                    }
                }
            }
            Ok(Node::List(list))
        }
        other => Err(DevstackError::UnsupportedValue {
            key: key.to_string(),
            kind: json_kind(other).to_string(),
        }
        .into()),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
