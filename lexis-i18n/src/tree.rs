//! Resource Trees
//!
//! One language's translation data: nested string maps whose leaves are
//! either single strings or plural sets.

use crate::{I18nError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A node of a language resource.
///
/// Serialized untagged, so a tree round-trips through JSON as the same
/// shape the resource file had.
///
/// ```
/// use lexis_i18n::ResourceTree;
///
/// let tree = ResourceTree::from_json(r#"{"menu": {"file": "File"}}"#).unwrap();
/// let leaf = tree.walk(["menu", "file"]).and_then(ResourceTree::as_scalar);
/// assert_eq!(leaf, Some("File"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceTree {
    /// A translated string
    Scalar(String),
    /// Named children
    Node(HashMap<String, ResourceTree>),
}

impl ResourceTree {
    /// Parse a JSON resource document.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Convert a parsed JSON document.
    ///
    /// The root must be an object or array. Arrays become nodes keyed by
    /// index, numbers and booleans become strings, and `null` members are
    /// dropped.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::Node(Self::convert_members(map))),
            Value::Array(items) => Ok(Self::Node(Self::convert_items(items))),
            other => Err(I18nError::ParseError(format!(
                "resource root must be an object, found {}",
                json_type(&other)
            ))),
        }
    }

    fn convert(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Scalar(b.to_string())),
            Value::Number(n) => Some(Self::Scalar(n.to_string())),
            Value::String(s) => Some(Self::Scalar(s)),
            Value::Array(items) => Some(Self::Node(Self::convert_items(items))),
            Value::Object(map) => Some(Self::Node(Self::convert_members(map))),
        }
    }

    fn convert_items(items: Vec<Value>) -> HashMap<String, ResourceTree> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| Self::convert(item).map(|t| (i.to_string(), t)))
            .collect()
    }

    fn convert_members(map: serde_json::Map<String, Value>) -> HashMap<String, ResourceTree> {
        map.into_iter()
            .filter_map(|(k, item)| Self::convert(item).map(|t| (k, t)))
            .collect()
    }

    /// Build a node from `(name, child)` pairs.
    pub fn node<K, I>(children: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ResourceTree)>,
    {
        Self::Node(children.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Child by name, if this is a node.
    pub fn get(&self, segment: &str) -> Option<&ResourceTree> {
        match self {
            Self::Node(children) => children.get(segment),
            Self::Scalar(_) => None,
        }
    }

    /// Follow a path of segments from this node.
    ///
    /// Returns `None` as soon as a segment is missing or a scalar is
    /// reached before the path ends.
    pub fn walk<'a, I>(&self, path: I) -> Option<&ResourceTree>
    where
        I: IntoIterator<Item = &'a str>,
    {
        path.into_iter()
            .try_fold(self, |node, segment| node.get(segment))
    }

    /// The string, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Node(_) => None,
        }
    }

    /// The children, if this is a node.
    pub fn as_node(&self) -> Option<&HashMap<String, ResourceTree>> {
        match self {
            Self::Node(children) => Some(children),
            Self::Scalar(_) => None,
        }
    }

    /// A node with no children. Scalars are never empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Node(children) if children.is_empty())
    }

    /// Number of scalar leaves below this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Node(children) => children.values().map(Self::leaf_count).sum(),
        }
    }
}

impl From<&str> for ResourceTree {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<String> for ResourceTree {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
