//! Boot documents as configuration trees
//!
//! A YAML boot document is decoded with `serde_yaml` and converted into a
//! [`Node`] tree. Scalars keep their textual form: strings verbatim, booleans
//! as `true`/`false`, numbers in decimal form and null as the empty string.

use rk_override::{Mapping, Node};
use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};

/// Parse a YAML boot document into a mapping-rooted tree.
///
/// An empty or null document yields an empty mapping.
pub fn parse_document(raw: &str) -> Result<Node> {
    if raw.trim().is_empty() {
        return Ok(Node::empty_mapping());
    }

    let value: YamlValue =
        serde_yaml::from_str(raw).map_err(|e| Error::document(e.to_string()))?;
    from_yaml(value)
}

/// Convert a decoded YAML value into a mapping-rooted tree.
pub fn from_yaml(value: YamlValue) -> Result<Node> {
    match untag(value) {
        YamlValue::Null => Ok(Node::empty_mapping()),
        value @ YamlValue::Mapping(_) => Ok(convert(value)),
        other => Err(Error::document(format!(
            "root must be a mapping, found {}",
            yaml_kind(&other)
        ))),
    }
}

fn untag(value: YamlValue) -> YamlValue {
    match value {
        YamlValue::Tagged(tagged) => untag(tagged.value),
        other => other,
    }
}

fn convert(value: YamlValue) -> Node {
    match untag(value) {
        YamlValue::Null => Node::Scalar(String::new()),
        YamlValue::Bool(b) => Node::Scalar(b.to_string()),
        YamlValue::Number(n) => Node::Scalar(n.to_string()),
        YamlValue::String(s) => Node::Scalar(s),
        YamlValue::Sequence(items) => Node::Sequence(items.into_iter().map(convert).collect()),
        YamlValue::Mapping(map) => {
            let mut converted = Mapping::new();
            for (key, value) in map {
                match mapping_key(untag(key)) {
                    Some(key) => {
                        converted.insert(key, convert(value));
                    }
                    None => {
                        tracing::warn!("Skipping boot document entry with a non-scalar key");
                    }
                }
            }
            Node::Mapping(converted)
        }
        YamlValue::Tagged(_) => unreachable!("tags are stripped by untag"),
    }
}

fn mapping_key(key: YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn yaml_kind(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a sequence",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}
