//! Projection of configuration trees onto typed structures
//!
//! [`NodeDeserializer`] drives any `serde::Deserialize` type from a [`Node`].
//! Scalars are stored as text and parsed into whatever type the target asks
//! for, so `port: u16` accepts both the document's `1949` and an override's
//! `"2008"`. Untyped targets (`deserialize_any`) get a best-effort guess:
//! boolean, integer, float, then string.
//!
//! [`Rendered`] is the reverse direction, used to print a merged tree.

use rk_override::{Mapping, Node};
use serde::de::{
    self, DeserializeOwned, EnumAccess, IntoDeserializer, VariantAccess, Visitor,
    value::{MapDeserializer, SeqDeserializer, StringDeserializer},
};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::DecodeError;

/// Decode a typed configuration from a tree.
pub fn from_node<T: DeserializeOwned>(node: Node) -> Result<T, DecodeError> {
    T::deserialize(NodeDeserializer::new(node))
}

/// A serde deserializer over an owned [`Node`].
#[derive(Debug, Clone)]
pub struct NodeDeserializer {
    node: Node,
}

impl NodeDeserializer {
    pub fn new(node: Node) -> Self {
        Self { node }
    }

    fn scalar(&self, expected: &str) -> Result<&str, DecodeError> {
        match &self.node {
            Node::Scalar(text) => Ok(text.trim()),
            other => Err(DecodeError::new(format!(
                "expected {expected}, found {}",
                other.kind()
            ))),
        }
    }

    fn parse_scalar<T>(&self, expected: &str) -> Result<T, DecodeError>
    where
        T: std::str::FromStr,
    {
        let text = self.scalar(expected)?;
        text.parse::<T>()
            .map_err(|_| DecodeError::new(format!("expected {expected}, found '{text}'")))
    }
}

impl<'de> IntoDeserializer<'de, DecodeError> for NodeDeserializer {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

/// Parsed form of a scalar for untyped targets.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Inferred<'a> {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(&'a str),
}

pub(crate) fn infer(text: &str) -> Inferred<'_> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "~" || trimmed == "null" {
        return Inferred::Null;
    }
    if let Some(b) = parse_bool(trimmed) {
        return Inferred::Bool(b);
    }
    if !has_canonical_digits(trimmed) {
        return Inferred::Str(text);
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        if i.to_string() == trimmed {
            return Inferred::Int(i);
        }
    }
    if let Ok(u) = trimmed.parse::<u64>() {
        if u.to_string() == trimmed {
            return Inferred::UInt(u);
        }
    }
    if looks_like_float(trimmed) {
        if let Ok(f) = trimmed.parse::<f64>() {
            return Inferred::Float(f);
        }
    }
    Inferred::Str(text)
}

/// Text that would lose characters when printed back as a number, such as
/// `01234` or `+5`, stays a string.
fn has_canonical_digits(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let integral = unsigned.split(['.', 'e', 'E']).next().unwrap_or_default();
    !unsigned.starts_with('+') && !(integral.len() > 1 && integral.starts_with('0'))
}

/// Only plain decimal notation counts as a float; `inf` or `NaN` stay strings.
fn looks_like_float(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Rename keys that equal a declared field name ignoring ASCII case.
///
/// Exact matches are left alone and never overwritten, so a document holding
/// both `commonService` and `commonservice` keeps the exact one.
fn match_fields(mut map: Mapping, fields: &[&str]) -> Mapping {
    let renames: Vec<(String, &str)> = map
        .keys()
        .filter(|key| !fields.contains(&key.as_str()))
        .filter_map(|key| {
            fields
                .iter()
                .find(|field| field.eq_ignore_ascii_case(key))
                .map(|field| (key.clone(), *field))
        })
        .collect();

    for (key, field) in renames {
        if map.contains_key(field) {
            continue;
        }
        if let Some(value) = map.remove(&key) {
            map.insert(field.to_string(), value);
        }
    }
    map
}

fn is_null(node: &Node) -> bool {
    matches!(node, Node::Scalar(text) if matches!(infer(text), Inferred::Null))
}

macro_rules! deserialize_number {
    ($($method:ident => $visit:ident: $ty:ty,)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
                visitor.$visit(self.parse_scalar::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for NodeDeserializer {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::Scalar(text) => match infer(&text) {
                Inferred::Null => visitor.visit_unit(),
                Inferred::Bool(b) => visitor.visit_bool(b),
                Inferred::Int(i) => visitor.visit_i64(i),
                Inferred::UInt(u) => visitor.visit_u64(u),
                Inferred::Float(f) => visitor.visit_f64(f),
                Inferred::Str(s) => visitor.visit_str(s),
            },
            Node::Mapping(_) => self.deserialize_map(visitor),
            Node::Sequence(_) => self.deserialize_seq(visitor),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let text = self.scalar("a boolean")?;
        match parse_bool(text) {
            Some(b) => visitor.visit_bool(b),
            None => Err(DecodeError::new(format!(
                "expected a boolean, found '{text}'"
            ))),
        }
    }

    deserialize_number! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
        deserialize_char => visit_char: char,
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::Scalar(text) => visitor.visit_string(text),
            other => Err(DecodeError::new(format!(
                "expected a string, found {}",
                other.kind()
            ))),
        }
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::Scalar(text) => visitor.visit_byte_buf(text.into_bytes()),
            Node::Sequence(_) => self.deserialize_seq(visitor),
            Node::Mapping(_) => Err(DecodeError::new("expected bytes, found mapping")),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        if is_null(&self.node) {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        if is_null(&self.node) {
            visitor.visit_unit()
        } else {
            Err(DecodeError::new(format!(
                "expected an empty value, found {}",
                self.node.kind()
            )))
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::Sequence(items) => {
                let mut seq: SeqDeserializer<_, DecodeError> =
                    SeqDeserializer::new(items.into_iter().map(NodeDeserializer::new));
                let value = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(value)
            }
            other => Err(DecodeError::new(format!(
                "expected a sequence, found {}",
                other.kind()
            ))),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::Mapping(map) => {
                let mut entries: MapDeserializer<'_, _, DecodeError> = MapDeserializer::new(
                    map.into_iter()
                        .map(|(key, value)| (key, NodeDeserializer::new(value))),
                );
                let value = visitor.visit_map(&mut entries)?;
                entries.end()?;
                Ok(value)
            }
            other => Err(DecodeError::new(format!(
                "expected a mapping, found {}",
                other.kind()
            ))),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::Mapping(map) => {
                NodeDeserializer::new(Node::Mapping(match_fields(map, fields))).deserialize_map(visitor)
            }
            other => NodeDeserializer::new(other).deserialize_map(visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        match self.node {
            Node::Scalar(text) => {
                let variant: StringDeserializer<DecodeError> =
                    text.trim().to_string().into_deserializer();
                visitor.visit_enum(variant)
            }
            Node::Mapping(map) if map.len() == 1 => {
                let Some((variant, value)) = map.into_iter().next() else {
                    unreachable!("mapping has exactly one entry")
                };
                visitor.visit_enum(VariantNode { variant, value })
            }
            other => Err(DecodeError::new(format!(
                "expected an enum variant name or a single-entry mapping, found {}",
                other.kind()
            ))),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_unit()
    }
}

/// An enum variant written as `{ variant: value }`.
struct VariantNode {
    variant: String,
    value: Node,
}

impl<'de> EnumAccess<'de> for VariantNode {
    type Error = DecodeError;
    type Variant = NodeDeserializer;

    fn variant_seed<S>(self, seed: S) -> Result<(S::Value, NodeDeserializer), DecodeError>
    where
        S: de::DeserializeSeed<'de>,
    {
        let name: StringDeserializer<DecodeError> = self.variant.into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((variant, NodeDeserializer::new(self.value)))
    }
}

impl<'de> VariantAccess<'de> for NodeDeserializer {
    type Error = DecodeError;

    fn unit_variant(self) -> Result<(), DecodeError> {
        de::Deserialize::deserialize(self)
    }

    fn newtype_variant_seed<S>(self, seed: S) -> Result<S::Value, DecodeError>
    where
        S: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        de::Deserializer::deserialize_struct(self, "", fields, visitor)
    }
}

/// Serializes a tree, inferring scalar types the way untyped decoding does.
#[derive(Debug, Clone, Copy)]
pub struct Rendered<'a>(pub &'a Node);

impl Serialize for Rendered<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Node::Scalar(text) => match infer(text) {
                Inferred::Null => serializer.serialize_unit(),
                Inferred::Bool(b) => serializer.serialize_bool(b),
                Inferred::Int(i) => serializer.serialize_i64(i),
                Inferred::UInt(u) => serializer.serialize_u64(u),
                Inferred::Float(f) => serializer.serialize_f64(f),
                Inferred::Str(s) => serializer.serialize_str(s),
            },
            Node::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, &Rendered(value))?;
                }
                out.end()
            }
            Node::Sequence(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(&Rendered(item))?;
                }
                out.end()
            }
        }
    }
}
