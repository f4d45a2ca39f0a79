//! Core types: attribute values, items, key schemas and size limits.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

/// Maximum item size in bytes (400KB, matching DynamoDB).
pub const MAX_ITEM_SIZE: usize = 400 * 1024;

/// Maximum hash key size in bytes (2048, matching DynamoDB).
pub const MAX_HASH_KEY_SIZE: usize = 2048;

/// Maximum range key size in bytes (1024, matching DynamoDB).
pub const MAX_RANGE_KEY_SIZE: usize = 1024;

/// The declared scalar type of a key attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    #[serde(rename = "S")]
    String,
    #[serde(rename = "N")]
    Number,
    #[serde(rename = "B")]
    Binary,
}

/// A typed scalar used both as key and as data.
///
/// Values are only comparable to values carrying the same tag: strings and
/// binaries order lexicographically by bytes, numbers order numerically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    #[serde(rename = "S")]
    String(String),
    #[serde(rename = "N")]
    Number(f64),
    #[serde(rename = "B")]
    Binary(Vec<u8>),
}

impl AttributeValue {
    /// The scalar type tag of this value.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            AttributeValue::String(_) => ScalarType::String,
            AttributeValue::Number(_) => ScalarType::Number,
            AttributeValue::Binary(_) => ScalarType::Binary,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            AttributeValue::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Size in bytes as counted against item and key limits.
    pub fn byte_size(&self) -> usize {
        match self {
            AttributeValue::String(s) => s.len(),
            AttributeValue::Number(_) => 8,
            AttributeValue::Binary(b) => b.len(),
        }
    }
}

impl PartialOrd for AttributeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (AttributeValue::String(a), AttributeValue::String(b)) => {
                Some(a.as_bytes().cmp(b.as_bytes()))
            }
            (AttributeValue::Number(a), AttributeValue::Number(b)) => a.partial_cmp(b),
            (AttributeValue::Binary(a), AttributeValue::Binary(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

/// Numbers are `f64`: integers beyond 2^53 round to the nearest representable
/// value, so two such integers can become the same key.
impl From<i64> for AttributeValue {
    fn from(n: i64) -> Self {
        AttributeValue::Number(n as f64)
    }
}

impl From<i32> for AttributeValue {
    fn from(n: i32) -> Self {
        AttributeValue::Number(f64::from(n))
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(b: Vec<u8>) -> Self {
        AttributeValue::Binary(b)
    }
}

impl From<&[u8]> for AttributeValue {
    fn from(b: &[u8]) -> Self {
        AttributeValue::Binary(b.to_vec())
    }
}

/// An item: attribute name to value, ordered by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(BTreeMap<String, AttributeValue>);

impl Item {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    /// Insert or replace an attribute, returning the previous value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributeValue> {
        self.0.iter()
    }

    /// Item size as DynamoDB counts it: attribute name lengths plus value sizes.
    pub fn byte_size(&self) -> usize {
        self.0
            .iter()
            .map(|(name, value)| name.len() + value.byte_size())
            .sum()
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for Item {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Item {
    type Item = (String, AttributeValue);
    type IntoIter = btree_map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A key attribute definition (name + type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchemaElement {
    pub attribute_name: String,
    pub attribute_type: ScalarType,
}

impl KeySchemaElement {
    pub fn new(attribute_name: &str, attribute_type: ScalarType) -> Self {
        Self {
            attribute_name: attribute_name.to_string(),
            attribute_type,
        }
    }
}

/// Key schema for a table: a required hash element and an optional range element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchema {
    pub hash_key_element: KeySchemaElement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_key_element: Option<KeySchemaElement>,
}

impl KeySchema {
    /// A hash-only schema.
    pub fn hash(attribute_name: &str, attribute_type: ScalarType) -> Self {
        Self {
            hash_key_element: KeySchemaElement::new(attribute_name, attribute_type),
            range_key_element: None,
        }
    }

    /// Add a range element to the schema.
    pub fn with_range(mut self, attribute_name: &str, attribute_type: ScalarType) -> Self {
        self.range_key_element = Some(KeySchemaElement::new(attribute_name, attribute_type));
        self
    }

    pub fn has_range_key(&self) -> bool {
        self.range_key_element.is_some()
    }
}

/// Schema definition for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub key_schema: KeySchema,
}
