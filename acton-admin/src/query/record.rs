//! Hydrated records returned by a [`Store`](super::Store)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Loaded value of a relation on a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum RelationValue {
    /// Relation loaded but empty, or not loaded
    #[default]
    None,
    /// To-one relation
    One(Box<Record>),
    /// To-many relation
    Many(Vec<Record>),
}

impl RelationValue {
    /// Records held by this relation value, in order
    #[must_use]
    pub fn records(&self) -> Vec<&Record> {
        match self {
            Self::None => Vec::new(),
            Self::One(record) => vec![record.as_ref()],
            Self::Many(records) => records.iter().collect(),
        }
    }

    /// The single related record of a to-one relation
    #[must_use]
    pub fn as_one(&self) -> Option<&Record> {
        match self {
            Self::One(record) => Some(record),
            _ => None,
        }
    }
}

/// A single row of an entity
///
/// `key` is the primary key value, `attributes` holds every selected
/// column (the key included), and `exists` tells whether the record is
/// persisted. Relations are attached by the caller that loaded them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    key: Value,
    attributes: Map<String, Value>,
    exists: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    relations: BTreeMap<String, RelationValue>,
}

impl Record {
    /// A persisted record whose key is read from `primary_key`
    #[must_use]
    pub fn persisted(primary_key: &str, attributes: Map<String, Value>) -> Self {
        let key = attributes.get(primary_key).cloned().unwrap_or(Value::Null);
        Self {
            key,
            attributes,
            exists: true,
            relations: BTreeMap::new(),
        }
    }

    /// A record that has not been saved yet
    #[must_use]
    pub fn unsaved(attributes: Map<String, Value>) -> Self {
        Self {
            key: Value::Null,
            attributes,
            exists: false,
            relations: BTreeMap::new(),
        }
    }

    /// Build a persisted record from a JSON object literal
    ///
    /// Non-object values produce a record without attributes.
    #[must_use]
    pub fn from_json(primary_key: &str, value: Value) -> Self {
        match value {
            Value::Object(map) => Self::persisted(primary_key, map),
            _ => Self::persisted(primary_key, Map::new()),
        }
    }

    /// Attach a loaded relation
    #[must_use]
    pub fn with_relation(mut self, name: impl Into<String>, value: RelationValue) -> Self {
        self.relations.insert(name.into(), value);
        self
    }

    /// Primary key value
    #[must_use]
    pub const fn key(&self) -> &Value {
        &self.key
    }

    /// Primary key rendered as an option key
    #[must_use]
    pub fn key_string(&self) -> String {
        value_to_label(&self.key)
    }

    /// Whether the record is persisted
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.exists
    }

    /// All attributes
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Attribute lookup with dot-path support (`author.name`)
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.attributes.get(path) {
            return Some(value);
        }

        let mut segments = path.split('.');
        let first = segments.next()?;

        let mut current = match self.attributes.get(first) {
            Some(value) => value,
            None => return self.relation_path(first, &segments.collect::<Vec<_>>()),
        };

        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    fn relation_path(&self, relation: &str, rest: &[&str]) -> Option<&Value> {
        if rest.is_empty() {
            return None;
        }
        let related = self.relations.get(relation)?.as_one()?;
        related.get(&rest.join("."))
    }

    /// Loaded relation by name
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&RelationValue> {
        self.relations.get(name)
    }

    /// Keep only the given columns (the key is always kept)
    #[must_use]
    pub fn project(mut self, primary_key: &str, columns: &[String]) -> Self {
        if columns.is_empty() {
            return self;
        }
        self.attributes
            .retain(|name, _| name == primary_key || columns.iter().any(|c| c == name));
        self
    }
}

/// Render a JSON value as display text (strings unquoted, null empty)
#[must_use]
pub fn value_to_label(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
