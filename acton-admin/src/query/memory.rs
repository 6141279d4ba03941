//! In-memory store
//!
//! Evaluates [`Query`] predicates against records held in a map. Useful for
//! fixtures, prototypes, and admin panels over non-relational data. By
//! default it does not advertise the fingerprint capability, so related
//! values resolved against it are never cached.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use super::{Direction, Operator, Predicate, Query, Record, Store};
use crate::error::{AdminError, AdminResult};

/// Map-backed [`Store`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entities: RwLock<HashMap<String, Vec<Record>>>,
    fingerprints: bool,
    executions: AtomicUsize,
}

impl MemoryStore {
    /// Empty store without fingerprint support
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advertise the fingerprint capability (enables result caching)
    #[must_use]
    pub fn with_fingerprints(mut self) -> Self {
        self.fingerprints = true;
        self
    }

    /// Register an entity, possibly without records
    pub fn register(&self, entity: impl Into<String>) {
        self.entities.write().entry(entity.into()).or_default();
    }

    /// Append a record to an entity
    pub fn insert(&self, entity: impl Into<String>, record: Record) {
        self.entities
            .write()
            .entry(entity.into())
            .or_default()
            .push(record);
    }

    /// Append several records to an entity
    pub fn extend<I>(&self, entity: impl Into<String>, records: I)
    where
        I: IntoIterator<Item = Record>,
    {
        self.entities
            .write()
            .entry(entity.into())
            .or_default()
            .extend(records);
    }

    /// Number of queries executed so far
    #[must_use]
    pub fn executions(&self) -> usize {
        self.executions.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn supports_fingerprint(&self) -> bool {
        self.fingerprints
    }

    async fn fetch(&self, query: &Query) -> AdminResult<Vec<Record>> {
        self.executions.fetch_add(1, AtomicOrdering::SeqCst);

        let mut rows = {
            let entities = self.entities.read();
            let records = entities
                .get(&query.entity().name)
                .ok_or_else(|| AdminError::UnknownEntity(query.entity().name.clone()))?;

            records
                .iter()
                .filter(|record| query.predicates().iter().all(|p| matches(record, p)))
                .cloned()
                .collect::<Vec<_>>()
        };

        if !query.ordering().is_empty() {
            rows.sort_by(|a, b| {
                for (column, direction) in query.ordering() {
                    let ordering = compare(a.get(column), b.get(column));
                    let ordering = match direction {
                        Direction::Asc => ordering,
                        Direction::Desc => ordering.reverse(),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        }

        let offset = usize::try_from(query.offset_value().unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = query
            .limit_value()
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        let primary_key = &query.entity().primary_key;
        Ok(rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|record| record.project(primary_key, query.columns()))
            .collect())
    }
}

fn matches(record: &Record, predicate: &Predicate) -> bool {
    let actual = record.get(&predicate.column);
    let is_null = actual.is_none_or(Value::is_null);

    match predicate.operator {
        Operator::IsNull => is_null,
        Operator::NotNull => !is_null,
        _ if is_null => false,
        Operator::Eq => compare(actual, Some(&predicate.value)) == Ordering::Equal,
        Operator::Ne => compare(actual, Some(&predicate.value)) != Ordering::Equal,
        Operator::Gt => compare(actual, Some(&predicate.value)) == Ordering::Greater,
        Operator::Gte => compare(actual, Some(&predicate.value)) != Ordering::Less,
        Operator::Lt => compare(actual, Some(&predicate.value)) == Ordering::Less,
        Operator::Lte => compare(actual, Some(&predicate.value)) != Ordering::Greater,
        Operator::In => match &predicate.value {
            Value::Array(values) => values
                .iter()
                .any(|v| compare(actual, Some(v)) == Ordering::Equal),
            other => compare(actual, Some(other)) == Ordering::Equal,
        },
        Operator::Like => match (actual, &predicate.value) {
            (Some(value), Value::String(pattern)) => {
                like(&super::value_to_label(value).to_lowercase(), &pattern.to_lowercase())
            }
            _ => false,
        },
    }
}

/// Total order over JSON scalars: nulls first, numbers numerically,
/// booleans as 0/1, everything else by display text
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => super::value_to_label(a).cmp(&super::value_to_label(b)),
        },
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// SQL `LIKE` matching: `%` any run, `_` any single character
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '%')
}
