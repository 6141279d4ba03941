//! Relation fields
//!
//! [`BelongsTo`] and [`BelongsToMany`] pick related records from a select
//! whose options come from [`RelatedValues`]. [`HasOne`] edits its related
//! record through a nested form of the related resource.

mod belongs_to;
mod belongs_to_many;
mod has_one;
mod related_values;

pub use belongs_to::BelongsTo;
pub use belongs_to_many::BelongsToMany;
pub use has_one::HasOne;
pub use related_values::{RelatedValues, ValuesQuery};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::field::Field;
use super::options::{OptionSet, Selected};
use crate::context::AdminContext;
use crate::error::AdminResult;
use crate::query::{EntityDescriptor, RelationValue};

/// How many records a relation holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// At most one related record
    ToOne,
    /// Any number of related records
    ToMany,
}

/// A named relation from the owning entity to `related`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    /// Relation name, also the key of the loaded relation on records
    pub name: String,
    /// Related entity
    pub related: EntityDescriptor,
    /// Cardinality
    pub cardinality: Cardinality,
    /// Column on the owning entity holding the related key (to-one)
    pub foreign_key: Option<String>,
    /// Candidate lookups need the parent resource in the request context
    pub requires_parent: bool,
}

impl RelationDescriptor {
    /// To-one relation `name` over `related`
    #[must_use]
    pub fn to_one(name: impl Into<String>, related: EntityDescriptor) -> Self {
        Self {
            name: name.into(),
            related,
            cardinality: Cardinality::ToOne,
            foreign_key: None,
            requires_parent: false,
        }
    }

    /// To-many relation `name` over `related`
    #[must_use]
    pub fn to_many(name: impl Into<String>, related: EntityDescriptor) -> Self {
        Self {
            cardinality: Cardinality::ToMany,
            ..Self::to_one(name, related)
        }
    }

    /// Set the foreign key column
    #[must_use]
    pub fn foreign_key(mut self, column: impl Into<String>) -> Self {
        self.foreign_key = Some(column.into());
        self
    }

    /// Require a parent resource when resolving candidates
    #[must_use]
    pub const fn nested(mut self) -> Self {
        self.requires_parent = true;
        self
    }

    /// Foreign key column, `{name}_id` unless set
    #[must_use]
    pub fn foreign_key_column(&self) -> String {
        self.foreign_key
            .clone()
            .unwrap_or_else(|| format!("{}_id", self.name))
    }

    /// Whether this is a to-one relation
    #[must_use]
    pub const fn is_to_one(&self) -> bool {
        matches!(self.cardinality, Cardinality::ToOne)
    }
}

/// A field bound to a relation
pub trait HasRelation: Field {
    /// The relation
    fn relation(&self) -> &RelationDescriptor;

    /// Related record(s) captured by the last fill
    fn relation_value(&self) -> &RelationValue;
}

/// A relation field whose options are the related entity's records
#[async_trait]
pub trait HasRelatedValues: HasRelation {
    /// Candidate resolver
    fn related_values(&self) -> &RelatedValues;

    /// Candidate resolver, mutable
    fn related_values_mut(&mut self) -> &mut RelatedValues;

    /// Keys currently selected
    fn selected(&self) -> Selected;

    /// Candidate options with the current selection
    ///
    /// Candidates are loaded once per field instance; see
    /// [`RelatedValues::get_values`].
    async fn get_values(&mut self, ctx: &AdminContext) -> AdminResult<OptionSet> {
        let relation = self.relation().clone();
        let core = self.core().clone();
        let selected = self.selected();
        let current = self.relation_value().clone();

        self.related_values_mut()
            .get_values(ctx, &relation, &core, selected, &current)
            .await
    }
}
