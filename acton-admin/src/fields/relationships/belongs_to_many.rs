use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::{HasRelatedValues, HasRelation, RelatedValues, RelationDescriptor};
use crate::context::AdminContext;
use crate::error::AdminResult;
use crate::fields::field::{Field, FieldCore};
use crate::fields::options::Selected;
use crate::forms::FormField;
use crate::query::{value_to_label, Query, Record, RelationValue};

/// Multiple select of related records through a to-many relation
#[derive(Debug, Clone)]
pub struct BelongsToMany {
    core: FieldCore,
    relation: RelationDescriptor,
    related_values: RelatedValues,
    current: RelationValue,
}

impl BelongsToMany {
    /// Field labelled `label` over the to-many `relation`
    #[must_use]
    pub fn new(label: impl Into<String>, relation: RelationDescriptor) -> Self {
        let mut core = FieldCore::with_column(label, relation.name.clone());
        core.set_nested_name(true);
        Self {
            core,
            relation,
            related_values: RelatedValues::new(),
            current: RelationValue::None,
        }
    }

    /// Narrow the candidates
    #[must_use]
    pub fn values_query<F>(mut self, narrow: F) -> Self
    where
        F: Fn(Query, &FieldCore) -> Query + Send + Sync + 'static,
    {
        self.related_values.set_values_query(Arc::new(narrow));
        self
    }

    /// Label candidates with `column`
    #[must_use]
    pub fn display(mut self, column: impl Into<String>) -> Self {
        self.related_values.set_display_column(column);
        self
    }

    /// Show the image in `column` next to each candidate
    #[must_use]
    pub fn with_image(mut self, column: impl Into<String>) -> Self {
        self.related_values.set_image_column(column);
        self
    }
}

#[async_trait]
impl Field for BelongsToMany {
    fn core(&self) -> &FieldCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut FieldCore {
        &mut self.core
    }

    fn fill(&mut self, record: &Record) {
        self.current = record
            .relation(&self.relation.name)
            .cloned()
            .unwrap_or_default();

        let keys = self
            .current
            .records()
            .into_iter()
            .map(|related| related.key().clone())
            .collect::<Vec<_>>();
        let value = if keys.is_empty() {
            Value::Null
        } else {
            Value::Array(keys)
        };
        self.core.set_value(value);
    }

    fn resolve_preview(&self) -> String {
        let separator = if self.core.is_raw_mode() { ";" } else { ", " };
        self.current
            .records()
            .into_iter()
            .map(|related| self.related_values.label_for(related, &self.relation, &self.core))
            .collect::<Vec<_>>()
            .join(separator)
    }

    async fn to_form_field(&mut self, ctx: &AdminContext) -> AdminResult<FormField> {
        let values = self.get_values(ctx).await?;
        Ok(
            FormField::select(self.core.name_attribute(None), values.to_select_options(), true)
                .with_label(self.core.label())
                .with_selected(values.selected().keys()),
        )
    }
}

impl HasRelation for BelongsToMany {
    fn relation(&self) -> &RelationDescriptor {
        &self.relation
    }

    fn relation_value(&self) -> &RelationValue {
        &self.current
    }
}

impl HasRelatedValues for BelongsToMany {
    fn related_values(&self) -> &RelatedValues {
        &self.related_values
    }

    fn related_values_mut(&mut self) -> &mut RelatedValues {
        &mut self.related_values
    }

    fn selected(&self) -> Selected {
        match self.core.to_value() {
            None => Selected::None,
            Some(Value::Array(keys)) => Selected::Many(keys.iter().map(value_to_label).collect()),
            Some(key) => Selected::Many(vec![value_to_label(key)]),
        }
    }
}
