use async_trait::async_trait;
use std::sync::Arc;

use super::{HasRelatedValues, HasRelation, RelatedValues, RelationDescriptor};
use crate::context::AdminContext;
use crate::error::AdminResult;
use crate::fields::field::{Field, FieldCore};
use crate::fields::options::Selected;
use crate::forms::{FieldFlags, FormField, SelectOption};
use crate::query::{value_to_label, Query, Record, RelationValue};

/// Select of one related record, stored in a foreign key column
#[derive(Debug, Clone)]
pub struct BelongsTo {
    core: FieldCore,
    relation: RelationDescriptor,
    related_values: RelatedValues,
    current: RelationValue,
    placeholder: Option<String>,
}

impl BelongsTo {
    /// Field labelled `label` over the to-one `relation`
    #[must_use]
    pub fn new(label: impl Into<String>, relation: RelationDescriptor) -> Self {
        let column = relation.foreign_key_column();
        Self {
            core: FieldCore::with_column(label, column),
            relation,
            related_values: RelatedValues::new(),
            current: RelationValue::None,
            placeholder: None,
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

    /// Leading empty option
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }
}

#[async_trait]
impl Field for BelongsTo {
    fn core(&self) -> &FieldCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut FieldCore {
        &mut self.core
    }

    fn fill(&mut self, record: &Record) {
        let key = record.get(self.core.column()).cloned();
        self.current = record
            .relation(&self.relation.name)
            .cloned()
            .unwrap_or_default();

        let key = key
            .filter(|value| !value.is_null())
            .or_else(|| self.current.as_one().map(|related| related.key().clone()));
        self.core.set_value(key.unwrap_or_default());
    }

    fn resolve_preview(&self) -> String {
        match self.current.as_one() {
            Some(related) => self.related_values.label_for(related, &self.relation, &self.core),
            None if self.core.is_raw_mode() => {
                self.core.value().map(value_to_label).unwrap_or_default()
            }
            None => String::new(),
        }
    }

    async fn to_form_field(&mut self, ctx: &AdminContext) -> AdminResult<FormField> {
        let values = self.get_values(ctx).await?;

        let mut options = Vec::with_capacity(values.len() + 1);
        if let Some(ref placeholder) = self.placeholder {
            options.push(SelectOption::new("", placeholder.clone()));
        }
        options.extend(values.to_select_options());

        let mut field = FormField::select(self.core.name_attribute(None), options, false)
            .with_label(self.core.label())
            .with_selected(values.selected().keys());
        field.flags = FieldFlags {
            required: self.core.is_required(),
            ..FieldFlags::default()
        };
        Ok(field)
    }
}

impl HasRelation for BelongsTo {
    fn relation(&self) -> &RelationDescriptor {
        &self.relation
    }

    fn relation_value(&self) -> &RelationValue {
        &self.current
    }
}

impl HasRelatedValues for BelongsTo {
    fn related_values(&self) -> &RelatedValues {
        &self.related_values
    }

    fn related_values_mut(&mut self) -> &mut RelatedValues {
        &mut self.related_values
    }

    fn selected(&self) -> Selected {
        self.core
            .to_value()
            .map_or(Selected::None, |key| Selected::One(value_to_label(key)))
    }
}
