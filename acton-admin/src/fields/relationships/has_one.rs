use async_trait::async_trait;
use std::fmt::{self, Write};
use std::sync::Arc;

use super::{HasRelation, RelationDescriptor};
use crate::context::AdminContext;
use crate::error::AdminResult;
use crate::fields::field::{Field, FieldCore};
use crate::forms::{FormField, FormRenderer, RelationFormAssembler};
use crate::query::{value_to_label, Record, RelationValue};
use crate::resource::{FieldFactory, Resource};

/// Edits the single related record through a nested form
///
/// The form is built from the related resource's form fields unless
/// explicit fields are given; see [`RelationFormAssembler`].
#[derive(Clone)]
pub struct HasOne {
    core: FieldCore,
    relation: RelationDescriptor,
    resource: Arc<dyn Resource>,
    fields: Option<FieldFactory>,
    parent: Option<Record>,
    current: RelationValue,
}

impl fmt::Debug for HasOne {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HasOne")
            .field("core", &self.core)
            .field("relation", &self.relation.name)
            .field("resource", &self.resource.uri_key())
            .field("parent", &self.parent.as_ref().map(Record::key_string))
            .finish_non_exhaustive()
    }
}

impl HasOne {
    /// Field labelled `label` over `relation`, editing through `resource`
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        relation: impl Into<String>,
        resource: Arc<dyn Resource>,
    ) -> Self {
        let relation = RelationDescriptor::to_one(relation, resource.entity().clone());
        Self {
            core: FieldCore::with_column(label, relation.name.clone()),
            relation,
            resource,
            fields: None,
            parent: None,
            current: RelationValue::None,
        }
    }

    /// Use these fields instead of the related resource's form fields
    #[must_use]
    pub fn fields<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Vec<Box<dyn Field>> + Send + Sync + 'static,
    {
        self.fields = Some(Arc::new(factory));
        self
    }

    /// Related resource
    #[must_use]
    pub fn resource(&self) -> &Arc<dyn Resource> {
        &self.resource
    }

    /// Record this field was filled from
    #[must_use]
    pub const fn parent(&self) -> Option<&Record> {
        self.parent.as_ref()
    }

    /// The related record, when the parent has one
    #[must_use]
    pub fn item(&self) -> Option<&Record> {
        self.current.as_one()
    }

    /// Fresh, unfilled fields of the nested form
    #[must_use]
    pub fn prepared_fields(&self) -> Vec<Box<dyn Field>> {
        match &self.fields {
            Some(factory) => factory(),
            None => self.resource.form_fields(),
        }
    }

    /// Nested form markup
    ///
    /// # Errors
    ///
    /// See [`RelationFormAssembler::assemble`].
    pub async fn render(&self, ctx: &AdminContext) -> AdminResult<String> {
        Ok(RelationFormAssembler::assemble(self, ctx).await?.render())
    }

    fn preview_table(&self, item: &Record) -> String {
        let mut html = String::from("<table class=\"table-vertical\">\n");
        for mut field in self.prepared_fields() {
            field.fill(item);
            let _ = writeln!(
                html,
                "  <tr><th>{}</th><td>{}</td></tr>",
                FormRenderer::escape_html(field.core().label()),
                field.preview()
            );
        }
        html.push_str("</table>");
        html
    }
}

#[async_trait]
impl Field for HasOne {
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
        self.parent = Some(record.clone());

        let value = self
            .current
            .as_one()
            .map(|item| serde_json::Value::Object(item.attributes().clone()))
            .unwrap_or_default();
        self.core.set_value(value);
    }

    fn preview_is_markup(&self) -> bool {
        true
    }

    fn resolve_preview(&self) -> String {
        let Some(item) = self.item() else {
            return String::new();
        };

        if self.core.is_raw_mode() {
            return item
                .get(&self.relation.related.display_column)
                .map(value_to_label)
                .unwrap_or_default();
        }

        self.preview_table(item)
    }

    async fn to_form_field(&mut self, ctx: &AdminContext) -> AdminResult<FormField> {
        let html = self.render(ctx).await?;
        Ok(FormField::fragment(self.relation.name.clone(), html).with_label(self.core.label()))
    }
}

impl HasRelation for HasOne {
    fn relation(&self) -> &RelationDescriptor {
        &self.relation
    }

    fn relation_value(&self) -> &RelationValue {
        &self.current
    }
}
