//! Nested forms of to-one relation fields
//!
//! The sub-form posts to the parent resource's relation route: `store`
//! while the parent has no related record, `update` (spoofed `PUT`) once it
//! has one. Existing records also get an inline delete button whose
//! confirmation dialog redirects back to the parent's form page.

use serde_json::Map;
use tracing::{debug, warn};

use super::builder::FormBuilder;
use super::button::ActionButton;
use super::field::FormField;
use crate::context::AdminContext;
use crate::error::{AdminError, AdminResult};
use crate::fields::{HasOne, HasRelation};
use crate::query::Record;
use crate::routing::Route;

/// Whether a relation form creates or updates the related record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// No related record yet
    Create,
    /// Editing the existing related record
    Update,
}

/// An assembled relation sub-form
#[derive(Debug, Clone)]
pub struct RelationForm {
    action: FormAction,
    route: Route,
    form: FormBuilder,
}

impl RelationForm {
    /// Create or update
    #[must_use]
    pub const fn action(&self) -> FormAction {
        self.action
    }

    /// Target route
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Underlying form
    #[must_use]
    pub const fn form(&self) -> &FormBuilder {
        &self.form
    }

    /// Spoofed method, `PUT` for updates
    #[must_use]
    pub fn method_override(&self) -> Option<&str> {
        self.form.hidden_value("_method")
    }

    /// Relation name carried in the `_relation` input
    #[must_use]
    pub fn relation(&self) -> Option<&str> {
        self.form.hidden_value("_relation")
    }

    /// Delete button, present for updates
    #[must_use]
    pub fn delete_button(&self) -> Option<&ActionButton> {
        self.form.form_buttons().first()
    }

    /// Render to HTML
    #[must_use]
    pub fn render(&self) -> String {
        self.form.build()
    }
}

/// Builds [`RelationForm`]s for [`HasOne`] fields
pub struct RelationFormAssembler;

impl RelationFormAssembler {
    /// Assemble the sub-form of `field` within the request `ctx`
    ///
    /// The field should have been filled from the parent record.
    ///
    /// # Errors
    ///
    /// - [`AdminError::Configuration`] if `ctx` carries no parent resource
    /// - any error raised while the nested fields build their controls
    pub async fn assemble(field: &HasOne, ctx: &AdminContext) -> AdminResult<RelationForm> {
        let relation = &field.relation().name;
        let parent_resource = ctx.resource().ok_or_else(|| {
            warn!(relation = %relation, "Relation form requested without a parent resource");
            AdminError::configuration("parent resource is required")
        })?;
        let parent_item = parent_resource.item_or_instance();

        let urls = ctx.urls();
        let labels = &ctx.config().labels;
        let parent_key = field
            .parent()
            .map_or_else(|| parent_item.key_string(), Record::key_string);
        let item = field.item();

        let (action, route) = match item {
            Some(_) => (
                FormAction::Update,
                urls.relation_update(parent_resource.uri_key(), &parent_key, relation),
            ),
            None => (
                FormAction::Create,
                urls.relation_store(parent_resource.uri_key(), &parent_key, relation),
            ),
        };
        debug!(relation = %relation, route = %route, ?action, "Assembling relation form");

        let fill_from = item
            .cloned()
            .unwrap_or_else(|| Record::unsaved(Map::new()));
        let mut controls = Vec::new();
        for mut nested in field.prepared_fields() {
            nested.fill(&fill_from);
            controls.push(nested.to_form_field(ctx).await?);
        }

        let mut form = FormBuilder::new(route.url.clone(), route.form_method())
            .precognitive()
            .asynchronous()
            .name(relation.clone())
            .fields(controls);

        if let Some(method) = route.spoofed_method() {
            form = form.hidden("_method", method);
        }
        form = form.hidden("_relation", relation.clone());

        if let Some(item) = item {
            let parent_page_key = parent_item.key_string();
            let redirect = urls.page(
                parent_resource.uri_key(),
                "form-page",
                Some(parent_page_key.as_str()),
            );
            let destroy = field.resource().destroy_route(urls, &item.key_string());

            let delete = ActionButton::new(labels.delete.clone(), destroy.url)
                .class("btn-secondary btn-lg")
                .in_modal(labels.delete.clone(), |button| {
                    FormBuilder::new(button.url.clone(), "POST")
                        .hidden("_method", "DELETE")
                        .add_field(FormField::text_block("", labels.confirm_message.clone()))
                        .submit(labels.delete.clone())
                        .submit_class("btn-secondary")
                        .redirect(redirect)
                })
                .show_in_line();
            form = form.buttons([delete]);
        }

        let form = form
            .submit(labels.save.clone())
            .submit_class("btn-primary btn-lg");

        Ok(RelationForm {
            action,
            route,
            form,
        })
    }
}
