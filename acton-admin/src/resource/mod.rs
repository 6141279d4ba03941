//! Resources: the admin definition of one entity
//!
//! A resource names an entity, declares the fields of its forms, and, while
//! a record is being edited, carries that record. Relation fields use the
//! related entity's resource to build nested forms and routes.

use std::fmt;
use std::sync::Arc;

use crate::fields::Field;
use crate::query::{EntityDescriptor, Record};
use crate::routing::{Route, UrlBuilder};
use crate::support::slug;

/// Builds a fresh set of form fields
pub type FieldFactory = Arc<dyn Fn() -> Vec<Box<dyn Field>> + Send + Sync>;

/// Admin definition of an entity
pub trait Resource: Send + Sync + fmt::Debug {
    /// URI segment identifying the resource in routes
    fn uri_key(&self) -> &str;

    /// Human-readable title
    fn title(&self) -> &str;

    /// Backing entity
    fn entity(&self) -> &EntityDescriptor;

    /// Fields shown on the create/edit form, unfilled
    fn form_fields(&self) -> Vec<Box<dyn Field>>;

    /// Record being edited, if any
    fn item(&self) -> Option<&Record>;

    /// The edited record, or a blank unsaved one
    fn item_or_instance(&self) -> Record {
        self.item()
            .cloned()
            .unwrap_or_else(|| Record::unsaved(serde_json::Map::new()))
    }

    /// Delete route of one of this resource's records
    fn destroy_route(&self, urls: &UrlBuilder, key: &str) -> Route {
        urls.crud_destroy(self.uri_key(), key)
    }
}

/// [`Resource`] assembled from plain values
#[derive(Clone)]
pub struct ModelResource {
    uri_key: String,
    title: String,
    entity: EntityDescriptor,
    fields: Option<FieldFactory>,
    item: Option<Record>,
}

impl fmt::Debug for ModelResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelResource")
            .field("uri_key", &self.uri_key)
            .field("title", &self.title)
            .field("entity", &self.entity)
            .field("item", &self.item)
            .finish_non_exhaustive()
    }
}

impl ModelResource {
    /// Resource titled `title` over `entity`; the URI key is the title's slug
    #[must_use]
    pub fn new(title: impl Into<String>, entity: EntityDescriptor) -> Self {
        let title = title.into();
        Self {
            uri_key: slug(&title),
            title,
            entity,
            fields: None,
            item: None,
        }
    }

    /// Override the URI key
    #[must_use]
    pub fn with_uri_key(mut self, uri_key: impl Into<String>) -> Self {
        self.uri_key = uri_key.into();
        self
    }

    /// Declare the form fields
    #[must_use]
    pub fn fields<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Vec<Box<dyn Field>> + Send + Sync + 'static,
    {
        self.fields = Some(Arc::new(factory));
        self
    }

    /// Set the record being edited
    #[must_use]
    pub fn with_item(mut self, item: Record) -> Self {
        self.item = Some(item);
        self
    }
}

impl Resource for ModelResource {
    fn uri_key(&self) -> &str {
        &self.uri_key
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn entity(&self) -> &EntityDescriptor {
        &self.entity
    }

    fn form_fields(&self) -> Vec<Box<dyn Field>> {
        self.fields.as_ref().map_or_else(Vec::new, |factory| factory())
    }

    fn item(&self) -> Option<&Record> {
        self.item.as_ref()
    }
}
