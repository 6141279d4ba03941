use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::RelationDescriptor;
use crate::context::AdminContext;
use crate::error::{AdminError, AdminResult};
use crate::fields::field::FieldCore;
use crate::fields::options::{OptionProperties, OptionSet, Selected};
use crate::query::{value_to_label, Query, Record, RelationValue};

/// Narrows the candidate query of a relation field
pub type ValuesQuery = Arc<dyn Fn(Query, &FieldCore) -> Query + Send + Sync>;

/// Resolves the candidate records of a relation field into options
///
/// Candidates are memoized on the instance: once loaded, later calls reuse
/// them until [`RelatedValues::invalidate`]. Across instances, results are
/// shared through the context's cache, keyed by the fingerprint of the
/// compiled candidate query, for stores that support fingerprints.
#[derive(Clone, Default)]
pub struct RelatedValues {
    memoized: Option<Vec<Record>>,
    values_query: Option<ValuesQuery>,
    static_values: Option<Vec<(String, String)>>,
    display_column: Option<String>,
    image_column: Option<String>,
}

impl fmt::Debug for RelatedValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelatedValues")
            .field("memoized", &self.memoized.as_ref().map(Vec::len))
            .field("static_values", &self.static_values)
            .field("display_column", &self.display_column)
            .field("image_column", &self.image_column)
            .finish_non_exhaustive()
    }
}

impl RelatedValues {
    /// Resolver with no narrowing, labelled by the related display column
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrow the candidate query
    pub fn set_values_query(&mut self, callback: ValuesQuery) {
        self.values_query = Some(callback);
        self.invalidate();
    }

    /// Use fixed `key → label` options instead of querying
    pub fn set_values(&mut self, values: Vec<(String, String)>) {
        self.static_values = Some(values);
    }

    /// Label candidates with `column` instead of the entity's display column
    pub fn set_display_column(&mut self, column: impl Into<String>) {
        self.display_column = Some(column.into());
    }

    /// Attach the image in `column` to each option
    pub fn set_image_column(&mut self, column: impl Into<String>) {
        self.image_column = Some(column.into());
    }

    /// Candidates loaded so far
    #[must_use]
    pub fn memoized(&self) -> Option<&[Record]> {
        self.memoized.as_deref()
    }

    /// Drop memoized candidates
    pub fn invalidate(&mut self) {
        self.memoized = None;
    }

    /// Column labelling the candidates of `relation`
    #[must_use]
    pub fn display_column<'a>(&'a self, relation: &'a RelationDescriptor) -> &'a str {
        self.display_column
            .as_deref()
            .unwrap_or(&relation.related.display_column)
    }

    /// Label of one related record: the formatter's output, or the display
    /// column
    #[must_use]
    pub fn label_for(&self, record: &Record, relation: &RelationDescriptor, core: &FieldCore) -> String {
        match core.formatter() {
            Some(format) => value_to_label(&format(record, core)),
            None => record
                .get(self.display_column(relation))
                .map(value_to_label)
                .unwrap_or_default(),
        }
    }

    /// Base candidate query with the narrowing callback applied
    ///
    /// # Errors
    ///
    /// [`AdminError::Configuration`] when the relation requires a parent
    /// resource and the context has none.
    pub fn resolve_values_query(
        &self,
        ctx: &AdminContext,
        relation: &RelationDescriptor,
        core: &FieldCore,
    ) -> AdminResult<Query> {
        if relation.requires_parent && ctx.resource().is_none() {
            warn!(relation = %relation.name, "Relation candidates requested without a parent resource");
            return Err(AdminError::configuration("parent resource is required"));
        }

        let query = ctx.new_query(&relation.related);
        Ok(match &self.values_query {
            Some(narrow) => narrow(query, core),
            None => query,
        })
    }

    /// Execute the candidate query, through the cache when possible
    ///
    /// # Errors
    ///
    /// Store and cache errors propagate unchanged.
    pub async fn resolve_related_query(query: &Query, ctx: &AdminContext) -> AdminResult<Vec<Record>> {
        let fingerprint = match query.fingerprint() {
            Some(fingerprint) if ctx.cache().is_enabled() => fingerprint,
            _ => {
                debug!(entity = %query.entity().name, "Loading relation candidates uncached");
                return query.get().await;
            }
        };

        ctx.cache().remember(&fingerprint, || query.get()).await
    }

    /// Candidate options of the field with `selected` marked
    ///
    /// When no candidate matches, the persisted record(s) in `current` are
    /// offered so the current selection stays visible.
    ///
    /// # Errors
    ///
    /// See [`RelatedValues::resolve_values_query`] and
    /// [`RelatedValues::resolve_related_query`].
    pub async fn get_values(
        &mut self,
        ctx: &AdminContext,
        relation: &RelationDescriptor,
        core: &FieldCore,
        selected: Selected,
        current: &RelationValue,
    ) -> AdminResult<OptionSet> {
        let mut options = OptionSet::new(selected);

        if let Some(values) = &self.static_values {
            for (key, label) in values {
                options.insert(key.clone(), label.clone(), OptionProperties::default());
            }
            return Ok(options);
        }

        let query = self.resolve_values_query(ctx, relation, core)?;
        let records = match &self.memoized {
            Some(records) => records.clone(),
            None => {
                let records = Self::resolve_related_query(&query, ctx).await?;
                self.memoized = Some(records.clone());
                records
            }
        };

        for record in &records {
            self.insert_record(&mut options, record, relation, core);
        }

        if options.is_empty() {
            for record in current.records().into_iter().filter(|r| r.exists()) {
                self.insert_record(&mut options, record, relation, core);
            }
        }

        Ok(options)
    }

    fn insert_record(
        &self,
        options: &mut OptionSet,
        record: &Record,
        relation: &RelationDescriptor,
        core: &FieldCore,
    ) {
        let image = self
            .image_column
            .as_deref()
            .and_then(|column| record.get(column))
            .filter(|value| !value.is_null())
            .map(value_to_label);

        options.insert(
            record.key_string(),
            self.label_for(record, relation, core),
            OptionProperties { image },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheHandle;
    use crate::query::{EntityDescriptor, MemoryStore};
    use crate::resource::ModelResource;
    use serde_json::json;
    use std::time::Duration;

    fn countries() -> RelationDescriptor {
        RelationDescriptor::to_one(
            "country",
            EntityDescriptor::new("countries").display_column("name"),
        )
    }

    fn seeded(store: MemoryStore) -> Arc<MemoryStore> {
        store.extend(
            "countries",
            [
                Record::from_json("id", json!({"id": 1, "name": "Chile", "flag": "/flags/cl.svg"})),
                Record::from_json("id", json!({"id": 2, "name": "Norway", "flag": null})),
            ],
        );
        Arc::new(store)
    }

    fn core() -> FieldCore {
        FieldCore::with_column("Country", "country_id")
    }

    #[tokio::test]
    async fn test_memoizes_per_instance() {
        let store = seeded(MemoryStore::new());
        let ctx = AdminContext::new(store.clone());
        let mut values = RelatedValues::new();

        let first = values
            .get_values(&ctx, &countries(), &core(), Selected::One("2".into()), &RelationValue::None)
            .await
            .unwrap();
        let second = values
            .get_values(&ctx, &countries(), &core(), Selected::None, &RelationValue::None)
            .await
            .unwrap();

        assert_eq!(first.keys(), ["1", "2"]);
        assert_eq!(first.label("2"), Some("Norway"));
        assert!(first.is_selected("2"));
        assert_eq!(second.keys(), first.keys());
        assert_eq!(store.executions(), 1);

        values.invalidate();
        values
            .get_values(&ctx, &countries(), &core(), Selected::None, &RelationValue::None)
            .await
            .unwrap();
        assert_eq!(store.executions(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_shared_across_instances_until_expiry() {
        let store = seeded(MemoryStore::new().with_fingerprints());
        let ctx = AdminContext::new(store.clone()).with_cache(CacheHandle::memory());

        for _ in 0..2 {
            RelatedValues::new()
                .get_values(&ctx, &countries(), &core(), Selected::None, &RelationValue::None)
                .await
                .unwrap();
        }
        assert_eq!(store.executions(), 1);

        tokio::time::advance(Duration::from_secs(5)).await;
        RelatedValues::new()
            .get_values(&ctx, &countries(), &core(), Selected::None, &RelationValue::None)
            .await
            .unwrap();
        assert_eq!(store.executions(), 2);
    }

    #[tokio::test]
    async fn test_no_fingerprint_skips_cache() {
        let store = seeded(MemoryStore::new());
        let ctx = AdminContext::new(store.clone()).with_cache(CacheHandle::memory());

        for _ in 0..2 {
            RelatedValues::new()
                .get_values(&ctx, &countries(), &core(), Selected::None, &RelationValue::None)
                .await
                .unwrap();
        }
        assert_eq!(store.executions(), 2);
    }

    #[tokio::test]
    async fn test_values_query_narrows_candidates() {
        let ctx = AdminContext::new(seeded(MemoryStore::new()));
        let mut values = RelatedValues::new();
        values.set_values_query(Arc::new(|query, _| query.where_eq("name", "Chile")));

        let options = values
            .get_values(&ctx, &countries(), &core(), Selected::None, &RelationValue::None)
            .await
            .unwrap();
        assert_eq!(options.keys(), ["1"]);
    }

    #[tokio::test]
    async fn test_injects_current_record_when_empty() {
        let ctx = AdminContext::new(seeded(MemoryStore::new()));
        let mut values = RelatedValues::new();
        values.set_values_query(Arc::new(|query, _| query.where_eq("name", "Atlantis")));

        let current = RelationValue::One(Box::new(Record::from_json(
            "id",
            json!({"id": 9, "name": "Iceland"}),
        )));
        let options = values
            .get_values(&ctx, &countries(), &core(), Selected::One("9".into()), &current)
            .await
            .unwrap();

        assert_eq!(options.keys(), ["9"]);
        assert_eq!(options.label("9"), Some("Iceland"));

        let unsaved = RelationValue::One(Box::new(Record::unsaved(serde_json::Map::new())));
        values.invalidate();
        let options = values
            .get_values(&ctx, &countries(), &core(), Selected::None, &unsaved)
            .await
            .unwrap();
        assert!(options.is_empty());
    }

    #[tokio::test]
    async fn test_formatter_labels_and_images() {
        let ctx = AdminContext::new(seeded(MemoryStore::new()));
        let mut core = core();
        core.set_formatter(Arc::new(|record, _| {
            let name = record.get("name").map(value_to_label).unwrap_or_default();
            json!(format!("#{} {name}", record.key_string()))
        }));
        let mut values = RelatedValues::new();
        values.set_image_column("flag");

        let options = values
            .get_values(&ctx, &countries(), &core, Selected::None, &RelationValue::None)
            .await
            .unwrap();

        assert_eq!(options.label("1"), Some("#1 Chile"));
        assert_eq!(options.get("1").and_then(|o| o.properties.image.as_deref()), Some("/flags/cl.svg"));
        assert_eq!(options.get("2").map(|o| o.properties.image.clone()), Some(None));
    }

    #[tokio::test]
    async fn test_nested_relation_requires_parent() {
        let store = seeded(MemoryStore::new());
        let relation = countries().nested();
        let ctx = AdminContext::new(store.clone());

        let err = RelatedValues::new()
            .get_values(&ctx, &relation, &core(), Selected::None, &RelationValue::None)
            .await
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(store.executions(), 0);

        let parent = ModelResource::new("Users", EntityDescriptor::new("users"));
        let ctx = ctx.with_resource(Arc::new(parent));
        let options = RelatedValues::new()
            .get_values(&ctx, &relation, &core(), Selected::None, &RelationValue::None)
            .await
            .unwrap();
        assert_eq!(options.len(), 2);
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_sqlite_candidates_keep_query_order() {
        let db = crate::testing::TestDatabase::new().await.unwrap();
        let ctx = AdminContext::new(db.store());
        let mut values = RelatedValues::new();
        values.set_values_query(Arc::new(|query, _| query.order_by_desc("name")));

        let options = values
            .get_values(&ctx, &countries(), &core(), Selected::One("1".into()), &RelationValue::None)
            .await
            .unwrap();

        assert_eq!(options.keys(), ["2", "3", "1"]);
        assert_eq!(options.label("3"), Some("Japan"));
        assert!(options.is_selected("1"));
    }

    #[tokio::test]
    async fn test_static_values_skip_the_store() {
        let store = seeded(MemoryStore::new());
        let ctx = AdminContext::new(store.clone());
        let mut values = RelatedValues::new();
        values.set_values(vec![("5".into(), "Peru".into())]);

        let options = values
            .get_values(&ctx, &countries(), &core(), Selected::None, &RelationValue::None)
            .await
            .unwrap();
        assert_eq!(options.keys(), ["5"]);
        assert_eq!(store.executions(), 0);
    }
}
