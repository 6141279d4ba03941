//! Integration tests for relation candidates loaded from SQLite

#![cfg(feature = "sqlite")]

use acton_admin::forms::FieldKind;
use acton_admin::prelude::*;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;

async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::raw_sql(
        "CREATE TABLE countries (id INTEGER PRIMARY KEY, name TEXT NOT NULL, flag TEXT);
         INSERT INTO countries (id, name, flag) VALUES
             (1, 'Chile', '/flags/cl.svg'),
             (2, 'Norway', NULL),
             (3, 'Japan', '/flags/jp.svg');",
    )
    .execute(&pool)
    .await
    .unwrap();

    pool
}

fn countries() -> EntityDescriptor {
    EntityDescriptor::new("countries").display_column("name")
}

fn country_field() -> BelongsTo {
    BelongsTo::new("Country", RelationDescriptor::to_one("country", countries()))
        .values_query(|q, _| q.order_by("name"))
}

#[tokio::test]
async fn test_candidates_follow_values_query_order() {
    let ctx = AdminContext::new(Arc::new(SqliteStore::new(pool().await)));
    let mut field = country_field();

    let values = field.get_values(&ctx).await.unwrap();

    assert_eq!(values.keys(), ["1", "3", "2"]);
    assert_eq!(values.label("3"), Some("Japan"));
}

#[tokio::test]
async fn test_identical_queries_share_cached_rows() {
    let pool = pool().await;
    let ctx = AdminContext::new(Arc::new(SqliteStore::new(pool.clone())));

    let mut first = country_field();
    assert_eq!(first.get_values(&ctx).await.unwrap().len(), 3);

    sqlx::query("INSERT INTO countries (id, name) VALUES (4, 'Kenya')")
        .execute(&pool)
        .await
        .unwrap();

    let mut second = country_field();
    assert_eq!(second.get_values(&ctx).await.unwrap().len(), 3);

    let fresh = AdminContext::new(Arc::new(SqliteStore::new(pool)));
    let mut third = country_field();
    assert_eq!(third.get_values(&fresh).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_selected_record_survives_empty_candidates() {
    let ctx = AdminContext::new(Arc::new(SqliteStore::new(pool().await)));
    let mut field = country_field().values_query(|q, _| q.where_eq("name", "Atlantis"));

    let user = Record::from_json("id", json!({"id": 7, "country_id": 2})).with_relation(
        "country",
        RelationValue::One(Box::new(Record::from_json(
            "id",
            json!({"id": 2, "name": "Norway"}),
        ))),
    );
    field.fill(&user);

    let values = field.get_values(&ctx).await.unwrap();
    assert_eq!(values.keys(), ["2"]);
    assert!(values.is_selected("2"));
}

#[tokio::test]
async fn test_form_field_lists_candidates_with_images() {
    let ctx = AdminContext::new(Arc::new(SqliteStore::new(pool().await)));
    let mut field = country_field().with_image("flag").placeholder("Choose a country");
    field.fill(&Record::from_json("id", json!({"id": 7, "country_id": 3})));

    let control = field.to_form_field(&ctx).await.unwrap();

    assert_eq!(control.name, "country_id");
    assert_eq!(control.selected, ["3"]);
    let FieldKind::Select { options, multiple } = control.kind else {
        panic!("expected a select");
    };
    assert!(!multiple);
    assert_eq!(options[0].value, "");
    assert_eq!(options[0].label, "Choose a country");
    assert_eq!(options[1].image.as_deref(), Some("/flags/cl.svg"));
    assert_eq!(options[3].image, None);
}
