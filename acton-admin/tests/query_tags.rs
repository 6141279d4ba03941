//! Integration tests for query tags
//!
//! Drives a listing handler through an axum router so the selected tag comes
//! from a real query string.

use acton_admin::prelude::*;
use axum::{body::Body, extract::State, routing::get, Json, Router};
use http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

#[derive(Clone)]
struct Listing {
    store: Arc<MemoryStore>,
    tags: Arc<QueryTagSet>,
}

fn posts() -> EntityDescriptor {
    EntityDescriptor::new("posts").display_column("title")
}

fn test_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    store.extend(
        "posts",
        [
            Record::from_json("id", json!({"id": 1, "title": "Hello", "status": "published"})),
            Record::from_json("id", json!({"id": 2, "title": "Draft one", "status": "draft"})),
            Record::from_json("id", json!({"id": 3, "title": "Old news", "status": "archived"})),
        ],
    );

    let tags = QueryTagSet::new("query-tag")
        .tag(QueryTag::new("Published", |q: Query| q.where_eq("status", "published")).default())
        .tag(QueryTag::new("Drafts", |q: Query| q.where_eq("status", "draft")))
        .tag(
            QueryTag::new("Archived posts", |q: Query| q.where_eq("status", "archived"))
                .alias("archive"),
        );

    Router::new()
        .route("/posts", get(list_posts))
        .with_state(Listing {
            store,
            tags: Arc::new(tags),
        })
}

async fn list_posts(State(listing): State<Listing>, params: RequestParams) -> Json<Value> {
    let query = Query::new(listing.store.clone(), &posts()).order_by("id");
    let records = listing
        .tags
        .apply(query, &params)
        .get()
        .await
        .unwrap_or_default();

    Json(json!({
        "titles": records
            .iter()
            .map(|r| r.get("title").cloned().unwrap_or_default())
            .collect::<Vec<_>>(),
        "links": listing.tags.links(&params),
    }))
}

async fn fetch(app: Router, uri: &str) -> Value {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn active_uris(body: &Value) -> Vec<String> {
    body["links"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|link| link["active"] == json!(true))
        .map(|link| link["uri"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_default_tag_applies_without_selection() {
    let body = fetch(test_app(), "/posts").await;

    assert_eq!(body["titles"], json!(["Hello"]));
    assert_eq!(active_uris(&body), ["published"]);
}

#[tokio::test]
async fn test_selected_tag_replaces_default() {
    let body = fetch(test_app(), "/posts?query-tag=drafts").await;

    assert_eq!(body["titles"], json!(["Draft one"]));
    assert_eq!(active_uris(&body), ["drafts"]);
}

#[tokio::test]
async fn test_alias_is_the_tag_uri() {
    let body = fetch(test_app(), "/posts?query-tag=archive").await;

    assert_eq!(body["titles"], json!(["Old news"]));
    assert_eq!(body["links"][2]["href"], json!("?query-tag=archive"));
}

#[tokio::test]
async fn test_unknown_tag_leaves_listing_unfiltered() {
    let body = fetch(test_app(), "/posts?query-tag=missing").await;

    assert_eq!(body["titles"], json!(["Hello", "Draft one", "Old news"]));
    assert!(active_uris(&body).is_empty());
}
