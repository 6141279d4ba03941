//! Test fixtures shared by unit tests
//!
//! - [`TestDatabase`] - in-memory SQLite pool with a small seeded schema
//! - record and resource builders for relation fixtures

#[cfg(feature = "sqlite")]
pub mod database;

#[cfg(feature = "sqlite")]
pub use database::TestDatabase;

use serde_json::json;
use std::sync::Arc;

use crate::fields::{FieldExt, Text};
use crate::query::{EntityDescriptor, Record, RelationValue};
use crate::resource::{ModelResource, Resource};

/// `profiles` resource editing `bio` and `website`
pub fn profiles_resource() -> Arc<dyn Resource> {
    Arc::new(
        ModelResource::new("Profiles", EntityDescriptor::new("profiles").display_column("bio"))
            .fields(|| vec![Text::new("Bio").boxed(), Text::new("Website").boxed()]),
    )
}

/// `users` resource editing `user`
pub fn users_resource(user: Record) -> Arc<dyn Resource> {
    Arc::new(ModelResource::new("Users", EntityDescriptor::new("users")).with_item(user))
}

/// User 3, with profile 5 loaded when `with_profile`
pub fn user(with_profile: bool) -> Record {
    let user = Record::from_json("id", json!({"id": 3, "name": "Ada", "country_id": 2}));
    if with_profile {
        user.with_relation(
            "profile",
            RelationValue::One(Box::new(Record::from_json(
                "id",
                json!({"id": 5, "user_id": 3, "bio": "Analyst", "website": "ada.dev"}),
            ))),
        )
    } else {
        user
    }
}
