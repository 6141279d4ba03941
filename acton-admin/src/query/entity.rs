//! Entity descriptors

use serde::{Deserialize, Serialize};

/// Identifies a stored entity: its table/collection name, primary key, and
/// the column shown when one of its records is listed as an option
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Table or collection name
    pub name: String,
    /// Primary key column
    pub primary_key: String,
    /// Column used as the human-readable label
    pub display_column: String,
}

impl EntityDescriptor {
    /// Entity with an `id` primary key, labelled by its key
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: "id".to_string(),
            display_column: "id".to_string(),
        }
    }

    /// Override the primary key column
    #[must_use]
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Set the label column
    #[must_use]
    pub fn display_column(mut self, column: impl Into<String>) -> Self {
        self.display_column = column.into();
        self
    }
}
