//! Option lists of select-style fields

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::forms::SelectOption;

/// Current selection of a select-style field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selected {
    /// Nothing selected
    #[default]
    None,
    /// One key (to-one relations, single selects)
    One(String),
    /// Several keys (to-many relations, multiple selects)
    Many(Vec<String>),
}

impl Selected {
    /// Whether `key` is part of the selection
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        match self {
            Self::None => false,
            Self::One(selected) => selected == key,
            Self::Many(selected) => selected.iter().any(|s| s == key),
        }
    }

    /// Selected keys, in selection order
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::One(key) => vec![key.clone()],
            Self::Many(keys) => keys.clone(),
        }
    }
}

/// Extra data attached to one option
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionProperties {
    /// Image URL shown next to the label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OptionProperties {
    /// Whether no property is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.image.is_none()
    }
}

/// One selectable option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    /// Submitted value (record key)
    pub value: String,
    /// Display label
    pub label: String,
    /// Extra data
    #[serde(default, skip_serializing_if = "OptionProperties::is_empty")]
    pub properties: OptionProperties,
}

/// Ordered key → label mapping plus the current selection
///
/// Keys are unique: inserting an existing key replaces its label and
/// properties but keeps its position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionSet {
    items: IndexMap<String, OptionItem>,
    selected: Selected,
}

impl OptionSet {
    /// Empty set with the given selection
    #[must_use]
    pub fn new(selected: Selected) -> Self {
        Self {
            items: IndexMap::new(),
            selected,
        }
    }

    /// Insert or replace an option
    pub fn insert(
        &mut self,
        value: impl Into<String>,
        label: impl Into<String>,
        properties: OptionProperties,
    ) {
        let value = value.into();
        let item = OptionItem {
            value: value.clone(),
            label: label.into(),
            properties,
        };
        self.items.insert(value, item);
    }

    /// Options in order
    pub fn items(&self) -> impl ExactSizeIterator<Item = &OptionItem> {
        self.items.values()
    }

    /// Option for `value`
    #[must_use]
    pub fn get(&self, value: &str) -> Option<&OptionItem> {
        self.items.get(value)
    }

    /// Option values in order
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.items.keys().map(String::as_str).collect()
    }

    /// Label of `value`
    #[must_use]
    pub fn label(&self, value: &str) -> Option<&str> {
        self.items.get(value).map(|item| item.label.as_str())
    }

    /// Current selection
    #[must_use]
    pub const fn selected(&self) -> &Selected {
        &self.selected
    }

    /// Whether `value` is selected
    #[must_use]
    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.contains(value)
    }

    /// Number of options
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no options
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Options as form select options
    #[must_use]
    pub fn to_select_options(&self) -> Vec<SelectOption> {
        self.items
            .values()
            .map(|item| SelectOption {
                image: item.properties.image.clone(),
                ..SelectOption::new(item.value.clone(), item.label.clone())
            })
            .collect()
    }
}
