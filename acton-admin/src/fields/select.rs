use async_trait::async_trait;
use serde_json::Value;

use super::field::{Field, FieldCore};
use super::options::{OptionProperties, OptionSet, Selected};
use crate::context::AdminContext;
use crate::error::AdminResult;
use crate::forms::{FieldFlags, FormField};
use crate::query::value_to_label;

/// Select over a static list of options
#[derive(Debug, Clone)]
pub struct Select {
    core: FieldCore,
    options: Vec<(String, String)>,
    multiple: bool,
}

impl Select {
    /// Select labelled `label`, bound to the snake-cased label
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            core: FieldCore::new(label),
            options: Vec::new(),
            multiple: false,
        }
    }

    /// Set the `value → label` options, in display order
    #[must_use]
    pub fn options<I, K, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.options = options
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Allow several values
    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self.core.set_nested_name(true);
        self
    }

    /// Current selection
    #[must_use]
    pub fn selected(&self) -> Selected {
        match self.core.to_value() {
            None => Selected::None,
            Some(Value::Array(values)) => {
                Selected::Many(values.iter().map(value_to_label).collect())
            }
            Some(value) if self.multiple => Selected::Many(vec![value_to_label(value)]),
            Some(value) => Selected::One(value_to_label(value)),
        }
    }

    /// Options with the current selection
    #[must_use]
    pub fn values(&self) -> OptionSet {
        let mut set = OptionSet::new(self.selected());
        for (value, label) in &self.options {
            set.insert(value.clone(), label.clone(), OptionProperties::default());
        }
        set
    }
}

#[async_trait]
impl Field for Select {
    fn core(&self) -> &FieldCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut FieldCore {
        &mut self.core
    }

    fn resolve_preview(&self) -> String {
        let values = self.values();
        values
            .selected()
            .keys()
            .iter()
            .map(|key| values.label(key).unwrap_or(key).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    async fn to_form_field(&mut self, _ctx: &AdminContext) -> AdminResult<FormField> {
        let values = self.values();
        let mut field = FormField::select(
            self.core.name_attribute(None),
            values.to_select_options(),
            self.multiple,
        )
        .with_label(self.core.label())
        .with_selected(values.selected().keys());
        field.flags = FieldFlags {
            required: self.core.is_required(),
            ..FieldFlags::default()
        };
        Ok(field)
    }
}
