use async_trait::async_trait;

use super::field::{Field, FieldCore};
use crate::context::AdminContext;
use crate::error::AdminResult;
use crate::forms::{FieldFlags, FieldKind, FormField, InputType};
use crate::query::value_to_label;

/// Single-line input bound to one column
#[derive(Debug, Clone)]
pub struct Text {
    core: FieldCore,
    input_type: InputType,
    rows: Option<u32>,
}

impl Text {
    /// Text input labelled `label`, bound to the snake-cased label
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            core: FieldCore::new(label),
            input_type: InputType::Text,
            rows: None,
        }
    }

    /// Text input bound to an explicit column
    #[must_use]
    pub fn with_column(label: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            core: FieldCore::with_column(label, column),
            ..Self::new("")
        }
    }

    /// Render as another input type (`email`, `number`, ...)
    #[must_use]
    pub const fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    /// Render as a textarea with `rows` lines
    #[must_use]
    pub const fn multiline(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }
}

#[async_trait]
impl Field for Text {
    fn core(&self) -> &FieldCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut FieldCore {
        &mut self.core
    }

    async fn to_form_field(&mut self, _ctx: &AdminContext) -> AdminResult<FormField> {
        let name = self.core.name_attribute(None);
        let mut field = match self.rows {
            Some(rows) => FormField {
                kind: FieldKind::Textarea { rows: Some(rows) },
                ..FormField::textarea(name)
            },
            None => FormField::input(name, self.input_type),
        }
        .with_label(self.core.label());

        if let Some(value) = self.core.to_value() {
            field = field.with_value(value_to_label(value));
        }
        field.flags = FieldFlags {
            required: self.core.is_required(),
            ..FieldFlags::default()
        };

        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldExt;
    use crate::query::{MemoryStore, Record};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_text_form_field() {
        let ctx = AdminContext::new(Arc::new(MemoryStore::new()));
        let mut field = Text::new("Email").input_type(InputType::Email).required();
        field.fill(&Record::from_json("id", json!({"id": 1, "email": "ada@example.com"})));

        let form_field = field.to_form_field(&ctx).await.unwrap();
        assert_eq!(form_field.name, "email");
        assert_eq!(form_field.input_type(), Some(InputType::Email));
        assert_eq!(form_field.value.as_deref(), Some("ada@example.com"));
        assert!(form_field.flags.required);
    }

    #[test]
    fn test_preview_prefers_formatted_value() {
        let mut field = Text::with_column("Name", "first_name").formatted(|record, _| {
            let name = record.get("first_name").map(value_to_label).unwrap_or_default();
            json!(format!("Dr. {name}"))
        });
        field.fill(&Record::from_json("id", json!({"id": 1, "first_name": "Ada"})));

        assert_eq!(field.preview(), "Dr. Ada");
    }

    #[test]
    fn test_preview_ignores_default() {
        let field = Text::new("Title").default("Untitled");
        assert_eq!(field.preview(), "");
    }

    #[test]
    fn test_change_preview() {
        let mut field = Text::new("Title").change_preview(|core| {
            format!("<b>{}</b>", core.to_value().map(value_to_label).unwrap_or_default())
        });
        field.fill(&Record::from_json("id", json!({"id": 1, "title": "Dune"})));
        assert_eq!(field.preview(), "<b>Dune</b>");
    }

    #[test]
    fn test_preview_escapes_markup() {
        let mut field = Text::new("Bio");
        field.fill(&Record::from_json("id", json!({"id": 1, "bio": "<script>alert(1)</script> & co"})));
        assert_eq!(field.preview(), "&lt;script&gt;alert(1)&lt;/script&gt; &amp; co");
    }

    #[test]
    fn test_raw_mode_preview_is_plain_text() {
        let mut field = Text::new("Bio").raw_mode();
        field.fill(&Record::from_json("id", json!({"id": 1, "bio": "<i>Analyst</i>"})));
        assert_eq!(field.preview(), "<i>Analyst</i>");
    }
}
