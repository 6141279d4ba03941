//! Shared field state and the [`Field`] trait

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::context::AdminContext;
use crate::error::AdminResult;
use crate::forms::{FormField, FormRenderer};
use crate::query::{value_to_label, Record};
use crate::support::snake_case;

/// Maps a record to the value shown for it
///
/// Plain fields receive the record being filled; relation fields receive
/// each related record and use the result as its option label.
pub type Formatter = Arc<dyn Fn(&Record, &FieldCore) -> Value + Send + Sync>;

/// Replaces a field's preview output
pub type PreviewCallback = Arc<dyn Fn(&FieldCore) -> String + Send + Sync>;

/// State common to every field: label, column, value lifecycle, callbacks
#[derive(Clone)]
pub struct FieldCore {
    label: String,
    column: String,
    value: Option<Value>,
    default: Option<Value>,
    formatted_value: Option<Value>,
    formatter: Option<Formatter>,
    change_preview: Option<PreviewCallback>,
    rules: Vec<String>,
    nullable: bool,
    raw_mode: bool,
    nested_name: bool,
}

impl fmt::Debug for FieldCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCore")
            .field("label", &self.label)
            .field("column", &self.column)
            .field("value", &self.value)
            .field("default", &self.default)
            .field("rules", &self.rules)
            .field("raw_mode", &self.raw_mode)
            .finish_non_exhaustive()
    }
}

impl FieldCore {
    /// Field labelled `label`, bound to the snake-cased label as column
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let column = snake_case(&label);
        Self::with_column(label, column)
    }

    /// Field labelled `label`, bound to `column`
    #[must_use]
    pub fn with_column(label: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            column: column.into(),
            value: None,
            default: None,
            formatted_value: None,
            formatter: None,
            change_preview: None,
            rules: Vec::new(),
            nullable: false,
            raw_mode: false,
            nested_name: false,
        }
    }

    /// Label
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Bound column (dot paths allowed)
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Rebind to another column
    pub fn set_column(&mut self, column: impl Into<String>) {
        self.column = column.into();
    }

    /// Filled or explicitly set value
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Set the value directly; `Null` clears it
    pub fn set_value(&mut self, value: Value) {
        self.value = (!value.is_null()).then_some(value);
    }

    /// Default used by [`FieldCore::to_value`] while no value is set
    pub fn set_default(&mut self, value: Value) {
        self.default = Some(value);
    }

    /// Default value
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Value, or the default when none is set
    #[must_use]
    pub fn to_value(&self) -> Option<&Value> {
        self.value.as_ref().or(self.default.as_ref())
    }

    /// Fill from a record: value from the bound column, formatted value from
    /// the formatter
    pub fn fill(&mut self, record: &Record) {
        let value = record.get(&self.column).cloned().unwrap_or(Value::Null);
        self.set_value(value);
        self.formatted_value = self.formatter.as_ref().map(|format| format(record, self));
    }

    /// Formatted value if a formatter ran, otherwise [`FieldCore::to_value`]
    #[must_use]
    pub fn to_formatted_value(&self) -> Option<Value> {
        self.formatted_value
            .clone()
            .or_else(|| self.to_value().cloned())
    }

    /// Override the formatted value
    pub fn set_formatted_value(&mut self, value: Value) {
        self.formatted_value = Some(value);
    }

    pub(crate) fn preview_value(&self) -> Option<Value> {
        self.formatted_value.clone().or_else(|| self.value.clone())
    }

    /// Install a formatter
    pub fn set_formatter(&mut self, formatter: Formatter) {
        self.formatter = Some(formatter);
    }

    /// Installed formatter
    #[must_use]
    pub fn formatter(&self) -> Option<&Formatter> {
        self.formatter.as_ref()
    }

    /// Replace the preview output
    pub fn set_change_preview(&mut self, callback: PreviewCallback) {
        self.change_preview = Some(callback);
    }

    /// Preview override
    #[must_use]
    pub fn change_preview(&self) -> Option<&PreviewCallback> {
        self.change_preview.as_ref()
    }

    /// Add validation rules (`required`, `max:255`, ...)
    pub fn add_rules<I, S>(&mut self, rules: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.extend(rules.into_iter().map(Into::into));
    }

    /// Validation rules
    #[must_use]
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Whether the `required` rule is present
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|rule| rule == "required")
    }

    /// Accept empty input as null
    pub fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }

    /// Whether empty input is stored as null
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Plain-text previews (exports, listings without markup)
    pub fn set_raw_mode(&mut self, raw: bool) {
        self.raw_mode = raw;
    }

    /// Whether previews are plain text
    #[must_use]
    pub const fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    /// Submit under `column[...]` names
    pub fn set_nested_name(&mut self, nested: bool) {
        self.nested_name = nested;
    }

    /// Input name: `column`, or `column[index]` for nested fields
    #[must_use]
    pub fn name_attribute(&self, index: Option<&str>) -> String {
        if self.nested_name {
            format!("{}[{}]", self.column, index.unwrap_or_default())
        } else {
            match index {
                Some(index) => format!("{}[{index}]", self.column),
                None => self.column.clone(),
            }
        }
    }
}

/// An admin field: fills from records, previews, and renders a form control
#[async_trait]
pub trait Field: Send + Sync + fmt::Debug {
    /// Shared state
    fn core(&self) -> &FieldCore;

    /// Shared state, mutable
    fn core_mut(&mut self) -> &mut FieldCore;

    /// Fill from a record
    fn fill(&mut self, record: &Record) {
        self.core_mut().fill(record);
    }

    /// Display value; honours a preview override
    ///
    /// The override's output is used verbatim. Otherwise the value is
    /// HTML-escaped unless the field is in raw mode or its preview is
    /// already markup.
    fn preview(&self) -> String {
        let core = self.core();
        if let Some(callback) = core.change_preview() {
            return callback(core);
        }

        let preview = self.resolve_preview();
        if core.is_raw_mode() || self.preview_is_markup() {
            preview
        } else {
            FormRenderer::escape_html(&preview)
        }
    }

    /// Whether `resolve_preview` returns escaped markup rather than text
    fn preview_is_markup(&self) -> bool {
        false
    }

    /// Display value of this field type
    fn resolve_preview(&self) -> String {
        self.core()
            .preview_value()
            .map(|value| value_to_label(&value))
            .unwrap_or_default()
    }

    /// Form control for the current value
    async fn to_form_field(&mut self, ctx: &AdminContext) -> AdminResult<FormField>;
}

/// Builder methods available on every concrete field
pub trait FieldExt: Field + Sized {
    /// Set the value
    #[must_use]
    fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.core_mut().set_value(value.into());
        self
    }

    /// Set the default value
    #[must_use]
    fn default(mut self, value: impl Into<Value>) -> Self {
        self.core_mut().set_default(value.into());
        self
    }

    /// Format values (or option labels) with `formatter`
    #[must_use]
    fn formatted<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Record, &FieldCore) -> Value + Send + Sync + 'static,
    {
        self.core_mut().set_formatter(Arc::new(formatter));
        self
    }

    /// Replace the preview output
    #[must_use]
    fn change_preview<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FieldCore) -> String + Send + Sync + 'static,
    {
        self.core_mut().set_change_preview(Arc::new(callback));
        self
    }

    /// Add validation rules
    #[must_use]
    fn rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.core_mut().add_rules(rules);
        self
    }

    /// Mark as `required`
    #[must_use]
    fn required(self) -> Self {
        self.rules(["required"])
    }

    /// Store empty input as null
    #[must_use]
    fn nullable(mut self) -> Self {
        self.core_mut().set_nullable(true);
        self
    }

    /// Plain-text previews
    #[must_use]
    fn raw_mode(mut self) -> Self {
        self.core_mut().set_raw_mode(true);
        self
    }

    /// Box as a trait object
    #[must_use]
    fn boxed(self) -> Box<dyn Field>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: Field + Sized> FieldExt for T {}
