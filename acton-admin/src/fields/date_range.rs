//! Two-column date range field
//!
//! The value is an object keyed by the two bound columns
//! (`{"start": "...", "end": "..."}`); a default may also be given
//! positionally as `[from, to]`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::fmt::Write;

use super::field::{Field, FieldCore};
use crate::context::AdminContext;
use crate::error::AdminResult;
use crate::forms::{FieldFlags, FormField, InputType};
use crate::query::{value_to_label, Operator, Query, Record};

const DATE_VALUE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_VALUE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATETIME_PREVIEW_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date range over a `from` and a `to` column
#[derive(Debug, Clone)]
pub struct DateRange {
    core: FieldCore,
    from_column: String,
    to_column: String,
    display_format: Option<String>,
    with_time: bool,
    step: Option<String>,
    from_attributes: Vec<(String, String)>,
    to_attributes: Vec<(String, String)>,
}

impl DateRange {
    /// Range labelled `label` over `date_from` / `date_to`
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        let mut core = FieldCore::new(label);
        core.set_nested_name(true);
        Self {
            core,
            from_column: "date_from".to_string(),
            to_column: "date_to".to_string(),
            display_format: None,
            with_time: false,
            step: None,
            from_attributes: Vec::new(),
            to_attributes: Vec::new(),
        }
    }

    /// Bind the two columns
    #[must_use]
    pub fn from_to(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.from_column = from.into();
        self.to_column = to.into();
        self
    }

    /// Preview with a `chrono` format string (`%d.%m`)
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.display_format = Some(format.into());
        self
    }

    /// Use `datetime-local` inputs
    #[must_use]
    pub const fn with_time(mut self) -> Self {
        self.with_time = true;
        self
    }

    /// Input step, applied to both inputs
    #[must_use]
    pub fn step(mut self, step: impl ToString) -> Self {
        self.step = Some(step.to_string());
        self
    }

    /// Extra attributes of the `from` input
    #[must_use]
    pub fn from_attributes<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.from_attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Extra attributes of the `to` input
    #[must_use]
    pub fn to_attributes<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.to_attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// `from` column
    #[must_use]
    pub fn from_column(&self) -> &str {
        &self.from_column
    }

    /// `to` column
    #[must_use]
    pub fn to_column(&self) -> &str {
        &self.to_column
    }

    /// Input type of both inputs
    #[must_use]
    pub const fn input_type(&self) -> InputType {
        if self.with_time {
            InputType::DateTimeLocal
        } else {
            InputType::Date
        }
    }

    /// Step of both inputs
    #[must_use]
    pub fn step_value(&self) -> Option<&str> {
        self.step.as_deref()
    }

    /// Both ends as input values (`YYYY-MM-DD` or `YYYY-MM-DDTHH:MM`)
    ///
    /// Unparseable values pass through unchanged.
    #[must_use]
    pub fn get_value(&self) -> Map<String, Value> {
        let (from, to) = self.to_value().map(|v| self.split(v)).unwrap_or_default();
        let format = if self.with_time {
            DATETIME_VALUE_FORMAT
        } else {
            DATE_VALUE_FORMAT
        };

        let mut value = Map::new();
        value.insert(
            self.from_column.clone(),
            Value::String(format_or_raw(&from, format)),
        );
        value.insert(
            self.to_column.clone(),
            Value::String(format_or_raw(&to, format)),
        );
        value
    }

    /// Value or default
    #[must_use]
    pub fn to_value(&self) -> Option<&Value> {
        self.core.to_value()
    }

    /// Constrain `query` to the submitted range on this field's column
    ///
    /// `submitted` is the request value: an object keyed by the bound
    /// columns. Blank ends are skipped.
    #[must_use]
    pub fn apply(&self, query: Query, submitted: &Value) -> Query {
        let (from, to) = self.split(submitted);
        let column = self.core.column().to_string();

        let query = if from.is_empty() {
            query
        } else {
            query.where_op(column.clone(), Operator::Gte, from)
        };
        if to.is_empty() {
            query
        } else {
            query.where_op(column, Operator::Lte, to)
        }
    }

    fn split(&self, value: &Value) -> (String, String) {
        match value {
            Value::Object(map) => (
                map.get(&self.from_column).map(value_to_label).unwrap_or_default(),
                map.get(&self.to_column).map(value_to_label).unwrap_or_default(),
            ),
            Value::Array(items) => (
                items.first().map(value_to_label).unwrap_or_default(),
                items.get(1).map(value_to_label).unwrap_or_default(),
            ),
            other => (value_to_label(other), String::new()),
        }
    }

    fn preview_end(&self, raw: &str) -> String {
        let format = match (&self.display_format, self.with_time) {
            (Some(format), _) => format.as_str(),
            (None, true) => DATETIME_PREVIEW_FORMAT,
            (None, false) => return raw.to_string(),
        };
        format_or_raw(raw, format)
    }

    fn render_input(&self, index: &str, value: &Value, extra: &[(String, String)]) -> FormField {
        let mut input = FormField::input(self.core.name_attribute(Some(index)), self.input_type())
            .with_value(value_to_label(value));
        input.step.clone_from(&self.step);
        input.flags = FieldFlags {
            required: self.core.is_required(),
            ..FieldFlags::default()
        };
        for (name, value) in extra {
            input = input.with_attr(name.clone(), value.clone());
        }
        input
    }
}

#[async_trait]
impl Field for DateRange {
    fn core(&self) -> &FieldCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut FieldCore {
        &mut self.core
    }

    fn fill(&mut self, record: &Record) {
        let from = record.get(&self.from_column).filter(|v| !v.is_null());
        let to = record.get(&self.to_column).filter(|v| !v.is_null());

        let value = if from.is_none() && to.is_none() {
            Value::Null
        } else {
            let mut value = Map::new();
            let blank = || Value::String(String::new());
            value.insert(self.from_column.clone(), from.cloned().unwrap_or_else(blank));
            value.insert(self.to_column.clone(), to.cloned().unwrap_or_else(blank));
            Value::Object(value)
        };

        self.core.set_value(value);
        if let Some(formatter) = self.core.formatter().cloned() {
            let formatted = formatter(record, &self.core);
            self.core.set_formatted_value(formatted);
        }
    }

    fn resolve_preview(&self) -> String {
        let Some(value) = self.core.value() else {
            return String::new();
        };
        let (from, to) = self.split(value);
        let (from, to) = (self.preview_end(&from), self.preview_end(&to));

        match (from.is_empty(), to.is_empty()) {
            (false, false) => format!("{from} - {to}"),
            (false, true) => from,
            (true, false) => to,
            (true, true) => String::new(),
        }
    }

    async fn to_form_field(&mut self, _ctx: &AdminContext) -> AdminResult<FormField> {
        let value = self.get_value();
        let blank = Value::String(String::new());
        let from = value.get(&self.from_column).unwrap_or(&blank);
        let to = value.get(&self.to_column).unwrap_or(&blank);

        let inputs = vec![
            self.render_input(&self.from_column, from, &self.from_attributes),
            self.render_input(&self.to_column, to, &self.to_attributes),
        ];

        Ok(FormField::group(self.core.name_attribute(None), inputs).with_label(self.core.label()))
    }
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_VALUE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

/// Format `raw` with `format`, or return it unchanged when it does not
/// parse or the format string is invalid
fn format_or_raw(raw: &str, format: &str) -> String {
    let Some(datetime) = parse_datetime(raw) else {
        return raw.to_string();
    };

    let mut formatted = String::new();
    match write!(formatted, "{}", datetime.format(format)) {
        Ok(()) => formatted,
        Err(_) => raw.to_string(),
    }
}
