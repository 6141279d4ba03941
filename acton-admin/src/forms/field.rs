//! Form controls produced by admin fields
//!
//! Defines the input types and control configurations the form renderer
//! understands. Admin fields (`fields::Text`, `fields::BelongsTo`, ...)
//! convert themselves into [`FormField`] values.

/// Field attribute flags grouped for better ergonomics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldFlags {
    /// Whether field is required
    pub required: bool,
    /// Whether field is disabled
    pub disabled: bool,
    /// Whether field is read-only
    pub readonly: bool,
}

/// HTML input types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    /// Text input (default)
    #[default]
    Text,
    /// Email input with validation
    Email,
    /// Password input (masked)
    Password,
    /// Number input
    Number,
    /// URL input
    Url,
    /// Date input
    Date,
    /// Date and time input
    DateTimeLocal,
    /// Color picker
    Color,
    /// Hidden input
    Hidden,
}

impl InputType {
    /// Get the HTML type attribute value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Url => "url",
            Self::Date => "date",
            Self::DateTimeLocal => "datetime-local",
            Self::Color => "color",
            Self::Hidden => "hidden",
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Option for select dropdowns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value attribute
    pub value: String,
    /// Display text
    pub label: String,
    /// Whether this option is disabled
    pub disabled: bool,
    /// Image shown next to the label
    pub image: Option<String>,
}

impl SelectOption {
    /// Create a new select option
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
            image: None,
        }
    }

    /// Create a disabled option (useful for placeholder)
    #[must_use]
    pub fn disabled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            disabled: true,
            ..Self::new(value, label)
        }
    }
}

/// Kind of form control
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Standard input field
    Input(InputType),
    /// Textarea for multi-line text
    Textarea {
        /// Number of visible text lines
        rows: Option<u32>,
    },
    /// Select dropdown
    Select {
        /// Available options
        options: Vec<SelectOption>,
        /// Allow multiple selections
        multiple: bool,
    },
    /// Several inputs sharing one label (date ranges)
    Group(Vec<FormField>),
    /// Static text, no input
    TextBlock {
        /// Heading, may be empty
        title: String,
        /// Body text
        text: String,
    },
    /// Pre-rendered markup holding its own form, emitted after the
    /// enclosing form closes
    Fragment(String),
}

impl Default for FieldKind {
    fn default() -> Self {
        Self::Input(InputType::default())
    }
}

/// A form control with all its attributes
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// Field name (used for form submission)
    pub name: String,
    /// Control kind
    pub kind: FieldKind,
    /// Label text
    pub label: Option<String>,
    /// Current value
    pub value: Option<String>,
    /// Selected option values (selects)
    pub selected: Vec<String>,
    /// Attribute flags
    pub flags: FieldFlags,
    /// Step value for number and date inputs
    pub step: Option<String>,
    /// CSS class(es)
    pub class: Option<String>,
    /// Element ID (defaults to name if not set)
    pub id: Option<String>,
    /// Custom attributes
    pub custom_attrs: Vec<(String, String)>,
}

impl FormField {
    /// Create a new input field
    #[must_use]
    pub fn input(name: impl Into<String>, input_type: InputType) -> Self {
        Self::new(name, FieldKind::Input(input_type))
    }

    /// Create a hidden input carrying `value`
    #[must_use]
    pub fn hidden(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::input(name, InputType::Hidden).with_value(value)
    }

    /// Create a new textarea field
    #[must_use]
    pub fn textarea(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Textarea { rows: None })
    }

    /// Create a select field with `options`
    #[must_use]
    pub fn select(name: impl Into<String>, options: Vec<SelectOption>, multiple: bool) -> Self {
        Self::new(name, FieldKind::Select { options, multiple })
    }

    /// Create a group of inputs rendered under one label
    #[must_use]
    pub fn group(name: impl Into<String>, fields: Vec<Self>) -> Self {
        Self::new(name, FieldKind::Group(fields))
    }

    /// Create a static text block
    #[must_use]
    pub fn text_block(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            "",
            FieldKind::TextBlock {
                title: title.into(),
                text: text.into(),
            },
        )
    }

    /// Wrap pre-rendered markup (relation sub-forms)
    #[must_use]
    pub fn fragment(name: impl Into<String>, html: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Fragment(html.into()))
    }

    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
            value: None,
            selected: Vec::new(),
            flags: FieldFlags::default(),
            step: None,
            class: None,
            id: None,
            custom_attrs: Vec::new(),
        }
    }

    /// Set the label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the current value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the selected option values
    #[must_use]
    pub fn with_selected(mut self, selected: Vec<String>) -> Self {
        self.selected = selected;
        self
    }

    /// Add a custom attribute
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_attrs.push((name.into(), value.into()));
        self
    }

    /// Get the effective ID (custom ID or field name)
    #[must_use]
    pub fn effective_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    /// Whether this is a hidden input
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        matches!(self.kind, FieldKind::Input(InputType::Hidden))
    }

    /// Whether this is a pre-rendered fragment
    #[must_use]
    pub const fn is_fragment(&self) -> bool {
        matches!(self.kind, FieldKind::Fragment(_))
    }

    /// Input type of plain inputs
    #[must_use]
    pub const fn input_type(&self) -> Option<InputType> {
        match self.kind {
            FieldKind::Input(input_type) => Some(input_type),
            _ => None,
        }
    }

    /// Whether an option value is selected
    #[must_use]
    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.iter().any(|v| v == value) || self.value.as_deref() == Some(value)
    }
}
