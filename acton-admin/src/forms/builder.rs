//! Form builder API with fluent interface
//!
//! Provides a builder pattern for constructing admin forms with
//! async submission and live validation support.

use super::button::ActionButton;
use super::field::FormField;
use super::render::FormRenderer;

/// Builder for constructing HTML forms
///
/// # Examples
///
/// ```rust
/// use acton_admin::forms::{FormBuilder, FormField, InputType};
///
/// let html = FormBuilder::new("/admin/resource/posts/crud", "POST")
///     .name("post")
///     .add_field(FormField::input("title", InputType::Text).with_label("Title"))
///     .hidden("_method", "PUT")
///     .asynchronous()
///     .submit("Save")
///     .build();
///
/// assert!(html.contains(r#"name="_method""#));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    /// Form action URL
    pub(crate) action: String,
    /// HTTP method
    pub(crate) method: String,
    /// Form name
    pub(crate) name: Option<String>,
    /// Form ID
    pub(crate) id: Option<String>,
    /// CSS classes
    pub(crate) class: Option<String>,
    /// Form fields
    pub(crate) fields: Vec<FormField>,
    /// Extra buttons rendered next to submit
    pub(crate) buttons: Vec<ActionButton>,
    /// Submit button text
    pub(crate) submit_text: Option<String>,
    /// Submit button class
    pub(crate) submit_class: Option<String>,
    /// Submit through htmx instead of a full page load
    pub(crate) asynchronous: bool,
    /// Validate fields on the server as they change
    pub(crate) precognitive: bool,
    /// Where to go after a successful submission
    pub(crate) redirect: Option<String>,
    /// Custom attributes
    pub(crate) custom_attrs: Vec<(String, String)>,
}

impl FormBuilder {
    /// Create a new form builder with action and method
    #[must_use]
    pub fn new(action: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: method.into(),
            ..Self::default()
        }
    }

    /// Set the form name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the form ID
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the form CSS class
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Add a field
    #[must_use]
    pub fn add_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    /// Add several fields
    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = FormField>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Add a hidden field
    #[must_use]
    pub fn hidden(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_field(FormField::hidden(name, value))
    }

    /// Add buttons rendered after the submit button
    #[must_use]
    pub fn buttons(mut self, buttons: impl IntoIterator<Item = ActionButton>) -> Self {
        self.buttons.extend(buttons);
        self
    }

    /// Set the submit button text
    #[must_use]
    pub fn submit(mut self, text: impl Into<String>) -> Self {
        self.submit_text = Some(text.into());
        self
    }

    /// Set the submit button CSS class
    #[must_use]
    pub fn submit_class(mut self, class: impl Into<String>) -> Self {
        self.submit_class = Some(class.into());
        self
    }

    /// Submit asynchronously
    #[must_use]
    pub const fn asynchronous(mut self) -> Self {
        self.asynchronous = true;
        self
    }

    /// Enable live server-side validation
    #[must_use]
    pub const fn precognitive(mut self) -> Self {
        self.precognitive = true;
        self
    }

    /// Redirect here after a successful submission
    #[must_use]
    pub fn redirect(mut self, url: impl Into<String>) -> Self {
        self.redirect = Some(url.into());
        self
    }

    /// Add a custom attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_attrs.push((name.into(), value.into()));
        self
    }

    /// Action URL
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Form method
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Form name
    #[must_use]
    pub fn form_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fields, in render order
    #[must_use]
    pub fn form_fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Extra buttons
    #[must_use]
    pub fn form_buttons(&self) -> &[ActionButton] {
        &self.buttons
    }

    /// Value of the hidden field `name`
    #[must_use]
    pub fn hidden_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.is_hidden() && field.name == name)
            .and_then(|field| field.value.as_deref())
    }

    /// Submit button text
    #[must_use]
    pub fn submit_label(&self) -> Option<&str> {
        self.submit_text.as_deref()
    }

    /// Whether the form submits asynchronously
    #[must_use]
    pub const fn is_async(&self) -> bool {
        self.asynchronous
    }

    /// Whether live validation is enabled
    #[must_use]
    pub const fn is_precognitive(&self) -> bool {
        self.precognitive
    }

    /// Redirect target after success
    #[must_use]
    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    /// Render the form to HTML
    #[must_use]
    pub fn build(&self) -> String {
        FormRenderer::render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::InputType;

    #[test]
    fn test_form_builder_basic() {
        let form = FormBuilder::new("/test", "POST");
        assert_eq!(form.action(), "/test");
        assert_eq!(form.method(), "POST");
        assert!(form.form_fields().is_empty());
        assert!(!form.is_async());
    }

    #[test]
    fn test_form_builder_fields_keep_order() {
        let form = FormBuilder::new("/test", "POST")
            .add_field(FormField::input("title", InputType::Text))
            .hidden("_method", "PUT")
            .hidden("_relation", "profile");

        let names = form
            .form_fields()
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["title", "_method", "_relation"]);
        assert_eq!(form.hidden_value("_method"), Some("PUT"));
        assert_eq!(form.hidden_value("title"), None);
    }

    #[test]
    fn test_form_builder_flags() {
        let form = FormBuilder::new("/test", "POST")
            .name("profile")
            .asynchronous()
            .precognitive()
            .redirect("/back")
            .submit("Save")
            .submit_class("btn-primary");

        assert_eq!(form.form_name(), Some("profile"));
        assert!(form.is_async());
        assert!(form.is_precognitive());
        assert_eq!(form.redirect_url(), Some("/back"));
        assert_eq!(form.submit_label(), Some("Save"));
    }
}
