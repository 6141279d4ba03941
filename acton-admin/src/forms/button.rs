//! Action buttons with optional confirmation modals

use super::builder::FormBuilder;

/// Dialog opened by an [`ActionButton`] instead of following its URL
#[derive(Debug, Clone)]
pub struct Modal {
    /// Dialog title
    pub title: String,
    /// Form shown in the dialog
    pub content: Box<FormBuilder>,
}

/// A link-style button pointing at a route
#[derive(Debug, Clone)]
pub struct ActionButton {
    /// Button text
    pub label: String,
    /// Target URL
    pub url: String,
    /// CSS class(es)
    pub class: Option<String>,
    /// Confirmation dialog
    pub modal: Option<Modal>,
    /// Render inline with the form's own buttons
    pub inline: bool,
}

impl ActionButton {
    /// Button labelled `label` pointing at `url`
    #[must_use]
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            class: None,
            modal: None,
            inline: false,
        }
    }

    /// Set the CSS class
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Open a dialog with the form built by `content` instead of navigating
    ///
    /// The builder receives the button so the dialog form can post to its URL.
    #[must_use]
    pub fn in_modal<F>(mut self, title: impl Into<String>, content: F) -> Self
    where
        F: FnOnce(&Self) -> FormBuilder,
    {
        let form = content(&self);
        self.modal = Some(Modal {
            title: title.into(),
            content: Box::new(form),
        });
        self
    }

    /// Render next to the submit button
    #[must_use]
    pub const fn show_in_line(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Whether a confirmation dialog is attached
    #[must_use]
    pub const fn has_modal(&self) -> bool {
        self.modal.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_form_receives_button_url() {
        let button = ActionButton::new("Delete", "/admin/resource/posts/crud/5")
            .class("btn-secondary")
            .in_modal("Delete", |button| {
                FormBuilder::new(button.url.clone(), "POST").hidden("_method", "DELETE")
            })
            .show_in_line();

        assert!(button.has_modal());
        assert!(button.inline);
        let modal = button.modal.as_ref().unwrap();
        assert_eq!(modal.title, "Delete");
        assert_eq!(modal.content.action(), "/admin/resource/posts/crud/5");
        assert_eq!(modal.content.hidden_value("_method"), Some("DELETE"));
    }
}
