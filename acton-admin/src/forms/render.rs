//! Form rendering to HTML
//!
//! Renders form builders to HTML strings with proper escaping.
//! Asynchronous forms submit through htmx (`hx-post`); the redirect target
//! and live-validation flag are exposed as data attributes for the
//! admin front-end script.

use std::fmt::Write;

use super::builder::FormBuilder;
use super::button::ActionButton;
use super::field::{FieldKind, FormField, InputType, SelectOption};

/// Options for customizing form rendering
#[derive(Debug, Clone)]
pub struct FormRenderOptions {
    /// CSS class for form groups (wrapper around label + input)
    pub group_class: String,
    /// CSS class for labels
    pub label_class: String,
    /// CSS class for input elements
    pub input_class: String,
    /// CSS class for submit button
    pub submit_class: String,
    /// CSS class for action buttons without their own class
    pub button_class: String,
}

impl Default for FormRenderOptions {
    fn default() -> Self {
        Self {
            group_class: "form-group".into(),
            label_class: "form-label".into(),
            input_class: "form-input".into(),
            submit_class: "btn btn-primary".into(),
            button_class: "btn".into(),
        }
    }
}

/// Renders forms to HTML
pub struct FormRenderer;

impl FormRenderer {
    /// Render a form to HTML string
    #[must_use]
    pub fn render(form: &FormBuilder) -> String {
        Self::render_with_options(form, &FormRenderOptions::default())
    }

    /// Render a form with custom options
    #[must_use]
    pub fn render_with_options(form: &FormBuilder, options: &FormRenderOptions) -> String {
        let mut html = String::with_capacity(1024);

        html.push_str("<form");
        Self::write_attr(&mut html, "action", &form.action);
        Self::write_attr(&mut html, "method", &form.method);

        if let Some(ref name) = form.name {
            Self::write_attr(&mut html, "name", name);
        }
        if let Some(ref id) = form.id {
            Self::write_attr(&mut html, "id", id);
        }
        if let Some(ref class) = form.class {
            Self::write_attr(&mut html, "class", class);
        }
        if form.asynchronous {
            Self::write_attr(&mut html, "hx-post", &form.action);
            Self::write_attr(&mut html, "hx-swap", "none");
        }
        if form.precognitive {
            Self::write_attr(&mut html, "data-precognitive", "true");
        }
        if let Some(ref redirect) = form.redirect {
            Self::write_attr(&mut html, "data-redirect", redirect);
        }
        for (name, value) in &form.custom_attrs {
            Self::write_attr(&mut html, name, value);
        }

        html.push_str(">\n");

        for field in form.fields.iter().filter(|f| !f.is_fragment()) {
            html.push_str(&Self::render_field(field, options));
        }

        let (inline, trailing): (Vec<&ActionButton>, Vec<&ActionButton>) =
            form.buttons.iter().partition(|button| button.inline);

        if form.submit_text.is_some() || !inline.is_empty() {
            html.push_str("  <div class=\"form-actions\">\n");
            if let Some(ref text) = form.submit_text {
                let submit_class = form
                    .submit_class
                    .as_deref()
                    .unwrap_or(&options.submit_class);
                let _ = writeln!(
                    html,
                    r#"    <button type="submit" class="{}">{}</button>"#,
                    Self::escape_attr(submit_class),
                    Self::escape_html(text)
                );
            }
            for button in inline {
                html.push_str(&Self::render_button(button, options));
            }
            html.push_str("  </div>\n");
        }

        html.push_str("</form>");

        for button in trailing {
            html.push('\n');
            html.push_str(&Self::render_button(button, options));
        }
        for modal in form.buttons.iter().filter_map(|b| Self::render_modal(b, options)) {
            html.push('\n');
            html.push_str(&modal);
        }
        for field in &form.fields {
            if let FieldKind::Fragment(ref fragment) = field.kind {
                html.push('\n');
                html.push_str(fragment);
            }
        }

        html
    }

    fn render_field(field: &FormField, options: &FormRenderOptions) -> String {
        let mut html = String::with_capacity(256);

        if field.is_hidden() {
            html.push_str(&Self::render_input(field, InputType::Hidden, options));
            return html;
        }

        let _ = writeln!(html, r#"  <div class="{}">"#, options.group_class);

        if let Some(ref label) = field.label {
            let _ = writeln!(
                html,
                r#"    <label for="{}" class="{}">{}</label>"#,
                Self::escape_attr(field.effective_id()),
                options.label_class,
                Self::escape_html(label)
            );
        }

        match &field.kind {
            FieldKind::Input(input_type) => {
                html.push_str(&Self::render_input(field, *input_type, options));
            }
            FieldKind::Textarea { rows } => {
                html.push_str(&Self::render_textarea(field, *rows, options));
            }
            FieldKind::Select { options: opts, multiple } => {
                html.push_str(&Self::render_select(field, opts, *multiple, options));
            }
            FieldKind::Group(fields) => {
                for inner in fields {
                    let input_type = inner.input_type().unwrap_or_default();
                    html.push_str(&Self::render_input(inner, input_type, options));
                }
            }
            FieldKind::TextBlock { title, text } => {
                if !title.is_empty() {
                    let _ = writeln!(html, "    <h4>{}</h4>", Self::escape_html(title));
                }
                let _ = writeln!(html, "    <p>{}</p>", Self::escape_html(text));
            }
            FieldKind::Fragment(fragment) => {
                html.push_str(fragment);
                html.push('\n');
            }
        }

        html.push_str("  </div>\n");
        html
    }

    fn render_input(field: &FormField, input_type: InputType, options: &FormRenderOptions) -> String {
        let mut html = String::with_capacity(128);

        let indent = if input_type == InputType::Hidden {
            "  "
        } else {
            "    "
        };

        html.push_str(indent);
        html.push_str("<input");
        Self::write_attr(&mut html, "type", input_type.as_str());
        Self::write_attr(&mut html, "name", &field.name);

        if input_type != InputType::Hidden {
            Self::write_attr(&mut html, "id", field.effective_id());
            Self::write_attr(&mut html, "class", &Self::build_input_class(field, options));
        }

        if let Some(ref value) = field.value {
            Self::write_attr(&mut html, "value", value);
        }
        if let Some(ref step) = field.step {
            Self::write_attr(&mut html, "step", step);
        }
        Self::write_flags(&mut html, field);

        for (name, value) in &field.custom_attrs {
            Self::write_attr(&mut html, name, value);
        }

        html.push_str(">\n");
        html
    }

    fn render_textarea(field: &FormField, rows: Option<u32>, options: &FormRenderOptions) -> String {
        let mut html = String::with_capacity(128);

        html.push_str("    <textarea");
        Self::write_attr(&mut html, "name", &field.name);
        Self::write_attr(&mut html, "id", field.effective_id());
        Self::write_attr(&mut html, "class", &Self::build_input_class(field, options));

        if let Some(r) = rows {
            Self::write_attr(&mut html, "rows", &r.to_string());
        }
        Self::write_flags(&mut html, field);

        html.push('>');
        if let Some(ref value) = field.value {
            html.push_str(&Self::escape_html(value));
        }
        html.push_str("</textarea>\n");
        html
    }

    fn render_select(
        field: &FormField,
        opts: &[SelectOption],
        multiple: bool,
        options: &FormRenderOptions,
    ) -> String {
        let mut html = String::with_capacity(256);

        html.push_str("    <select");
        Self::write_attr(&mut html, "name", &field.name);
        Self::write_attr(&mut html, "id", field.effective_id());
        Self::write_attr(&mut html, "class", &Self::build_input_class(field, options));

        if multiple {
            html.push_str(" multiple");
        }
        Self::write_flags(&mut html, field);

        for (name, value) in &field.custom_attrs {
            Self::write_attr(&mut html, name, value);
        }

        html.push_str(">\n");

        for opt in opts {
            html.push_str("      <option");
            Self::write_attr(&mut html, "value", &opt.value);
            if let Some(ref image) = opt.image {
                Self::write_attr(&mut html, "data-image", image);
            }
            if opt.disabled {
                html.push_str(" disabled");
            }
            if field.is_selected(&opt.value) {
                html.push_str(" selected");
            }
            html.push('>');
            html.push_str(&Self::escape_html(&opt.label));
            html.push_str("</option>\n");
        }

        html.push_str("    </select>\n");
        html
    }

    fn render_button(button: &ActionButton, options: &FormRenderOptions) -> String {
        let mut html = String::with_capacity(128);
        let class = button.class.as_deref().unwrap_or(&options.button_class);

        html.push_str("    <a");
        Self::write_attr(&mut html, "href", &button.url);
        Self::write_attr(&mut html, "class", class);
        if button.modal.is_some() {
            Self::write_attr(&mut html, "data-modal-target", &Self::modal_id(button));
        }

        html.push('>');
        html.push_str(&Self::escape_html(&button.label));
        html.push_str("</a>\n");
        html
    }

    // Rendered after the owning form closes; forms cannot nest
    fn render_modal(button: &ActionButton, options: &FormRenderOptions) -> Option<String> {
        let modal = button.modal.as_ref()?;
        let mut html = String::with_capacity(512);

        html.push_str("<div");
        Self::write_attr(&mut html, "id", &Self::modal_id(button));
        Self::write_attr(&mut html, "class", "modal");
        html.push_str(" hidden>\n");
        let _ = writeln!(html, "  <h3>{}</h3>", Self::escape_html(&modal.title));
        html.push_str(&Self::render_with_options(&modal.content, options));
        html.push_str("\n</div>");
        Some(html)
    }

    fn modal_id(button: &ActionButton) -> String {
        let slug = button
            .url
            .trim_matches('/')
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect::<String>();
        format!("modal-{slug}")
    }

    fn build_input_class(field: &FormField, options: &FormRenderOptions) -> String {
        field.class.as_ref().map_or_else(
            || options.input_class.clone(),
            |class| format!("{} {class}", options.input_class),
        )
    }

    fn write_flags(html: &mut String, field: &FormField) {
        if field.flags.required {
            html.push_str(" required");
        }
        if field.flags.disabled {
            html.push_str(" disabled");
        }
        if field.flags.readonly {
            html.push_str(" readonly");
        }
    }

    fn write_attr(html: &mut String, name: &str, value: &str) {
        html.push(' ');
        html.push_str(name);
        html.push_str("=\"");
        html.push_str(&Self::escape_attr(value));
        html.push('"');
    }

    /// Escape a string for use in HTML attribute values
    pub(crate) fn escape_attr(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('"', "&quot;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    /// Escape a string for use in HTML content
    pub(crate) fn escape_html(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple_form() {
        let form = FormBuilder::new("/test", "POST").submit("Submit");
        let html = FormRenderer::render(&form);

        assert!(html.contains(r#"action="/test""#));
        assert!(html.contains(r#"method="POST""#));
        assert!(html.contains("<button"));
        assert!(html.contains("Submit"));
    }

    #[test]
    fn test_render_hidden_fields() {
        let form = FormBuilder::new("/test", "POST")
            .hidden("_method", "PUT")
            .hidden("_relation", "profile");
        let html = FormRenderer::render(&form);

        assert!(html.contains(r#"<input type="hidden" name="_method" value="PUT">"#));
        assert!(html.contains(r#"<input type="hidden" name="_relation" value="profile">"#));
        assert!(!html.contains("form-group"));
    }

    #[test]
    fn test_render_async_and_redirect() {
        let form = FormBuilder::new("/save", "POST")
            .name("profile")
            .asynchronous()
            .precognitive()
            .redirect("/admin/resource/users/form-page/3");
        let html = FormRenderer::render(&form);

        assert!(html.contains(r#"name="profile""#));
        assert!(html.contains(r#"hx-post="/save""#));
        assert!(html.contains(r#"data-precognitive="true""#));
        assert!(html.contains(r#"data-redirect="/admin/resource/users/form-page/3""#));
    }

    #[test]
    fn test_render_select_multiple() {
        let field = FormField::select(
            "tags[]",
            vec![SelectOption::new("1", "Rust"), SelectOption::new("2", "Go")],
            true,
        )
        .with_selected(vec!["2".into()]);
        let html = FormRenderer::render(&FormBuilder::new("/test", "POST").add_field(field));

        assert!(html.contains(" multiple"));
        assert!(html.contains(r#"<option value="2" selected>Go</option>"#));
        assert!(html.contains(r#"<option value="1">Rust</option>"#));
    }

    #[test]
    fn test_render_group_and_text_block() {
        let group = FormField::group(
            "range[]",
            vec![
                FormField::input("range[start]", InputType::Date),
                FormField::input("range[end]", InputType::Date),
            ],
        )
        .with_label("Range");
        let form = FormBuilder::new("/test", "POST")
            .add_field(group)
            .add_field(FormField::text_block("", "Are you sure?"));
        let html = FormRenderer::render(&form);

        assert!(html.contains(r#"name="range[start]""#));
        assert!(html.contains(r#"name="range[end]""#));
        assert!(html.contains("<p>Are you sure?</p>"));
    }

    #[test]
    fn test_render_inline_button_with_modal() {
        let button = ActionButton::new("Delete", "/admin/resource/posts/crud/5")
            .class("btn-secondary btn-lg")
            .in_modal("Delete", |b| FormBuilder::new(b.url.clone(), "POST").hidden("_method", "DELETE"))
            .show_in_line();
        let form = FormBuilder::new("/test", "POST").submit("Save").buttons([button]);
        let html = FormRenderer::render(&form);

        assert!(html.contains(r#"class="btn-secondary btn-lg""#));
        assert!(html.contains(r#"data-modal-target="modal-admin-resource-posts-crud-5""#));
        assert!(html.contains(r#"id="modal-admin-resource-posts-crud-5""#));
        assert!(html.contains(r#"value="DELETE""#));
    }

    #[test]
    fn test_fragments_follow_the_form() {
        let form = FormBuilder::new("/admin/resource/users/crud/3", "POST")
            .add_field(FormField::input("name", InputType::Text))
            .add_field(FormField::fragment(
                "profile",
                r#"<form action="/admin/resource/users/3/relation/profile"></form>"#,
            ));
        let html = FormRenderer::render(&form);

        let outer_close = html.find("</form>").unwrap();
        let nested = html.find(r#"action="/admin/resource/users/3/relation/profile""#).unwrap();
        assert!(nested > outer_close);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(FormRenderer::escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(FormRenderer::escape_html("a & b"), "a &amp; b");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(FormRenderer::escape_attr("\"test\""), "&quot;test&quot;");
    }
}
