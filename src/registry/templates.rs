//! Built-in messages and rendering templates.

use std::sync::Arc;

/// A template turning message text (or inner markup) into markup.
pub type TemplateFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Message kind used when placing a field's error.
pub const ERROR_KIND: &str = "error";

/// Container kind used for the aggregate submit summary.
pub const SUMMARY_CONTAINER: &str = "summary";

pub(crate) const BUILTIN_MESSAGES: &[(&str, &str)] = &[
    ("generic", "An error occurred"),
    ("required", "This field is required"),
    ("email", "This is not a (correct) email address"),
    ("length", "This field does not have the right length"),
    ("number", "This is not a (correct) number"),
    ("phoneNL", "This is not a (correct) phone number"),
    ("postalcodeNL", "This is not a (correct) postal code"),
];

pub(crate) fn builtin_message_templates() -> Vec<(&'static str, TemplateFn)> {
    vec![
        (ERROR_KIND, paragraph("flt-form__message-error")),
        ("note", paragraph("flt-form__message-note")),
    ]
}

pub(crate) fn builtin_container_templates() -> Vec<(&'static str, TemplateFn)> {
    vec![(
        SUMMARY_CONTAINER,
        Arc::new(|inner: &str| format!(r#"<div class="flt-form__messages">{}</div>"#, inner)),
    )]
}

fn paragraph(class: &'static str) -> TemplateFn {
    Arc::new(move |text: &str| format!(r#"<p class="{}">{}</p>"#, class, text))
}

/// Template that passes text through untouched.
pub(crate) fn plain() -> TemplateFn {
    Arc::new(|text: &str| text.to_string())
}

/// Template that renders nothing.
pub(crate) fn empty() -> TemplateFn {
    Arc::new(|_: &str| String::new())
}
