//! License template rendering.
//!
//! Templates use [Handlebars](https://handlebarsjs.com/) syntax. Licenses are
//! plain text, so HTML escaping is turned off: `{{name}}` and `{{{name}}}`
//! render the same. Missing fields render as empty strings.

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

/// Built-in template used when a request does not supply one.
///
/// Placeholders: `{{name}}`, `{{serial}}`.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/default.template");

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to render template: {0}")]
    Render(String),
}

/// Render `template` with the fields of `data`.
pub fn render<T: Serialize>(template: &str, data: &T) -> Result<String, TemplateError> {
    let mut hb = Handlebars::new();
    hb.register_escape_fn(handlebars::no_escape);
    hb.render_template(template, data)
        .map_err(|e| TemplateError::Render(e.to_string()))
}
