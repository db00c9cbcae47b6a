//! Query template rendering.
//!
//! Templates are backend-native query text with `{{ field }}`
//! placeholders. Each placeholder is replaced by the literal value of the
//! named [`MetricQueryModel`] field:
//!
//! | placeholder            | model field          |
//! |------------------------|----------------------|
//! | `{{ name }}`           | `name`               |
//! | `{{ namespace }}`      | `namespace`          |
//! | `{{ target }}`         | `target`             |
//! | `{{ service }}`        | `service`            |
//! | `{{ interval }}`       | `interval`           |
//! | `{{ variables.key }}`  | `variables["key"]`   |
//!
//! Whitespace inside the braces is optional. Empty model fields count as
//! absent and fail the render.

use meshsplit_core::MetricQueryModel;
use thiserror::Error;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const VARIABLES_PREFIX: &str = "variables.";

/// Why a template could not be rendered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("field `{0}` is not set in the query model")]
    MissingField(String),

    #[error("unterminated placeholder at byte {0}")]
    Unterminated(usize),

    #[error("empty placeholder at byte {0}")]
    EmptyPlaceholder(usize),
}

/// Substitute every placeholder in `template` with its value from `model`.
pub fn render(template: &str, model: &MetricQueryModel) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            return Err(TemplateError::Unterminated(offset + start));
        };

        let field = after_open[..end].trim();
        if field.is_empty() {
            return Err(TemplateError::EmptyPlaceholder(offset + start));
        }
        out.push_str(lookup(model, field)?);

        let consumed = start + OPEN.len() + end + CLOSE.len();
        rest = &rest[consumed..];
        offset += consumed;
    }

    out.push_str(rest);
    Ok(out)
}

fn lookup<'a>(model: &'a MetricQueryModel, field: &str) -> Result<&'a str, TemplateError> {
    let value = match field {
        "name" => model.name.as_str(),
        "namespace" => model.namespace.as_str(),
        "target" => model.target.as_str(),
        "service" => model.service.as_str(),
        "interval" => model.interval.as_str(),
        _ => match field.strip_prefix(VARIABLES_PREFIX) {
            Some(key) if !key.is_empty() => {
                model.variables.get(key).map(String::as_str).unwrap_or_default()
            }
            _ => return Err(TemplateError::UnknownField(field.to_string())),
        },
    };

    if value.is_empty() {
        return Err(TemplateError::MissingField(field.to_string()));
    }
    Ok(value)
}
