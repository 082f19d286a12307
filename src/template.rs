//! Placeholder expansion in string values.
//!
//! A template is a string with named placeholders: `"{scheme}://{host}"`.
//! `{{` and `}}` stand for literal braces. Placeholder names may not be empty
//! and may not contain braces; there is no format-spec syntax.
//!
//! String values are substituted as-is. Any other value is rendered as its
//! JSON text (`8080`, `true`, `[1,2]`).

use serde_json::Value;

use crate::error::DocfigError;
use crate::types::{Document, TemplateSource};

/// Expand the placeholders in `template` using `vars`.
///
/// `key` names the document key being expanded and only appears in errors.
pub fn format_template(key: &str, template: &str, vars: &Document) -> Result<String, DocfigError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => {
                            return Err(DocfigError::MalformedTemplate {
                                key: key.into(),
                                reason: "unclosed '{'".into(),
                            });
                        }
                        Some(ch) => name.push(ch),
                    }
                }
                if name.is_empty() {
                    return Err(DocfigError::MalformedTemplate {
                        key: key.into(),
                        reason: "empty placeholder '{}'".into(),
                    });
                }
                let value = vars
                    .get(&name)
                    .ok_or_else(|| DocfigError::UndefinedPlaceholder {
                        key: key.into(),
                        placeholder: name.clone(),
                    })?;
                out.push_str(&render(value));
            }
            '}' => {
                return Err(DocfigError::MalformedTemplate {
                    key: key.into(),
                    reason: "single '}' (use '}}' for a literal brace)".into(),
                });
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Expand the templated keys of `doc` in place.
///
/// `instructions` pairs each key to expand with its variable mapping, applied in
/// order. With [`TemplateSource::Document`] the variable mappings are ignored
/// and placeholders are resolved against the document itself as it stands when
/// that key is reached.
pub fn expand_templates(
    doc: &mut Document,
    instructions: &[(String, Document)],
    source: TemplateSource,
) -> Result<(), DocfigError> {
    for (key, vars) in instructions {
        let template = match doc.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(DocfigError::TemplateNotString(key.clone())),
            None => return Err(DocfigError::TemplateKeyMissing(key.clone())),
        };

        let expanded = match source {
            TemplateSource::Variables => format_template(key, &template, vars)?,
            TemplateSource::Document => format_template(key, &template, doc)?,
        };

        tracing::debug!(key = %key, "expanded config template");
        doc.insert(key.clone(), Value::String(expanded));
    }
    Ok(())
}
