//! Core resolution pipeline: turn an optional loaded document into the final config.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. Fill defaults (or fail if a config was required but none was found)
//! 2. Expand templated keys
//! 3. Validate against the schema

use crate::defaults::apply_defaults;
use crate::error::DocfigError;
use crate::template::expand_templates;
use crate::types::{Document, TemplateSource, ValidationMode};
use crate::validate::{Conformance, Schema, validate_document};

/// All pre-loaded data needed to resolve a config. No I/O happens here.
#[derive(Debug, Clone, Default)]
pub struct ResolveInput {
    /// The parsed config file, or `None` when no path resolved.
    pub loaded: Option<Document>,
    pub defaults: Document,
    pub config_required: bool,
    /// Env var named in the `ConfigRequired` error message.
    pub env_var: Option<String>,
    /// Keys to expand, each with its variable mapping, in order.
    pub templates: Vec<(String, Document)>,
    pub template_source: TemplateSource,
    pub schema: Option<Schema>,
    pub validate: ValidationMode,
}

/// Resolve the final document from pre-loaded inputs.
pub fn resolve(input: ResolveInput, checker: &dyn Conformance) -> Result<Document, DocfigError> {
    let mut doc = apply_defaults(
        input.loaded,
        &input.defaults,
        input.config_required,
        input.env_var.as_deref(),
    )?;

    expand_templates(&mut doc, &input.templates, input.template_source)?;

    validate_document(&doc, input.schema.as_ref(), input.validate, checker)?;

    Ok(doc)
}
