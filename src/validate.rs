//! Schema conformance checks.
//!
//! A [`Schema`] is one of two shapes, and each has its own rule under the
//! portable [`KeySetCheck`]:
//!
//! - [`Schema::KeySet`]: a set of allowed keys. The document conforms when
//!   every key it has is allowed. Allowed keys missing from the document are
//!   fine (subset rule).
//! - [`Schema::TypedFields`]: named fields with expected types. The document
//!   conforms when its key set equals the field set exactly (equality rule).
//!   Types are not inspected.
//!
//! Stricter checks plug in through the [`Conformance`] trait:
//! [`TypedCheck`] also verifies value types, and [`DeserializeCheck`] defers to
//! a Rust type's `Deserialize` impl. Both keep the subset rule for key sets.
//! Only top-level keys are ever compared.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::marker::PhantomData;

use confique::meta::{FieldKind, Meta};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DocfigError;
use crate::types::{Document, ValidationMode};

/// The expected type of a field in a [`Schema::TypedFields`] schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Any,
    String,
    Integer,
    /// Any number, integer or not.
    Number,
    Bool,
    Array,
    Object,
    Null,
}

impl FieldType {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::Any => true,
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Bool => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
            FieldType::Null => value.is_null(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Any => "any",
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Bool => "bool",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Null => "null",
        };
        write!(f, "{name}")
    }
}

/// A reference shape for a config document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Schema {
    /// Allowed keys.
    KeySet(BTreeSet<String>),
    /// Named fields with expected types.
    TypedFields {
        name: String,
        fields: BTreeMap<String, FieldType>,
    },
}

impl Schema {
    pub fn keys<I, S>(keys: I) -> Schema
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Schema::KeySet(keys.into_iter().map(Into::into).collect())
    }

    /// Use the keys of an example mapping as the allowed set. Values are ignored.
    pub fn from_document(doc: &Document) -> Schema {
        Schema::KeySet(doc.keys().cloned().collect())
    }

    pub fn typed<I, S>(name: &str, fields: I) -> Schema
    where
        I: IntoIterator<Item = (S, FieldType)>,
        S: Into<String>,
    {
        Schema::TypedFields {
            name: name.to_string(),
            fields: fields.into_iter().map(|(k, t)| (k.into(), t)).collect(),
        }
    }

    /// Derive a typed schema from a confique config struct: one field per
    /// top-level struct field, `Object` for nested sections and `Any` for
    /// leaves (confique metadata does not carry leaf types).
    pub fn from_config<C: confique::Config>() -> Schema {
        Self::from_meta(&C::META)
    }

    fn from_meta(meta: &Meta) -> Schema {
        let fields = meta
            .fields
            .iter()
            .map(|field| {
                let ty = match &field.kind {
                    FieldKind::Leaf { .. } => FieldType::Any,
                    FieldKind::Nested { .. } => FieldType::Object,
                };
                (field.name.to_string(), ty)
            })
            .collect();
        Schema::TypedFields {
            name: meta.name.to_string(),
            fields,
        }
    }

    /// Name used in messages: the schema's own name, or `"key set"`.
    pub fn name(&self) -> &str {
        match self {
            Schema::KeySet(_) => "key set",
            Schema::TypedFields { name, .. } => name,
        }
    }
}

/// Outcome of a conformance check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub conforms: bool,
    /// Document keys the schema does not allow.
    pub extra_keys: Vec<String>,
    /// Schema fields the document lacks (only reported by rules that require them).
    pub missing_keys: Vec<String>,
    /// Other failures, e.g. type mismatches or deserialization errors.
    pub problems: Vec<String>,
}

impl Report {
    fn passed() -> Report {
        Report {
            conforms: true,
            ..Report::default()
        }
    }

    fn from_parts(extra_keys: Vec<String>, missing_keys: Vec<String>, problems: Vec<String>) -> Report {
        Report {
            conforms: extra_keys.is_empty() && missing_keys.is_empty() && problems.is_empty(),
            extra_keys,
            missing_keys,
            problems,
        }
    }
}

/// A pluggable conformance rule set.
pub trait Conformance: Send + Sync {
    /// Identifies the implementation in log events.
    fn name(&self) -> &str;

    /// Identifies the implementation and its settings; part of the load cache
    /// key. Two checkers with equal tags must accept the same documents.
    fn cache_tag(&self) -> String {
        self.name().to_string()
    }

    fn check(&self, doc: &Document, schema: &Schema) -> Report;

    fn conforms(&self, doc: &Document, schema: &Schema) -> bool {
        self.check(doc, schema).conforms
    }
}

fn extra_keys(doc: &Document, allowed: impl Fn(&str) -> bool) -> Vec<String> {
    doc.keys().filter(|k| !allowed(k.as_str())).cloned().collect()
}

fn missing_fields(doc: &Document, fields: &BTreeMap<String, FieldType>) -> Vec<String> {
    fields
        .keys()
        .filter(|k| !doc.contains_key(*k))
        .cloned()
        .collect()
}

fn key_set_report(doc: &Document, keys: &BTreeSet<String>) -> Report {
    Report::from_parts(extra_keys(doc, |k| keys.contains(k)), vec![], vec![])
}

/// The portable rule set: subset for key sets, exact key equality for typed fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeySetCheck;

impl Conformance for KeySetCheck {
    fn name(&self) -> &str {
        "key-set"
    }

    fn check(&self, doc: &Document, schema: &Schema) -> Report {
        match schema {
            Schema::KeySet(keys) => key_set_report(doc, keys),
            Schema::TypedFields { fields, .. } => Report::from_parts(
                extra_keys(doc, |k| fields.contains_key(k)),
                missing_fields(doc, fields),
                vec![],
            ),
        }
    }
}

/// Typed-field checking: every field must be present with a value of its
/// declared type. Keys outside the field set are tolerated.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedCheck;

impl Conformance for TypedCheck {
    fn name(&self) -> &str {
        "typed"
    }

    fn check(&self, doc: &Document, schema: &Schema) -> Report {
        let Schema::TypedFields { fields, .. } = schema else {
            return KeySetCheck.check(doc, schema);
        };

        let problems = fields
            .iter()
            .filter_map(|(key, ty)| match doc.get(key) {
                Some(value) if !ty.matches(value) => {
                    Some(format!("'{key}' should be {ty}, found {}", kind_of(value)))
                }
                _ => None,
            })
            .collect();

        Report::from_parts(vec![], missing_fields(doc, fields), problems)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Conformance defined by a Rust type: typed-field schemas conform when the
/// document deserializes into `T`. With [`deny_unknown`](Self::deny_unknown),
/// keys that `T` ignores are reported as extra.
pub struct DeserializeCheck<T> {
    deny_unknown: bool,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> DeserializeCheck<T> {
    pub fn new() -> Self {
        Self {
            deny_unknown: false,
            _phantom: PhantomData,
        }
    }

    pub fn deny_unknown(mut self, deny: bool) -> Self {
        self.deny_unknown = deny;
        self
    }
}

impl<T> Default for DeserializeCheck<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Conformance for DeserializeCheck<T> {
    fn name(&self) -> &str {
        std::any::type_name::<T>()
    }

    fn cache_tag(&self) -> String {
        if self.deny_unknown {
            format!("{}+deny_unknown", self.name())
        } else {
            self.name().to_string()
        }
    }

    fn check(&self, doc: &Document, schema: &Schema) -> Report {
        if let Schema::KeySet(keys) = schema {
            return key_set_report(doc, keys);
        }

        let mut ignored = Vec::new();
        let result: Result<T, _> =
            serde_ignored::deserialize(Value::Object(doc.clone()), |path| {
                ignored.push(path.to_string());
            });

        let problems = match result {
            Ok(_) => vec![],
            Err(e) => vec![e.to_string()],
        };
        let extra = if self.deny_unknown { ignored } else { vec![] };

        Report::from_parts(extra, vec![], problems)
    }
}

/// Check `doc` against `schema` and act on the result according to `mode`.
///
/// - [`ValidationMode::Off`]: nothing is inspected; returns a passing report.
/// - [`ValidationMode::Raise`]: non-conformance fails with
///   [`DocfigError::SchemaViolation`].
/// - [`ValidationMode::Warn`]: non-conformance is logged and the report returned.
///
/// Validation without a schema fails with [`DocfigError::SchemaRequired`].
pub fn validate_document(
    doc: &Document,
    schema: Option<&Schema>,
    mode: ValidationMode,
    checker: &dyn Conformance,
) -> Result<Report, DocfigError> {
    if mode == ValidationMode::Off {
        return Ok(Report::passed());
    }
    let schema = schema.ok_or(DocfigError::SchemaRequired)?;

    let report = checker.check(doc, schema);
    if report.conforms {
        return Ok(report);
    }

    match mode {
        ValidationMode::Raise => Err(DocfigError::SchemaViolation {
            schema: schema.name().to_string(),
            extra_keys: report.extra_keys,
            missing_keys: report.missing_keys,
            problems: report.problems,
        }),
        ValidationMode::Warn => {
            tracing::warn!(
                schema = schema.name(),
                checker = checker.name(),
                extra_keys = ?report.extra_keys,
                missing_keys = ?report.missing_keys,
                problems = ?report.problems,
                "config does not conform to schema"
            );
            Ok(report)
        }
        ValidationMode::Off => Ok(report),
    }
}
