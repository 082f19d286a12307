use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheKey, ConfigCache};
use crate::error::DocfigError;
use crate::file;
use crate::locate::{self, PathInputs, PathSource};
use crate::resolve::{self, ResolveInput};
use crate::types::{DefaultPath, Document, TemplateSource, ValidationMode};
use crate::validate::{Conformance, KeySetCheck, Schema};

/// Entry point for building a docfig load.
pub struct Docfig;

impl Docfig {
    pub fn builder() -> DocfigBuilder {
        DocfigBuilder::new()
    }
}

/// Builder for locating, loading, defaulting, expanding and validating a config
/// document.
///
/// The path comes from [`config_path()`](Self::config_path) or the env var
/// named by [`config_path_env_var()`](Self::config_path_env_var) (never both),
/// falling back to [`default_config_path()`](Self::default_config_path). When
/// no path resolves, the result is built from the defaults alone unless
/// [`config_required()`](Self::config_required) is set.
pub struct DocfigBuilder {
    config_path: Option<PathBuf>,
    config_path_env_var: Option<String>,
    default_config_path: Option<DefaultPath>,
    defaults: Document,
    config_required: bool,
    templates: Vec<(String, Document)>,
    template_source: TemplateSource,
    schema: Option<Schema>,
    validate: ValidationMode,
    checker: Arc<dyn Conformance>,
}

/// Every argument of a load, by value. Two loads with equal requests share a
/// cache entry.
///
/// The env var is recorded by name, not by its current value: a cached load
/// does not notice the variable changing later in the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadRequest {
    pub config_path: Option<PathBuf>,
    pub config_path_env_var: Option<String>,
    pub default_config_path: Option<DefaultPath>,
    pub defaults: Document,
    pub config_required: bool,
    pub templates: Vec<(String, Document)>,
    pub template_source: TemplateSource,
    pub schema: Option<Schema>,
    pub validate: ValidationMode,
    /// [`Conformance::cache_tag`] of the checker.
    pub checker: String,
}

impl LoadRequest {
    /// Canonical key for this request. Mapping keys are sorted at every level,
    /// so requests that compare equal produce equal keys whatever order their
    /// defaults and template variables were inserted in.
    pub fn cache_key(&self) -> Result<CacheKey, DocfigError> {
        let value = serde_json::to_value(self).map_err(DocfigError::CacheKey)?;
        serde_json::to_string(&sorted(value))
            .map(CacheKey::new)
            .map_err(DocfigError::CacheKey)
    }
}

fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let entries: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, sorted(v))).collect();
            Value::Object(entries.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}

impl DocfigBuilder {
    fn new() -> Self {
        Self {
            config_path: None,
            config_path_env_var: None,
            default_config_path: None,
            defaults: Document::new(),
            config_required: false,
            templates: Vec::new(),
            template_source: TemplateSource::default(),
            schema: None,
            validate: ValidationMode::default(),
            checker: Arc::new(KeySetCheck),
        }
    }

    /// Load this file. Conflicts with [`config_path_env_var()`](Self::config_path_env_var).
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Read the config path from this environment variable. An empty value
    /// counts as unset.
    pub fn config_path_env_var(mut self, var: &str) -> Self {
        self.config_path_env_var = Some(var.to_string());
        self
    }

    /// Forget a previously set env var name.
    pub fn no_config_path_env_var(mut self) -> Self {
        self.config_path_env_var = None;
        self
    }

    /// Fallback path used when neither an explicit path nor the env var
    /// resolves. A missing file here is skipped rather than an error.
    pub fn default_config_path(mut self, path: impl Into<DefaultPath>) -> Self {
        self.default_config_path = Some(path.into());
        self
    }

    /// Fill `key` with `value` when the loaded document lacks it.
    pub fn default_value(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.defaults.insert(key.to_string(), value.into());
        self
    }

    /// Add every entry of `defaults`. Later entries replace earlier defaults
    /// for the same key.
    pub fn defaults(mut self, defaults: Document) -> Self {
        self.defaults.extend(defaults);
        self
    }

    /// Fail with [`DocfigError::ConfigRequired`] when no config file resolves.
    pub fn config_required(mut self, required: bool) -> Self {
        self.config_required = required;
        self
    }

    /// Expand placeholders in the string value at `key` using `vars`.
    ///
    /// Keys are expanded in the order they are added.
    pub fn template(mut self, key: &str, vars: Document) -> Self {
        self.templates.push((key.to_string(), vars));
        self
    }

    /// Choose where placeholders take their values from
    /// (default: [`TemplateSource::Variables`]).
    pub fn template_source(mut self, source: TemplateSource) -> Self {
        self.template_source = source;
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set the validation mode (default: [`ValidationMode::Off`]).
    pub fn validate(mut self, mode: ValidationMode) -> Self {
        self.validate = mode;
        self
    }

    /// Replace the conformance rules (default: [`KeySetCheck`]).
    pub fn checker(mut self, checker: impl Conformance + 'static) -> Self {
        self.checker = Arc::new(checker);
        self
    }

    /// Snapshot the load arguments.
    pub fn request(&self) -> LoadRequest {
        LoadRequest {
            config_path: self.config_path.clone(),
            config_path_env_var: self.config_path_env_var.clone(),
            default_config_path: self.default_config_path.clone(),
            defaults: self.defaults.clone(),
            config_required: self.config_required,
            templates: self.templates.clone(),
            template_source: self.template_source,
            schema: self.schema.clone(),
            validate: self.validate,
            checker: self.checker.cache_tag(),
        }
    }

    fn path_inputs(&self) -> PathInputs {
        PathInputs {
            config_path: self.config_path.clone(),
            config_path_env_var: self.config_path_env_var.clone(),
            default_config_path: self.default_config_path.clone(),
            raise_if_dne: false,
        }
    }

    /// Locate and parse the config file, if one resolves.
    fn load_file(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Document>, DocfigError> {
        let Some(resolved) = locate::resolve_config_path_lenient_with(&self.path_inputs(), lookup)?
        else {
            tracing::debug!("no config path resolved, using defaults");
            return Ok(None);
        };

        if !resolved.path.is_file() {
            if resolved.source == PathSource::Default {
                tracing::debug!(
                    path = %resolved.path.display(),
                    "default config file not found, using defaults"
                );
                return Ok(None);
            }
            return Err(DocfigError::ConfigDoesNotExist {
                path: resolved.path,
            });
        }

        file::load_document(&resolved.path).map(Some)
    }

    fn resolve_input(&self, loaded: Option<Document>) -> ResolveInput {
        ResolveInput {
            loaded,
            defaults: self.defaults.clone(),
            config_required: self.config_required,
            env_var: self.config_path_env_var.clone(),
            templates: self.templates.clone(),
            template_source: self.template_source,
            schema: self.schema.clone(),
            validate: self.validate,
        }
    }

    fn load_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<Document, DocfigError> {
        let loaded = self.load_file(lookup)?;
        resolve::resolve(self.resolve_input(loaded), self.checker.as_ref())
    }

    /// Run the full pipeline, reading the config file on every call.
    pub fn load(&self) -> Result<Document, DocfigError> {
        self.load_with(|var| std::env::var(var).ok())
    }

    /// Like [`load()`](Self::load), memoized in `cache` by [`request()`](Self::request).
    pub fn load_cached(&self, cache: &ConfigCache) -> Result<Arc<Document>, DocfigError> {
        let key = self.request().cache_key()?;
        cache.get_or_load(key, || self.load())
    }
}
