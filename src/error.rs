use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocfigError {
    #[error("Cannot specify both a config path and a config path environment variable ({env_var})")]
    ConflictingInputs { path: PathBuf, env_var: String },

    #[error("{}", unset_message(.env_var))]
    ConfigPathUnset { env_var: Option<String> },

    #[error("Config file does not exist: {path}")]
    ConfigDoesNotExist { path: PathBuf },

    #[error("{}", required_message(.env_var))]
    ConfigRequired { env_var: Option<String> },

    #[error("Unknown config format for {path} (expected .json, .yaml, .yml or .toml)")]
    UnknownFormat { path: PathBuf },

    #[error("Config file {path} does not contain a mapping at the top level")]
    NotAMapping { path: PathBuf },

    #[error("Undefined placeholder '{placeholder}' in template for '{key}'")]
    UndefinedPlaceholder { key: String, placeholder: String },

    #[error("Template key '{0}' is not present in the config")]
    TemplateKeyMissing(String),

    #[error("Template key '{0}' does not hold a string value")]
    TemplateNotString(String),

    #[error("Malformed template for '{key}': {reason}")]
    MalformedTemplate { key: String, reason: String },

    #[error("Config does not conform to schema '{schema}'{}", violation_detail(.extra_keys, .missing_keys, .problems))]
    SchemaViolation {
        schema: String,
        extra_keys: Vec<String>,
        missing_keys: Vec<String>,
        /// Checker-specific failures, e.g. type mismatches or serde errors.
        problems: Vec<String>,
    },

    #[error("Cannot validate config without a schema; call .schema() on the builder")]
    SchemaRequired,

    #[error("Unknown validation mode '{0}' (expected raise, warn or off)")]
    InvalidValidationMode(String),

    #[error("Refusing to overwrite existing file: {path}")]
    FileExists { path: PathBuf },

    #[error("Overwrite of {path} declined")]
    OverwriteDeclined { path: PathBuf },

    #[error("Confirmation prompt failed: {reason}")]
    Prompt { reason: String },

    #[error("Cannot write {path}: {reason}")]
    UnsupportedValue { path: PathBuf, reason: String },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to build cache key: {0}")]
    CacheKey(serde_json::Error),

    #[error("Failed to edit {path}: {source}")]
    EditToml {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
}

fn unset_message(env_var: &Option<String>) -> String {
    match env_var {
        Some(var) => format!("Config environment variable not set: {var}"),
        None => "Config path is not set".to_string(),
    }
}

fn required_message(env_var: &Option<String>) -> String {
    match env_var {
        Some(var) => format!("Config required: set the {var} environment variable"),
        None => "Config required but no config path was given".to_string(),
    }
}

fn violation_detail(extra_keys: &[String], missing_keys: &[String], problems: &[String]) -> String {
    let mut detail = String::new();
    if !extra_keys.is_empty() {
        detail.push_str(&format!(" (unknown keys: {})", extra_keys.join(", ")));
    }
    if !missing_keys.is_empty() {
        detail.push_str(&format!(" (missing keys: {})", missing_keys.join(", ")));
    }
    if !problems.is_empty() {
        detail.push_str(&format!(": {}", problems.join("; ")));
    }
    detail
}
