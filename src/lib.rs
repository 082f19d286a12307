//! Load small config documents from JSON, YAML or TOML files, fill in
//! defaults, expand templates, check them against a schema, and write them
//! back.
//!
//! ```ignore
//! let config = Docfig::builder()
//!     .config_path_env_var("APP_CONFIG")
//!     .default_value("port", 8080)
//!     .load()?;
//! ```
//!
//! That call reads the file named by `$APP_CONFIG` if the variable is set,
//! adds `port = 8080` when the file lacks it, and hands you a
//! [`Document`]: a plain key/value mapping. With `APP_CONFIG` unset you get
//! `{"port": 8080}`.
//!
//! # The pipeline
//!
//! Every load runs the same stages in order:
//!
//! ```text
//! locate    explicit path > env var > default path
//!    ↓
//! file      parse by extension: .json, .yaml/.yml, .toml
//!    ↓
//! defaults  add missing top-level keys (existing keys always win)
//!    ↓
//! template  expand {placeholders} in selected string values
//!    ↓
//! validate  compare against a schema: off, warn or raise
//! ```
//!
//! Each stage is a public module with plain functions, so you can run any of
//! them on their own. [`resolve::resolve`] runs the last three on data you
//! already hold, with no I/O.
//!
//! # Finding the file
//!
//! A config path comes from exactly one place:
//!
//! - **[`config_path()`](DocfigBuilder::config_path)**: a literal path.
//! - **[`config_path_env_var()`](DocfigBuilder::config_path_env_var)**: the
//!   name of an environment variable holding the path. An empty value counts
//!   as unset.
//! - **[`default_config_path()`](DocfigBuilder::default_config_path)**: used
//!   only when the first two give nothing. Either a literal path or
//!   [`DefaultPath::Platform`], a file in the OS config directory.
//!
//! Giving both an explicit path and an env var is an error
//! ([`DocfigError::ConflictingInputs`]); docfig never silently picks one.
//! An explicit or env-var path that does not exist is an error too. A default
//! path that does not exist is skipped.
//!
//! When nothing resolves, the document is built from the defaults alone.
//! Set [`config_required(true)`](DocfigBuilder::config_required) to turn that
//! into [`DocfigError::ConfigRequired`], whose message names the env var the
//! user should set.
//!
//! # Templates
//!
//! [`template(key, vars)`](DocfigBuilder::template) treats the string at
//! `key` as a template. `{name}` is replaced by `vars["name"]`; `{{` and `}}`
//! are literal braces. Only the variables you pass are visible. Resolving
//! placeholders against the document itself is available as an explicit
//! opt-in through [`TemplateSource::Document`].
//!
//! # Validation
//!
//! A [`Schema`] is one of two shapes, each with its own rule under the
//! default [`KeySetCheck`]:
//!
//! | Schema | Conforms when |
//! |--------|---------------|
//! | [`Schema::KeySet`] | every document key is in the set (subset) |
//! | [`Schema::TypedFields`] | the document keys equal the field names exactly |
//!
//! The rules are pluggable through the [`Conformance`] trait.
//! [`TypedCheck`] also checks field types, and [`DeserializeCheck`] asks
//! whether the document deserializes into a Rust type.
//!
//! [`ValidationMode::Raise`] turns non-conformance into
//! [`DocfigError::SchemaViolation`]; [`ValidationMode::Warn`] logs it through
//! `tracing` and returns the document anyway.
//!
//! # Caching
//!
//! [`load_cached()`](DocfigBuilder::load_cached) memoizes loads in a
//! [`ConfigCache`] you own, keyed by the full set of builder arguments. The
//! file is read once per distinct set of arguments. [`ConfigCache::global()`]
//! gives a process-wide cache when you want one.
//!
//! # Writing
//!
//! [`write_document`] serializes to `.json` or `.toml` by extension, creating
//! parent directories. An existing file is replaced only under
//! [`Overwrite::Allow`], or under [`Overwrite::Prompt`] after the user
//! confirms. [`set_top_level_key`] edits a single key of a TOML file in place,
//! keeping its comments.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature, on by default) offers
//! [`ConfigArgs`], a flattenable struct adding `--config <PATH>` and
//! `--validate <MODE>` to your parser. To use docfig without clap:
//!
//! ```toml
//! docfig = { version = "...", default-features = false }
//! ```
//!
//! # Logging
//!
//! Each stage emits `tracing` debug events. docfig never installs a
//! subscriber; that is up to the application.

pub mod cache;
pub mod defaults;
pub mod error;
pub mod file;
pub mod locate;
pub mod persist;
pub mod resolve;
pub mod template;
pub mod types;
pub mod validate;

mod builder;
#[cfg(feature = "clap")]
mod cli;

#[cfg(test)]
mod fixtures;

pub use builder::{Docfig, DocfigBuilder, LoadRequest};
pub use cache::{CacheKey, CacheStats, ConfigCache};
#[cfg(feature = "clap")]
pub use cli::ConfigArgs;
pub use error::DocfigError;
pub use file::{Format, load_document};
pub use locate::{PathInputs, PathSource, ResolvedPath};
pub use persist::{
    ConfirmOverwrite, DialoguerConfirm, PromptStyle, set_top_level_key, write_document,
};
pub use types::{DefaultPath, Document, Overwrite, TemplateSource, ValidationMode};
pub use validate::{
    Conformance, DeserializeCheck, FieldType, KeySetCheck, Report, Schema, TypedCheck,
};
