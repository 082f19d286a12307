//! Config path resolution.
//!
//! Picks the single file to load from three candidate sources, in order:
//!
//! 1. an explicit path,
//! 2. an environment variable naming a path,
//! 3. a fallback [`DefaultPath`].
//!
//! The first two are mutually exclusive: passing both is an error rather than a
//! silent choice. An env var holding the empty string counts as unset, and so
//! does an empty explicit path.
//!
//! Every function has a `_with` twin that takes the env lookup as a closure, so
//! tests can pass synthetic values instead of mutating the process environment.

use std::path::{Path, PathBuf};

use crate::error::DocfigError;
use crate::types::DefaultPath;

/// Where a resolved path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    Explicit,
    EnvVar,
    Default,
}

/// A resolved config path and its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub source: PathSource,
}

/// The inputs to path resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathInputs {
    pub config_path: Option<PathBuf>,
    pub config_path_env_var: Option<String>,
    pub default_config_path: Option<DefaultPath>,
    /// Fail with [`DocfigError::ConfigDoesNotExist`] if the resolved path is
    /// not an existing regular file.
    pub raise_if_dne: bool,
}

impl PathInputs {
    pub fn new() -> Self {
        Self {
            raise_if_dne: true,
            ..Self::default()
        }
    }

    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn config_path_env_var(mut self, var: &str) -> Self {
        self.config_path_env_var = Some(var.to_string());
        self
    }

    pub fn default_config_path(mut self, path: impl Into<DefaultPath>) -> Self {
        self.default_config_path = Some(path.into());
        self
    }

    pub fn raise_if_dne(mut self, raise: bool) -> Self {
        self.raise_if_dne = raise;
        self
    }
}

/// Read `var` from the process environment. Unset, empty and non-UTF-8 values
/// all yield `None`.
pub fn env_var_to_config_path(var: &str) -> Option<PathBuf> {
    env_lookup(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

/// Resolve the config path, failing with [`DocfigError::ConfigPathUnset`] when
/// no source yields one.
pub fn resolve_config_path(inputs: &PathInputs) -> Result<ResolvedPath, DocfigError> {
    resolve_config_path_with(inputs, env_lookup)
}

/// Like [`resolve_config_path`] but with an explicit env lookup.
pub fn resolve_config_path_with(
    inputs: &PathInputs,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedPath, DocfigError> {
    resolve_config_path_lenient_with(inputs, lookup)?.ok_or_else(|| DocfigError::ConfigPathUnset {
        env_var: inputs.config_path_env_var.clone(),
    })
}

/// Resolve the config path, returning `Ok(None)` when no source yields one.
///
/// Conflicting inputs and a missing file (when `raise_if_dne` is set) are still
/// errors.
pub fn resolve_config_path_lenient(
    inputs: &PathInputs,
) -> Result<Option<ResolvedPath>, DocfigError> {
    resolve_config_path_lenient_with(inputs, env_lookup)
}

/// Like [`resolve_config_path_lenient`] but with an explicit env lookup.
pub fn resolve_config_path_lenient_with(
    inputs: &PathInputs,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<ResolvedPath>, DocfigError> {
    if let (Some(path), Some(var)) = (&inputs.config_path, &inputs.config_path_env_var) {
        return Err(DocfigError::ConflictingInputs {
            path: path.clone(),
            env_var: var.clone(),
        });
    }

    let mut resolved = inputs
        .config_path
        .as_ref()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| ResolvedPath {
            path: p.clone(),
            source: PathSource::Explicit,
        });

    if let Some(var) = &inputs.config_path_env_var {
        resolved = lookup(var)
            .filter(|v| !v.is_empty())
            .map(|v| ResolvedPath {
                path: PathBuf::from(v),
                source: PathSource::EnvVar,
            });
    }

    if resolved.is_none()
        && let Some(default) = &inputs.default_config_path
    {
        resolved = default.to_path().map(|path| ResolvedPath {
            path,
            source: PathSource::Default,
        });
    }

    let Some(resolved) = resolved else {
        return Ok(None);
    };

    if inputs.raise_if_dne && !resolved.path.is_file() {
        return Err(DocfigError::ConfigDoesNotExist {
            path: resolved.path,
        });
    }

    tracing::debug!(path = %resolved.path.display(), source = ?resolved.source, "resolved config path");
    Ok(Some(resolved))
}

/// Whether a non-empty path is available from `config_path` or, when given,
/// from the env var (which takes over in that case).
pub fn config_path_is_set(config_path: Option<&Path>, config_path_env_var: Option<&str>) -> bool {
    config_path_is_set_with(config_path, config_path_env_var, env_lookup)
}

pub fn config_path_is_set_with(
    config_path: Option<&Path>,
    config_path_env_var: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> bool {
    candidate_path(config_path, config_path_env_var, lookup).is_some()
}

/// Whether the path from `config_path` or the env var names an existing file.
pub fn config_path_exists(config_path: Option<&Path>, config_path_env_var: Option<&str>) -> bool {
    config_path_exists_with(config_path, config_path_env_var, env_lookup)
}

pub fn config_path_exists_with(
    config_path: Option<&Path>,
    config_path_env_var: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> bool {
    candidate_path(config_path, config_path_env_var, lookup).is_some_and(|p| p.is_file())
}

fn candidate_path(
    config_path: Option<&Path>,
    config_path_env_var: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<PathBuf> {
    let path = match config_path_env_var {
        Some(var) => lookup(var).map(PathBuf::from),
        None => config_path.map(Path::to_path_buf),
    };
    path.filter(|p| !p.as_os_str().is_empty())
}
