//! Shared value types for the load pipeline and the writer.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocfigError;

/// A loaded config document: string keys to arbitrary values.
///
/// Keys keep insertion order, so a document written back to disk lists keys in
/// the order they were loaded or defaulted.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Fallback location used when neither an explicit path nor an env var resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefaultPath {
    /// A literal file path.
    Path(PathBuf),
    /// `file_name` inside the platform config directory for `app_name`
    /// (XDG on Linux, `~/Library/Application Support` on macOS).
    Platform { app_name: String, file_name: String },
}

impl DefaultPath {
    /// Resolve to a concrete file path. Returns `None` when the platform
    /// directory cannot be determined (e.g. no home directory).
    pub fn to_path(&self) -> Option<PathBuf> {
        match self {
            DefaultPath::Path(p) => Some(p.clone()),
            DefaultPath::Platform {
                app_name,
                file_name,
            } => {
                let proj = directories::ProjectDirs::from("", "", app_name)?;
                Some(proj.config_dir().join(file_name))
            }
        }
    }
}

impl From<PathBuf> for DefaultPath {
    fn from(path: PathBuf) -> Self {
        DefaultPath::Path(path)
    }
}

impl From<&str> for DefaultPath {
    fn from(path: &str) -> Self {
        DefaultPath::Path(PathBuf::from(path))
    }
}

/// What to do when a loaded document does not conform to its schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Skip validation entirely.
    #[default]
    Off,
    /// Fail with [`DocfigError::SchemaViolation`].
    Raise,
    /// Log a warning and return the document anyway.
    Warn,
}

impl FromStr for ValidationMode {
    type Err = DocfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raise" => Ok(ValidationMode::Raise),
            "warn" => Ok(ValidationMode::Warn),
            "off" | "false" | "none" => Ok(ValidationMode::Off),
            _ => Err(DocfigError::InvalidValidationMode(s.to_string())),
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Off => write!(f, "off"),
            ValidationMode::Raise => write!(f, "raise"),
            ValidationMode::Warn => write!(f, "warn"),
        }
    }
}

/// Where template placeholders take their values from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateSource {
    /// Only the per-key variable mapping supplied by the caller.
    #[default]
    Variables,
    /// The whole in-progress document. Kept for configs written against the
    /// older behavior; must be requested explicitly.
    Document,
}

/// Policy for writing over an existing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overwrite {
    /// Fail with [`DocfigError::FileExists`].
    #[default]
    Deny,
    /// Replace the file.
    Allow,
    /// Ask through a [`ConfirmOverwrite`](crate::ConfirmOverwrite) implementation.
    Prompt,
}

impl From<bool> for Overwrite {
    fn from(allow: bool) -> Self {
        if allow {
            Overwrite::Allow
        } else {
            Overwrite::Deny
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_mode_parses_known_values() {
        assert_eq!("raise".parse::<ValidationMode>().unwrap(), ValidationMode::Raise);
        assert_eq!("WARN".parse::<ValidationMode>().unwrap(), ValidationMode::Warn);
        assert_eq!("false".parse::<ValidationMode>().unwrap(), ValidationMode::Off);
        assert_eq!("off".parse::<ValidationMode>().unwrap(), ValidationMode::Off);
    }

    #[test]
    fn validation_mode_rejects_unknown() {
        let err = "strict".parse::<ValidationMode>().unwrap_err();
        assert!(matches!(err, DocfigError::InvalidValidationMode(m) if m == "strict"));
    }

    #[test]
    fn validation_mode_display_round_trips() {
        for mode in [ValidationMode::Off, ValidationMode::Raise, ValidationMode::Warn] {
            assert_eq!(mode.to_string().parse::<ValidationMode>().unwrap(), mode);
        }
    }

    #[test]
    fn overwrite_from_bool() {
        assert_eq!(Overwrite::from(true), Overwrite::Allow);
        assert_eq!(Overwrite::from(false), Overwrite::Deny);
    }

    #[test]
    fn default_path_literal() {
        let p = DefaultPath::from("/etc/app/config.json");
        assert_eq!(p.to_path(), Some(PathBuf::from("/etc/app/config.json")));
    }

    #[test]
    fn default_path_platform_ends_with_file_name() {
        let p = DefaultPath::Platform {
            app_name: "docfig-test".into(),
            file_name: "config.toml".into(),
        };
        if let Some(path) = p.to_path() {
            assert!(path.ends_with("config.toml"));
        }
    }
}
