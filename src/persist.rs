//! Writing config documents to disk.
//!
//! [`write_document`] serializes a whole [`Document`] by destination extension
//! (`.json` or `.toml`) under an [`Overwrite`] policy. Parent directories are
//! created as needed.
//!
//! [`set_top_level_key`] patches one key of a TOML file in place with
//! `toml_edit`, so existing comments and formatting survive.

use std::path::Path;

use serde_json::Value;

use crate::error::DocfigError;
use crate::file::Format;
use crate::types::{Document, Overwrite};

/// Visual style for the overwrite prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptStyle {
    #[default]
    Plain,
    Colorful,
}

/// Asks whether an existing file may be replaced.
pub trait ConfirmOverwrite {
    fn confirm(&self, path: &Path, style: PromptStyle) -> Result<bool, DocfigError>;
}

/// Terminal yes/no prompt. Defaults to "no".
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerConfirm;

impl ConfirmOverwrite for DialoguerConfirm {
    fn confirm(&self, path: &Path, style: PromptStyle) -> Result<bool, DocfigError> {
        use dialoguer::Confirm;
        use dialoguer::theme::{ColorfulTheme, SimpleTheme};

        let prompt = format!("File {} exists. Overwrite?", path.display());
        let answer = match style {
            PromptStyle::Plain => Confirm::with_theme(&SimpleTheme)
                .with_prompt(prompt)
                .default(false)
                .interact(),
            PromptStyle::Colorful => Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact(),
        };
        answer.map_err(|e| DocfigError::Prompt {
            reason: e.to_string(),
        })
    }
}

/// Write `doc` to `path`, prompting on the terminal under [`Overwrite::Prompt`].
pub fn write_document(doc: &Document, path: &Path, overwrite: Overwrite) -> Result<(), DocfigError> {
    write_document_with(doc, path, overwrite, &DialoguerConfirm, PromptStyle::default())
}

/// Like [`write_document`] with an explicit confirmation provider and style.
pub fn write_document_with(
    doc: &Document,
    path: &Path,
    overwrite: Overwrite,
    confirm: &dyn ConfirmOverwrite,
    style: PromptStyle,
) -> Result<(), DocfigError> {
    let content = serialize_document(doc, path)?;

    if path.exists() {
        match overwrite {
            Overwrite::Deny => {
                return Err(DocfigError::FileExists {
                    path: path.to_path_buf(),
                });
            }
            Overwrite::Prompt => {
                if !confirm.confirm(path, style)? {
                    return Err(DocfigError::OverwriteDeclined {
                        path: path.to_path_buf(),
                    });
                }
            }
            Overwrite::Allow => {}
        }
    }

    write_with_parents(path, &content)?;
    tracing::debug!(path = %path.display(), keys = doc.len(), "wrote config file");
    Ok(())
}

/// Serialize `doc` in the format implied by `path`'s extension.
pub fn serialize_document(doc: &Document, path: &Path) -> Result<String, DocfigError> {
    let unsupported = |reason: String| DocfigError::UnsupportedValue {
        path: path.to_path_buf(),
        reason,
    };
    match Format::from_path(path)? {
        Format::Json => serde_json::to_string_pretty(doc)
            .map(|s| s + "\n")
            .map_err(|e| unsupported(e.to_string())),
        Format::Toml => toml::to_string(doc).map_err(|e| unsupported(e.to_string())),
        Format::Yaml => Err(DocfigError::UnknownFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn write_with_parents(path: &Path, content: &str) -> Result<(), DocfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| DocfigError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, content).map_err(|e| DocfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Pure function: set top-level `key` to `value` in a TOML document string.
///
/// `content` of `None` starts from an empty document.
pub fn set_in_document(
    content: Option<&str>,
    key: &str,
    value: &Value,
    path: &Path,
) -> Result<String, DocfigError> {
    let mut doc = content
        .unwrap_or_default()
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| DocfigError::EditToml {
            path: path.to_path_buf(),
            source: e,
        })?;

    let converted = to_toml_edit(value).map_err(|reason| DocfigError::UnsupportedValue {
        path: path.to_path_buf(),
        reason: format!("'{key}': {reason}"),
    })?;
    doc[key] = toml_edit::value(converted);

    Ok(doc.to_string())
}

/// I/O wrapper: read the TOML file at `path` (if any), set `key`, write back.
pub fn set_top_level_key(path: &Path, key: &str, value: &Value) -> Result<(), DocfigError> {
    if Format::from_path(path)? != Format::Toml {
        return Err(DocfigError::UnknownFormat {
            path: path.to_path_buf(),
        });
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => Some(c),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(DocfigError::IoError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let new_content = set_in_document(content.as_deref(), key, value, path)?;
    write_with_parents(path, &new_content)
}

fn to_toml_edit(value: &Value) -> Result<toml_edit::Value, String> {
    Ok(match value {
        Value::Null => return Err("TOML has no null value".into()),
        Value::Bool(b) => (*b).into(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.into(),
            (None, Some(_)) if n.is_u64() => return Err(format!("{n} does not fit in an i64")),
            (None, Some(f)) => f.into(),
            (None, None) => return Err(format!("unrepresentable number {n}")),
        },
        Value::String(s) => s.as_str().into(),
        Value::Array(items) => {
            let mut arr = toml_edit::Array::new();
            for item in items {
                arr.push(to_toml_edit(item)?);
            }
            toml_edit::Value::Array(arr)
        }
        Value::Object(map) => {
            let mut table = toml_edit::InlineTable::new();
            for (k, v) in map {
                table.insert(k.as_str(), to_toml_edit(v)?);
            }
            toml_edit::Value::InlineTable(table)
        }
    })
}
