//! Config file loading.
//!
//! The format is chosen strictly by file-name suffix: `.json`, `.yaml`/`.yml`
//! or `.toml`. There is no content sniffing, and suffixes are matched as
//! written (`config.JSON` is not JSON).
//!
//! Whatever the format, the file must hold a mapping at the top level. The
//! result is a generic [`Document`]; no schema is consulted here.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::DocfigError;
use crate::types::Document;

/// A supported config file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    /// Determine the format from the path's extension.
    pub fn from_path(path: &Path) -> Result<Format, DocfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("toml") => Ok(Format::Toml),
            _ => Err(DocfigError::UnknownFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Yaml => write!(f, "yaml"),
            Format::Toml => write!(f, "toml"),
        }
    }
}

/// Parse `content` as `format`. `path` is only used in error messages.
pub fn parse_document(content: &str, format: Format, path: &Path) -> Result<Document, DocfigError> {
    let value: Value = match format {
        Format::Json => serde_json::from_str(content).map_err(|e| DocfigError::ParseJson {
            path: path.to_path_buf(),
            source: e,
        })?,
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| DocfigError::ParseYaml {
            path: path.to_path_buf(),
            source: e,
        })?,
        Format::Toml => toml::from_str(content).map_err(|e| DocfigError::ParseToml {
            path: path.to_path_buf(),
            source: e,
        })?,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DocfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Read and parse the config file at `path`.
///
/// The extension is checked before the file is opened, so an unknown format
/// is reported even when the file is unreadable.
pub fn load_document(path: &Path) -> Result<Document, DocfigError> {
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| DocfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), %format, "loading config file");
    parse_document(&content, format, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn path(name: &str) -> PathBuf {
        PathBuf::from("/test").join(name)
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(&path("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(&path("a.yaml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(&path("a.yml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(&path("a.toml")).unwrap(), Format::Toml);
    }

    #[test]
    fn unknown_extensions_rejected() {
        for name in ["a.ini", "a", "a.JSON", "json"] {
            let result = Format::from_path(&path(name));
            assert!(
                matches!(result, Err(DocfigError::UnknownFormat { .. })),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn parse_json() {
        let doc = parse_document(r#"{"port": 8080, "host": "x"}"#, Format::Json, &path("a.json"))
            .unwrap();
        assert_eq!(doc["port"], json!(8080));
        assert_eq!(doc["host"], json!("x"));
    }

    #[test]
    fn parse_yaml_nested() {
        let content = "port: 8080\ndatabase:\n  url: pg://\n  pool: [1, 2]\n";
        let doc = parse_document(content, Format::Yaml, &path("a.yaml")).unwrap();
        assert_eq!(doc["database"]["url"], json!("pg://"));
        assert_eq!(doc["database"]["pool"], json!([1, 2]));
    }

    #[test]
    fn parse_toml_sections() {
        let content = "port = 8080\n[database]\nurl = \"pg://\"\n";
        let doc = parse_document(content, Format::Toml, &path("a.toml")).unwrap();
        assert_eq!(doc["port"], json!(8080));
        assert_eq!(doc["database"]["url"], json!("pg://"));
    }

    #[test]
    fn top_level_sequence_is_not_a_mapping() {
        let result = parse_document("[1, 2, 3]", Format::Json, &path("a.json"));
        assert!(matches!(result, Err(DocfigError::NotAMapping { .. })));
    }

    #[test]
    fn empty_yaml_is_rejected() {
        let result = parse_document("", Format::Yaml, &path("a.yaml"));
        assert!(matches!(
            result,
            Err(DocfigError::NotAMapping { .. } | DocfigError::ParseYaml { .. })
        ));
    }

    #[test]
    fn malformed_json_reports_path() {
        let err = parse_document("{not json", Format::Json, &path("broken.json")).unwrap_err();
        assert!(matches!(err, DocfigError::ParseJson { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let result = parse_document("port = = 1", Format::Toml, &path("a.toml"));
        assert!(matches!(result, Err(DocfigError::ParseToml { .. })));
    }

    #[test]
    fn load_from_disk() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("app.yml");
        fs::write(&file, "name: demo\n").unwrap();
        let doc = load_document(&file).unwrap();
        assert_eq!(doc["name"], json!("demo"));
    }

    #[test]
    fn load_unknown_format_before_reading() {
        let result = load_document(Path::new("/does/not/exist.ini"));
        assert!(matches!(result, Err(DocfigError::UnknownFormat { .. })));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = load_document(Path::new("/does/not/exist.json"));
        assert!(matches!(result, Err(DocfigError::IoError { .. })));
    }

    #[test]
    fn keys_keep_file_order() {
        let doc = parse_document(r#"{"z": 1, "a": 2, "m": 3}"#, Format::Json, &path("a.json"))
            .unwrap();
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
