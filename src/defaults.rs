//! Fill a loaded document with caller-supplied defaults.
//!
//! Defaults never overwrite: a key already present in the loaded document keeps
//! its value, even when that value is `null`. Only top-level keys are
//! considered; a nested mapping present in the file replaces the default
//! mapping wholesale.

use crate::error::DocfigError;
use crate::types::Document;

/// Merge `defaults` into `loaded`.
///
/// `loaded` is `None` when no config file was resolved; the result is then a
/// copy of `defaults`, unless `config_required` is set, in which case the call
/// fails with [`DocfigError::ConfigRequired`] naming `env_var`.
pub fn apply_defaults(
    loaded: Option<Document>,
    defaults: &Document,
    config_required: bool,
    env_var: Option<&str>,
) -> Result<Document, DocfigError> {
    let Some(mut doc) = loaded else {
        if config_required {
            return Err(DocfigError::ConfigRequired {
                env_var: env_var.map(str::to_string),
            });
        }
        tracing::debug!(keys = defaults.len(), "no config file, using defaults only");
        return Ok(defaults.clone());
    };

    let mut added = 0usize;
    for (key, value) in defaults {
        if !doc.contains_key(key) {
            doc.insert(key.clone(), value.clone());
            added += 1;
        }
    }
    tracing::debug!(added, "applied config defaults");

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::doc;
    use serde_json::json;

    #[test]
    fn absent_document_copies_defaults() {
        let defaults = doc(json!({"port": 8080}));
        let merged = apply_defaults(None, &defaults, false, Some("APP_CONFIG")).unwrap();
        assert_eq!(merged, defaults);
    }

    #[test]
    fn absent_document_required_errors() {
        let defaults = doc(json!({"port": 8080}));
        let err = apply_defaults(None, &defaults, true, Some("APP_CONFIG")).unwrap_err();
        match err {
            DocfigError::ConfigRequired { env_var } => {
                assert_eq!(env_var.as_deref(), Some("APP_CONFIG"))
            }
            other => panic!("Expected ConfigRequired, got {other:?}"),
        }
    }

    #[test]
    fn required_satisfied_by_loaded_document() {
        let loaded = doc(json!({"port": 1}));
        let merged = apply_defaults(Some(loaded.clone()), &Document::new(), true, None).unwrap();
        assert_eq!(merged, loaded);
    }

    #[test]
    fn existing_keys_win() {
        let loaded = doc(json!({"port": 3000, "host": "file"}));
        let defaults = doc(json!({"port": 8080, "debug": false}));
        let merged = apply_defaults(Some(loaded), &defaults, false, None).unwrap();
        assert_eq!(merged, doc(json!({"port": 3000, "host": "file", "debug": false})));
    }

    #[test]
    fn null_in_file_is_not_replaced() {
        let loaded = doc(json!({"url": null}));
        let defaults = doc(json!({"url": "pg://localhost"}));
        let merged = apply_defaults(Some(loaded), &defaults, false, None).unwrap();
        assert_eq!(merged["url"], json!(null));
    }

    #[test]
    fn nested_mappings_are_not_merged() {
        let loaded = doc(json!({"database": {"url": "pg://file"}}));
        let defaults = doc(json!({"database": {"url": "pg://default", "pool": 5}}));
        let merged = apply_defaults(Some(loaded), &defaults, false, None).unwrap();
        assert_eq!(merged["database"], json!({"url": "pg://file"}));
    }

    #[test]
    fn merge_adds_exactly_missing_keys() {
        let loaded = doc(json!({"a": 1, "b": 2}));
        let defaults = doc(json!({"b": 20, "c": 30, "d": 40}));
        let merged = apply_defaults(Some(loaded.clone()), &defaults, false, None).unwrap();

        for (key, value) in &loaded {
            assert_eq!(&merged[key], value);
        }
        let added: Vec<&str> = merged
            .keys()
            .filter(|k| !loaded.contains_key(*k))
            .map(String::as_str)
            .collect();
        assert_eq!(added, vec!["c", "d"]);
    }
}
