use std::fs;
use std::sync::Arc;

use docfig::{ConfigCache, Docfig, DocfigError, Overwrite, Schema, ValidationMode};
use serde_json::json;
use serial_test::serial;
use tempfile::TempDir;

#[test]
#[serial]
fn unset_env_var_yields_defaults() {
    temp_env::with_var_unset("APP_CONFIG", || {
        let config = Docfig::builder()
            .config_path_env_var("APP_CONFIG")
            .config_required(false)
            .default_value("port", 8080)
            .load()
            .unwrap();
        assert_eq!(serde_json::Value::Object(config), json!({"port": 8080}));
    });
}

#[test]
#[serial]
fn empty_env_var_counts_as_unset() {
    temp_env::with_var("APP_CONFIG", Some(""), || {
        let config = Docfig::builder()
            .config_path_env_var("APP_CONFIG")
            .default_value("port", 8080)
            .load()
            .unwrap();
        assert_eq!(config["port"], json!(8080));
    });
}

#[test]
#[serial]
fn env_var_pointing_nowhere_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");

    temp_env::with_var("APP_CONFIG", Some(missing.as_os_str()), || {
        let result = Docfig::builder().config_path_env_var("APP_CONFIG").load();
        assert!(matches!(result, Err(DocfigError::ConfigDoesNotExist { .. })));
    });
}

#[test]
#[serial]
fn env_var_file_is_loaded_and_defaulted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.toml");
    fs::write(&path, "# app settings\nhost = \"example.com\"\n").unwrap();

    temp_env::with_var("APP_CONFIG", Some(path.as_os_str()), || {
        let config = Docfig::builder()
            .config_path_env_var("APP_CONFIG")
            .default_value("host", "localhost")
            .default_value("port", 8080)
            .load()
            .unwrap();
        assert_eq!(config["host"], json!("example.com"));
        assert_eq!(config["port"], json!(8080));
    });
}

#[test]
#[serial]
fn required_config_names_env_var() {
    temp_env::with_var_unset("APP_CONFIG", || {
        let err = Docfig::builder()
            .config_path_env_var("APP_CONFIG")
            .config_required(true)
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("APP_CONFIG"));
    });
}

#[test]
fn extra_key_violates_key_set_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.json");
    fs::write(&path, r#"{"a": 1, "b": 2}"#).unwrap();

    let builder = Docfig::builder()
        .config_path(&path)
        .schema(Schema::keys(["a"]));

    let err = builder.validate(ValidationMode::Raise).load().unwrap_err();
    assert!(matches!(err, DocfigError::SchemaViolation { .. }));
    assert!(err.to_string().contains("unknown keys: b"));
}

#[test]
fn warn_mode_returns_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.json");
    fs::write(&path, r#"{"a": 1, "b": 2}"#).unwrap();

    let config = Docfig::builder()
        .config_path(&path)
        .schema(Schema::keys(["a"]))
        .validate(ValidationMode::Warn)
        .load()
        .unwrap();
    assert_eq!(config.len(), 2);
}

#[test]
fn json_write_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/dir/app.json");

    let original = Docfig::builder()
        .default_value("name", "demo")
        .default_value("port", 8080)
        .default_value("tags", json!(["a", "b"]))
        .default_value("db", json!({"url": null, "pool": 5}))
        .load()
        .unwrap();

    docfig::write_document(&original, &path, Overwrite::Deny).unwrap();
    let loaded = docfig::load_document(&path).unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn overwrite_policy_controls_replacement() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.json");
    fs::write(&path, r#"{"old": true}"#).unwrap();

    let doc = Docfig::builder()
        .default_value("new", true)
        .load()
        .unwrap();

    let err = docfig::write_document(&doc, &path, Overwrite::from(false)).unwrap_err();
    assert!(matches!(err, DocfigError::FileExists { .. }));
    assert_eq!(docfig::load_document(&path).unwrap()["old"], json!(true));

    docfig::write_document(&doc, &path, Overwrite::from(true)).unwrap();
    let replaced = docfig::load_document(&path).unwrap();
    assert_eq!(replaced.get("new"), Some(&json!(true)));
    assert!(replaced.get("old").is_none());
}

#[test]
fn cached_loads_read_file_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.yaml");
    fs::write(&path, "port: 3000\n").unwrap();

    let cache = ConfigCache::new();
    let first = Docfig::builder()
        .config_path(&path)
        .load_cached(&cache)
        .unwrap();

    fs::remove_file(&path).unwrap();

    let second = Docfig::builder()
        .config_path(&path)
        .load_cached(&cache)
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second["port"], json!(3000));

    let stats = cache.stats();
    assert_eq!((stats.entries, stats.hits, stats.misses), (1, 1, 1));
}

#[test]
fn set_top_level_key_keeps_comments() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.toml");
    fs::write(&path, "# the port\nport = 8080\n").unwrap();

    docfig::set_top_level_key(&path, "port", &json!(9000)).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("# the port"));
    assert_eq!(docfig::load_document(&path).unwrap()["port"], json!(9000));
}
