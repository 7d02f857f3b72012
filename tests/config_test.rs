use carve::config::{get_config, load_config, parse_config, Config, CONFIG_FILES};
use carve::error::Error;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_config_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    assert_eq!(load_config(temp_dir.path(), &CONFIG_FILES).unwrap(), None);
    assert_eq!(get_config(temp_dir.path()).unwrap(), Config::default());
}

#[test]
fn test_json_config() {
    let config = parse_config(r#"{"prefix": "@demo", "patterns": ["**/*.tsx"]}"#).unwrap();
    assert_eq!(config.prefix.as_deref(), Some("@demo"));
    assert_eq!(config.patterns, Some(vec!["**/*.tsx".to_string()]));
}

#[test]
fn test_yaml_config() {
    let content = "prefix: \"@demo\"\npatterns:\n  - \"**/*\"\n  - \"!**/build/**\"\n";
    let config = parse_config(content).unwrap();
    assert_eq!(config.prefix.as_deref(), Some("@demo"));
    assert_eq!(
        config.patterns,
        Some(vec!["**/*".to_string(), "!**/build/**".to_string()])
    );
}

#[test]
fn test_empty_config() {
    assert_eq!(parse_config("").unwrap(), Config::default());
    assert_eq!(parse_config("{}").unwrap(), Config::default());
}

#[test]
fn test_unknown_field_rejected() {
    match parse_config("prefixes: [\"@mst\"]\n") {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("Invalid configuration format")),
        other => panic!("Expected ConfigError, got {:?}", other),
    }
}

#[test]
fn test_config_lookup_order() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("carve.yaml"), "prefix: \"@yaml\"\n").unwrap();
    fs::write(temp_dir.path().join("carve.json"), r#"{"prefix": "@json"}"#).unwrap();

    let config = get_config(temp_dir.path()).unwrap();
    assert_eq!(config.prefix.as_deref(), Some("@json"));
}
