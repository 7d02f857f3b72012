use carve::cli::Args;
use carve::config::Config;
use carve::discover::DEFAULT_PATTERNS;
use carve::processor::Mode;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("carve")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["./project"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.root, PathBuf::from("./project"));
    assert_eq!(parsed.mode, Mode::Remove);
    assert!(!parsed.dry_run);
    assert!(!parsed.yes);
    assert!(!parsed.verbose);
    assert!(parsed.prefix.is_none());
    assert!(parsed.patterns.is_empty());
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--mode",
        "sanitize",
        "--dry-run",
        "--prefix",
        "@demo",
        "--pattern",
        "**/*.ts",
        "--pattern",
        "!**/build/**",
        "--yes",
        "--json",
        "--verbose",
        "./project",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.mode, Mode::Sanitize);
    assert!(parsed.dry_run);
    assert_eq!(parsed.prefix.as_deref(), Some("@demo"));
    assert_eq!(parsed.patterns, ["**/*.ts", "!**/build/**"]);
    assert!(parsed.yes);
    assert!(parsed.json);
    assert!(parsed.verbose);
}

#[test]
fn test_short_flags() {
    let args = make_args(&["-m", "sanitize", "-n", "-y", "-v", "./project"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.mode, Mode::Sanitize);
    assert!(parsed.dry_run);
    assert!(parsed.yes);
    assert!(parsed.verbose);
}

#[test]
fn test_invalid_mode() {
    let args = make_args(&["--mode", "delete", "./project"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_missing_args() {
    assert!(Args::try_parse_from(make_args(&[])).is_err());
}

#[test]
fn test_run_config_defaults() {
    let parsed = Args::try_parse_from(make_args(&["./project"])).unwrap();
    let run_config = parsed.run_config(Config::default());

    assert_eq!(run_config.root, PathBuf::from("./project"));
    assert_eq!(run_config.prefix, "@mst");
    assert_eq!(run_config.patterns, DEFAULT_PATTERNS);
    assert_eq!(run_config.mode, Mode::Remove);
    assert!(!run_config.dry_run);
}

#[test]
fn test_run_config_precedence() {
    let config = Config {
        prefix: Some("@file".to_string()),
        patterns: Some(vec!["**/*.tsx".to_string()]),
    };

    let parsed = Args::try_parse_from(make_args(&["./project"])).unwrap();
    let run_config = parsed.run_config(config);
    assert_eq!(run_config.prefix, "@file");
    assert_eq!(run_config.patterns, ["**/*.tsx"]);

    let config = Config {
        prefix: Some("@file".to_string()),
        patterns: Some(vec!["**/*.tsx".to_string()]),
    };
    let parsed = Args::try_parse_from(make_args(&[
        "--prefix",
        "@flag",
        "--pattern",
        "**/*.ts",
        "./project",
    ]))
    .unwrap();
    let run_config = parsed.run_config(config);
    assert_eq!(run_config.prefix, "@flag");
    assert_eq!(run_config.patterns, ["**/*.ts"]);
}
