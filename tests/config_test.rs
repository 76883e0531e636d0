// tests/config_test.rs
use buoy::config::{load_config, Config};
use buoy::domain::RulesetType;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Run `f` with the working directory set to `dir`.
fn in_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
    let prev = env::current_dir().unwrap();
    env::set_current_dir(dir).unwrap();
    let out = f();
    env::set_current_dir(prev).unwrap();
    out
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
domain = "example.com"
ruleset = "releaseorbranch"

[repos]
"example.com/lib" = "https://git.example.com/lib.git"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.domain, "example.com");
    assert_eq!(config.ruleset(), RulesetType::ReleaseOrReleaseBranchRule);
    assert_eq!(config.repos.len(), 1);
    assert_eq!(config.http.timeout_secs, 30);
}

#[test]
fn test_load_missing_explicit_path() {
    let err = load_config(Some("/definitely/not/here/buoy.toml")).unwrap_err();
    assert!(err.to_string().contains("cannot read"));
}

#[test]
fn test_load_invalid_toml() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[http\ntimeout_secs = 5\n").unwrap();
    temp_file.flush().unwrap();

    assert!(load_config(Some(temp_file.path().to_str().unwrap())).is_err());
}

#[test]
#[serial]
fn test_load_local_config() {
    let td = tempfile::tempdir().unwrap();
    fs::write(td.path().join("buoy.toml"), "domain = \"k8s.io\"\n").unwrap();

    let config = in_dir(td.path(), || load_config(None)).unwrap();
    assert_eq!(config.domain, "k8s.io");
    assert_eq!(config.ruleset(), RulesetType::AnyRule);
}

#[test]
#[serial]
fn test_explicit_path_wins_over_local() {
    let td = tempfile::tempdir().unwrap();
    fs::write(td.path().join("buoy.toml"), "domain = \"k8s.io\"\n").unwrap();
    fs::write(td.path().join("custom.toml"), "domain = \"example.com\"\n").unwrap();

    let config = in_dir(td.path(), || load_config(Some("custom.toml"))).unwrap();
    assert_eq!(config.domain, "example.com");
}

#[test]
fn test_serialized_default_round_trips() {
    let config = Config::default();
    let text = toml::to_string(&config).unwrap();
    assert_eq!(Config::parse("default", &text).unwrap(), config);
}
