// tests/config_test.rs
use self_upgrade::config::{load_config, Config, LOCAL_CONFIG_FILE};
use self_upgrade::UpgradeError;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.source.repository, None);
    assert_eq!(config.source.api_base, "https://api.github.com");
    assert_eq!(config.source.cache_ttl_secs, 60);
    assert_eq!(config.source.timeout_secs, 30);
    assert!(!config.policy.preview);
    assert!(!config.policy.compatible);
    assert_eq!(config.policy.version_constraint, None);
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[source]
repository = "owner/tool"

[policy]
compatible = true
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.source.repository.as_deref(), Some("owner/tool"));
    assert!(config.policy.compatible);
    assert!(!config.policy.preview);
    assert_eq!(config.source.api_base, "https://api.github.com");
}

#[test]
#[serial]
fn test_load_full_fixture() {
    let config =
        load_config(Some("tests/fixtures/config_full.toml")).expect("Failed to load test config");

    assert_eq!(config.source.repository.as_deref(), Some("acme/widget"));
    assert_eq!(config.source.api_base, "https://github.example.com/api/v3");
    assert_eq!(config.source.user_agent, "widget-updater/1.0");
    assert_eq!(config.source.cache_ttl_secs, 300);
    assert_eq!(config.source.timeout_secs, 10);
    assert!(config.policy.preview);
    assert!(config.policy.compatible);
    assert_eq!(
        config.policy.version_constraint.as_deref(),
        Some(">=1.2, <2.0")
    );
    assert!(!config.behavior.skip_confirmation);
}

#[test]
fn test_behavior_config_defaults() {
    let config = Config::default();
    assert_eq!(config.behavior.skip_confirmation, false);
}

#[test]
#[serial]
fn test_behavior_config_skip_confirmation_from_file() {
    let config = load_config(Some("tests/fixtures/config_with_behavior.toml"))
        .expect("Failed to load test config");
    assert_eq!(config.behavior.skip_confirmation, true);
    assert_eq!(config.source, Config::default().source);
}

#[test]
#[serial]
fn test_missing_explicit_path_is_an_error() {
    let result = load_config(Some("tests/fixtures/does_not_exist.toml"));
    assert!(matches!(result, Err(UpgradeError::Io(_))));
}

#[test]
fn test_malformed_file_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[source\nrepository = ").unwrap();
    temp_file.flush().unwrap();

    let result = load_config(Some(temp_file.path().to_str().unwrap()));
    match result {
        Err(e @ UpgradeError::ConfigFormat(_)) => {
            assert!(e.to_string().contains("Invalid configuration file"));
        }
        other => panic!("Expected ConfigFormat error, got: {:?}", other),
    }
}

#[test]
#[serial]
fn test_local_config_file_is_picked_up() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(LOCAL_CONFIG_FILE),
        "[source]\nrepository = \"local/tool\"\n",
    )
    .unwrap();

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(temp_dir.path()).unwrap();
    let result = load_config(None);
    env::set_current_dir(original_dir).unwrap();

    let config = result.expect("Local config should load");
    assert_eq!(config.source.repository.as_deref(), Some("local/tool"));
}

#[test]
#[serial]
fn test_explicit_path_wins_over_local_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(LOCAL_CONFIG_FILE),
        "[source]\nrepository = \"local/tool\"\n",
    )
    .unwrap();
    let explicit = temp_dir.path().join("explicit.toml");
    fs::write(&explicit, "[source]\nrepository = \"explicit/tool\"\n").unwrap();

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(temp_dir.path()).unwrap();
    let result = load_config(Some(explicit.to_str().unwrap()));
    env::set_current_dir(original_dir).unwrap();

    let config = result.unwrap();
    assert_eq!(config.source.repository.as_deref(), Some("explicit/tool"));
}
