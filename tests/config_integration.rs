use std::env;
use std::fs;
use std::time::Duration;

use colloquy::config::AppConfig;
use serial_test::serial;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("HOST");
        env::remove_var("CONVERSATION_TIMEOUT_MINUTES");
        env::remove_var("COLLOQUY_SERVER__PORT");
        env::remove_var("COLLOQUY_SERVER__HOST");
        env::remove_var("COLLOQUY_CONVERSATION__TIMEOUT_MINUTES");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["colloquy"]).expect("Failed to load config");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.conversation.timeout_minutes, 30);
    assert_eq!(config.conversation.timeout(), Duration::from_secs(30 * 60));
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("COLLOQUY_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args(["colloquy"]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_override_wins_over_env() {
    clear_env_vars();
    unsafe {
        env::set_var("COLLOQUY_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args(["colloquy", "--port", "7171"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 7171);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = dir.path().join("test_config.yaml");

    let config_content = r"
server:
  port: 7070
conversation:
  timeout_minutes: 5
    ";
    fs::write(&file_path, config_content).expect("Failed to write temp config");

    let config = AppConfig::load_from_args([
        "colloquy",
        "--config",
        file_path.to_str().expect("temp path not UTF-8"),
    ])
    .expect("Failed to load config from file");

    assert_eq!(config.server.port, 7070);
    assert_eq!(config.conversation.timeout(), Duration::from_secs(5 * 60));
}

#[test]
#[serial]
fn test_timeout_minutes_cli() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["colloquy", "--conversation-timeout-minutes", "5"])
        .expect("Failed to load config");
    assert_eq!(config.conversation.timeout_minutes, 5);

    clear_env_vars();
}
