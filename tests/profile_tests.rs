//! Profile selection end to end
//!
//! These tests verify:
//! - Each profile yields its documented sink layout
//! - Unknown or missing profile names fail at startup
//! - A `LOG_CONFIG` table replaces the built-in one
//! - `.env` values are picked up and overridden by explicit ones

use rust_log_router::config::{Environment, Profile, Settings, LOG_CONFIG_VAR, PROFILE_VAR};
use rust_log_router::prelude::*;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn env_for(profile: &str, dir: &TempDir) -> Environment {
    Environment::from_pairs([
        (PROFILE_VAR, profile.to_string()),
        ("SECRET_KEY", "test-secret".to_string()),
        (
            "LOG_FILE",
            dir.path().join("app.log").display().to_string(),
        ),
    ])
}

#[test]
fn test_development_writes_verbose_file_lines() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let settings = Settings::from_environment(&env_for("development", &dir)).expect("settings");
    assert_eq!(settings.profile, Profile::Development);

    let router = Arc::new(settings.build_router().expect("router builds"));
    assert_eq!(router.sinks_for("logging_test.views"), ["file", "console"]);

    let logger = router.get_logger("logging_test.views");
    logger.debug("visible in development");
    router.flush().expect("flush");

    let content = fs::read_to_string(dir.path().join("app.log")).expect("read log");
    let line = content.lines().next().expect("one line");
    let parts: Vec<&str> = line.splitn(7, ' ').collect();
    assert_eq!(parts[0], "logging_test.views");
    assert_eq!(parts[1], "DEBUG");
    assert_eq!(parts[4], "-", "plain calls carry no module");
    assert!(line.ends_with("visible in development"));
}

#[test]
fn test_production_is_file_only_at_info() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let settings = Settings::from_environment(&env_for("production", &dir)).expect("settings");
    assert!(!settings.debug);
    assert!(settings.allowed_hosts.is_empty());

    let router = settings.build_router().expect("router builds");
    assert_eq!(router.sinks_for("app"), ["file"]);
    assert_eq!(router.effective_level("app"), LogLevel::Info);

    router.emit("app", LogLevel::Debug, "dropped");
    router.emit("app", LogLevel::Info, "kept");
    router.flush().expect("flush");

    let content = fs::read_to_string(dir.path().join("app.log")).expect("read log");
    assert_eq!(content.lines().count(), 1);
    assert!(content.trim_end().ends_with("kept"));
}

#[test]
fn test_test_profile_filters_below_warning() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let settings = Settings::from_environment(&env_for("test", &dir)).expect("settings");
    let router = settings.build_router().expect("router builds");

    assert_eq!(router.sinks_for("app"), ["console"]);
    assert!(!router.is_enabled_for("app", LogLevel::Info));
    assert!(router.is_enabled_for("app", LogLevel::Warning));
    assert!(!dir.path().join("app.log").exists());
}

#[test]
fn test_unknown_profile_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = Settings::from_environment(&env_for("staging", &dir)).expect_err("unknown profile");
    assert!(err.is_startup_error());
    let message = err.to_string();
    assert!(message.contains("staging"));
    assert!(message.contains("development"));
}

#[test]
fn test_log_config_file_replaces_builtin_table() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let table = dir.path().join("logging.toml");
    fs::write(
        &table,
        r#"
        [handlers.console]
        kind = "console"
        stream = "stdout"

        [loggers.""]
        level = "ERROR"
        handlers = ["console"]

        [loggers."app.audit"]
        level = "DEBUG"
        "#,
    )
    .expect("write table");

    let env = env_for("production", &dir).with(LOG_CONFIG_VAR, table.display().to_string());
    let settings = Settings::from_environment(&env).expect("settings");
    let router = settings.build_router().expect("router builds");

    assert_eq!(router.sinks_for("app.audit.login"), ["console"]);
    assert_eq!(router.effective_level("app.audit.login"), LogLevel::Debug);
    assert_eq!(router.effective_level("app.views"), LogLevel::Error);
}

#[test]
fn test_dotenv_values_are_loaded() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let dotenv = dir.path().join(".env");
    fs::write(
        &dotenv,
        "RUST_LOG_ROUTER_TEST_PROFILE=test\nRUST_LOG_ROUTER_TEST_SECRET=from-dotenv\n",
    )
    .expect("write .env");

    let env = Environment::from_process_with_dotenv(&dotenv).expect("dotenv parses");
    assert_eq!(env.get("RUST_LOG_ROUTER_TEST_PROFILE"), Some("test"));

    let env = env.with("RUST_LOG_ROUTER_TEST_SECRET", "explicit");
    assert_eq!(env.get("RUST_LOG_ROUTER_TEST_SECRET"), Some("explicit"));
}

#[test]
fn test_malformed_dotenv_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let dotenv = dir.path().join(".env");
    fs::write(&dotenv, "NOT VALID LINE WITH 'UNCLOSED\n").expect("write .env");

    assert!(Environment::from_process_with_dotenv(&dotenv).is_err());
}
