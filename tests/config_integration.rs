use serial_test::serial;
use std::env;
use std::fs;
use teampulse::config::{AppConfig, StoreProvider};

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("TEAMPULSE_SERVER__PORT");
        env::remove_var("TEAMPULSE_PERSISTENCE__PROVIDER");
        env::remove_var("TEAMPULSE_CORS__ALLOWED_ORIGINS");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("DATABASE_URL");
        env::remove_var("RATE_LIMIT_ENABLED");
        env::remove_var("LOG_JSON");
    }
}

fn load(args: &[&str]) -> AppConfig {
    let argv = std::iter::once("teampulse").chain(args.iter().copied());
    AppConfig::load_from_args(argv).expect("Failed to load config")
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = load(&[]);
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.persistence.provider, StoreProvider::Postgres);
    assert!(config.resilience.rate_limit_enabled);
    assert!(!config.log.json);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("TEAMPULSE_SERVER__PORT", "9090");
        env::set_var("TEAMPULSE_PERSISTENCE__PROVIDER", "memory");
    }

    let config = load(&[]);
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.persistence.provider, StoreProvider::Memory);

    clear_env_vars();
}

#[test]
#[serial]
fn test_env_sets_cors_origin_list() {
    clear_env_vars();
    unsafe {
        env::set_var(
            "TEAMPULSE_CORS__ALLOWED_ORIGINS",
            "http://localhost:5173,https://pulse.example",
        );
    }

    let config = load(&[]);
    assert_eq!(
        config.cors.allowed_origins,
        vec!["http://localhost:5173", "https://pulse.example"]
    );

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("TEAMPULSE_SERVER__PORT", "9090");
    }

    let config = load(&["--port", "4040", "--rate-limit-enabled", "false"]);
    assert_eq!(config.server.port, 4040);
    assert!(!config.resilience.rate_limit_enabled);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = dir.path().join("teampulse.yaml");
    fs::write(
        &file_path,
        r#"
server:
  port: 7070
persistence:
  provider: memory
cors:
  allowed_origins:
    - "http://localhost:5173"
    "#,
    )
    .expect("Failed to write temp config");

    let path = file_path.to_string_lossy().to_string();
    let config = load(&["--config", &path]);
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.persistence.provider, StoreProvider::Memory);
    assert_eq!(config.cors.allowed_origins, vec!["http://localhost:5173"]);
    // Untouched keys keep their defaults.
    assert_eq!(config.persistence.max_connections, 5);
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["teampulse", "--config", "/nonexistent/teampulse.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_invalid_provider_is_rejected() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["teampulse", "--store", "mysql"]);
    assert!(result.is_err());
}
