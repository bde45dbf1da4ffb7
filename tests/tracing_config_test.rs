use quellbot::infrastructure::observability::TracingConfig;

// Single test to keep the shared process environment race-free.
#[test]
fn given_log_env_variables_when_reading_config_then_format_and_environment_follow() {
    std::env::set_var("LOG_FORMAT", "JSON");
    std::env::set_var("APP_ENV", "production");
    let config = TracingConfig::from_env();
    assert!(config.json_format);
    assert_eq!(config.environment, "production");

    std::env::remove_var("LOG_FORMAT");
    std::env::remove_var("APP_ENV");
    let config = TracingConfig::from_env();
    assert!(!config.json_format);
    assert_eq!(config.environment, "development");
}
