//! Integration tests for cforge-config: file round-trips and env overrides.

use cforge_config::Config;
use cforge_types::{ColorChoice, OutputFormat};
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

#[tokio::test]
async fn loads_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[general]
default_output = "plain"
color = "never"
jobs = 8
preferred_generator = "Ninja"

[network]
registry_index_url = "https://example.test/index"
index_max_age_days = 14
        "#
    )
    .unwrap();

    let config = Config::load_from_file(temp_file.path()).await.unwrap();
    assert_eq!(config.general.default_output, OutputFormat::Plain);
    assert_eq!(config.general.color, ColorChoice::Never);
    assert_eq!(config.general.jobs, 8);
    assert_eq!(config.general.preferred_generator, "Ninja");
    assert_eq!(config.network.registry_index_url, "https://example.test/index");
    assert_eq!(config.network.index_max_age_days, 14);
}

#[test]
fn merge_env_overrides_defaults() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap();
    std::env::remove_var("CFORGE_OUTPUT");
    std::env::remove_var("CFORGE_COLOR");
    std::env::set_var("CFORGE_OUTPUT", "json");
    std::env::set_var("CFORGE_COLOR", "always");

    let mut config = Config::default();
    config.merge_env().unwrap();

    assert_eq!(config.general.default_output, OutputFormat::Json);
    assert_eq!(config.general.color, ColorChoice::Always);

    std::env::remove_var("CFORGE_OUTPUT");
    std::env::remove_var("CFORGE_COLOR");
}

#[test]
fn merge_env_rejects_invalid_value() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap();
    std::env::remove_var("CFORGE_OUTPUT");
    std::env::set_var("CFORGE_OUTPUT", "invalid");

    let mut config = Config::default();
    assert!(config.merge_env().is_err());

    std::env::remove_var("CFORGE_OUTPUT");
}
