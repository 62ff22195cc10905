//! Integration tests for the config → generator path behind the CLI commands.
//!
//! These tests exercise the library functions that back each command,
//! using the public API from the license_key crate.

use std::path::PathBuf;

use license_key::config::Config;
use license_key::env::Env;
use license_key::template::DEFAULT_TEMPLATE;
use license_key::{Generator, GeneratorError};

/// An environment with none of the `LICENSE_KEY_*` overrides set.
fn no_env() -> Env {
    Env::from_vars(Vec::<(&str, &str)>::new())
}

// ---------------------------------------------------------------------------
// generate / check
// ---------------------------------------------------------------------------

#[test]
fn config_file_feeds_generator() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("private.pem"), "key").unwrap();
    let config_path = dir.path().join("license.toml");
    std::fs::write(
        &config_path,
        "[signer]\nprivate_key_path = \"private.pem\"\n\n[serial]\ngroup_size = 5\ngroups_per_line = 5\n",
    )
    .unwrap();

    let config = Config::load(Some(&config_path), None, None, &no_env()).unwrap();
    assert_eq!(config.serial.columns(), Some((5, 5)));

    let generator = Generator::new(config.generator_options()).unwrap();
    assert_eq!(generator.private_key_path(), dir.path().join("private.pem"));
    assert_eq!(generator.openssl_path(), PathBuf::from("openssl"));
}

#[test]
fn config_without_key_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("license.toml");
    std::fs::write(&config_path, "[serial]\ngroup_size = 4\n").unwrap();

    let config = Config::load(Some(&config_path), None, None, &no_env()).unwrap();

    let err = Generator::new(config.generator_options()).unwrap_err();
    assert!(matches!(err, GeneratorError::Configuration(_)), "got: {err}");
}

#[test]
fn config_with_missing_key_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("license.toml");
    std::fs::write(&config_path, "[signer]\nprivate_key_path = \"gone.pem\"\n").unwrap();

    let config = Config::load(Some(&config_path), None, None, &no_env()).unwrap();
    assert_eq!(config.signer.private_key_path, Some(dir.path().join("gone.pem")));

    let err = Generator::new(config.generator_options()).unwrap_err();
    assert!(err.to_string().contains("doesn't exist"), "got: {err}");
}

// ---------------------------------------------------------------------------
// template
// ---------------------------------------------------------------------------

#[test]
fn builtin_template_is_printable() {
    assert!(DEFAULT_TEMPLATE.starts_with("====BEGIN LICENSE===="));
    assert!(DEFAULT_TEMPLATE.ends_with("=====END LICENSE=====\n"));
}
