//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and the signing-tool defaults so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "license-key";

/// Crate version, as reported by `license-key version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Target triple the binary was built for (set by `build.rs`).
pub const TARGET: &str = env!("TARGET");

/// Local config filename (e.g. `.license-key.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".license-key.toml";

/// Directory name under `~/.config/` for the global config.
pub const CONFIG_DIR: &str = "license-key";

/// Command used for the signing tool when no explicit path is configured.
/// Resolved through `PATH`.
pub const DEFAULT_OPENSSL: &str = "openssl";

/// Lowest signing-tool version accepted by the version gate.
pub const MIN_OPENSSL_VERSION: &str = "1.0.1";

/// `$0` given to the built-in signing script when run through `sh -c`.
pub const SIGN_SCRIPT_NAME: &str = "license-key-sign";

// ── Model field names ───────────────────────────────────────────────

pub const FIELD_NAME: &str = "name";
pub const FIELD_SERIAL: &str = "serial";
pub const FIELD_SERIAL_FORMAT: &str = "serialFormat";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_PRIVATE_KEY: &str = "LICENSE_KEY_PRIVATE_KEY";
pub const ENV_OPENSSL: &str = "LICENSE_KEY_OPENSSL";
pub const ENV_SCRIPT: &str = "LICENSE_KEY_SCRIPT";
