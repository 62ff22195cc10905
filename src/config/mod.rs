//! Configuration loading and layering.
//!
//! Handles `.license-key.toml` loading, environment variable resolution,
//! and the hand-off to [`crate::generator::GeneratorOptions`].

pub mod loader;

pub use loader::{Config, ConfigError, SerialConfig, SignerConfig, TemplateConfig};
