//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags (applied by the binary)
//! 2. Environment variables
//! 3. `--config <file>`, or `.license-key.toml` in the working directory
//! 4. `~/.config/license-key/config.toml` (global defaults)
//! 5. Built-in defaults
//!
//! Relative paths inside a config file are resolved against the directory
//! containing that file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::env::Env;
use crate::generator::GeneratorOptions;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub signer: SignerConfig,
    pub serial: SerialConfig,
    pub template: TemplateConfig,
}

/// Signing tool and key locations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    pub private_key_path: Option<PathBuf>,
    pub openssl_path: Option<PathBuf>,
    pub script_path: Option<PathBuf>,
}

/// Column layout for the serial. Unset or zero disables wrapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub group_size: Option<usize>,
    pub groups_per_line: Option<usize>,
}

impl SerialConfig {
    /// Group size and groups per line, when both are set and non-zero.
    pub fn columns(&self) -> Option<(usize, usize)> {
        match (self.group_size, self.groups_per_line) {
            (Some(size), Some(per_line)) if size > 0 && per_line > 0 => Some((size, per_line)),
            _ => None,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        self.columns().is_some()
    }
}

/// License template file. Unset means the built-in template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// `global` is the user-wide file, usually [`Config::global_config_path`];
    /// it is skipped when it doesn't exist. `explicit` replaces the local
    /// `.license-key.toml` lookup in `cwd` and must exist.
    pub fn load(
        explicit: Option<&Path>,
        cwd: Option<&Path>,
        global: Option<&Path>,
        env: &Env,
    ) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = global {
            if global_path.exists() {
                let global = Self::load_file(global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: explicit or local config
        match explicit {
            Some(path) => {
                let file = Self::load_file(path)?;
                config.merge(file);
            }
            None => {
                if let Some(dir) = cwd {
                    let local_path = dir.join(crate::constants::CONFIG_FILENAME);
                    if local_path.exists() {
                        let local = Self::load_file(&local_path)?;
                        config.merge(local);
                    }
                }
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        if let Some(base) = path.parent() {
            config.resolve_relative(base);
        }
        Ok(config)
    }

    /// Get the global config file path.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::constants::CONFIG_DIR).join("config.toml"))
    }

    fn resolve_relative(&mut self, base: &Path) {
        let resolve = |p: &mut Option<PathBuf>| {
            if let Some(path) = p {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        };
        resolve(&mut self.signer.private_key_path);
        resolve(&mut self.signer.script_path);
        resolve(&mut self.template.path);
        // `openssl_path` stays as written: a bare name is looked up on PATH.
        if let Some(path) = &self.signer.openssl_path {
            if path.components().count() > 1 && path.is_relative() {
                self.signer.openssl_path = Some(base.join(path));
            }
        }
    }

    /// Merge another config into this one (other takes precedence for set values).
    fn merge(&mut self, other: Config) {
        if other.signer.private_key_path.is_some() {
            self.signer.private_key_path = other.signer.private_key_path;
        }
        if other.signer.openssl_path.is_some() {
            self.signer.openssl_path = other.signer.openssl_path;
        }
        if other.signer.script_path.is_some() {
            self.signer.script_path = other.signer.script_path;
        }

        if other.serial.group_size.is_some() {
            self.serial.group_size = other.serial.group_size;
        }
        if other.serial.groups_per_line.is_some() {
            self.serial.groups_per_line = other.serial.groups_per_line;
        }

        if other.template.path.is_some() {
            self.template.path = other.template.path;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(path) = env.path(crate::constants::ENV_PRIVATE_KEY) {
            self.signer.private_key_path = Some(path);
        }
        if let Some(path) = env.path(crate::constants::ENV_OPENSSL) {
            self.signer.openssl_path = Some(path);
        }
        if let Some(path) = env.path(crate::constants::ENV_SCRIPT) {
            self.signer.script_path = Some(path);
        }
    }

    /// Generator options for the configured signer.
    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            private_key_path: self.signer.private_key_path.clone(),
            openssl_path: self.signer.openssl_path.clone(),
            script_path: self.signer.script_path.clone(),
            runner: None,
        }
    }
}
