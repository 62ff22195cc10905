//! license-key: signed software license key generator (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod config;
pub mod constants;
pub mod env;
pub mod generator;
pub mod runner;
pub mod serial;
pub mod signer;
pub mod template;
pub mod version;

pub use generator::{Generator, GeneratorError, GeneratorOptions, LicenseRequest, Model};
