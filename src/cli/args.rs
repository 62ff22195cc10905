//! Clap argument types and validation.

use clap::Parser;
use std::path::PathBuf;

use license_key::config::Config;

/// Generate signed software license keys.
#[derive(Parser, Debug)]
#[command(
    name = "license-key",
    version = license_key::constants::VERSION,
    about = super::ABOUT,
)]
pub struct Cli {
    /// Config file to use instead of ./.license-key.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). Overrides RUST_LOG.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Sign data and render a license.
    Generate(Box<GenerateArgs>),

    /// Check that the signing tool is installed and recent enough.
    Check(CheckArgs),

    /// Print the built-in license template.
    Template,

    /// Print version and build information.
    Version,
}

/// Signing tool and key overrides shared by several commands.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct SignerArgs {
    /// Private key used for signing.
    #[arg(long, short = 'k')]
    pub key: Option<PathBuf>,

    /// Path to the openssl executable (default: `openssl` on PATH).
    #[arg(long)]
    pub openssl: Option<PathBuf>,

    /// Custom signing script, called as `<script> <openssl> <key> <data>`.
    #[arg(long)]
    pub script: Option<PathBuf>,
}

impl SignerArgs {
    /// Apply CLI overrides on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref key) = self.key {
            config.signer.private_key_path = Some(key.clone());
        }
        if let Some(ref openssl) = self.openssl {
            config.signer.openssl_path = Some(openssl.clone());
        }
        if let Some(ref script) = self.script {
            config.signer.script_path = Some(script.clone());
        }
    }
}

/// Arguments for the `check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub signer: SignerArgs,
}

/// Arguments for the `generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Data to sign, e.g. "Jane Doe | jane@example.com".
    pub sign_this: String,

    #[command(flatten)]
    pub signer: SignerArgs,

    // --- Template & model ---
    /// Handlebars template file (default: built-in template).
    #[arg(long, short = 't')]
    pub template: Option<PathBuf>,

    /// JSON file with template fields.
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,

    /// Extra template field, repeatable. Overrides --model entries.
    #[arg(long = "field", short = 'f', value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Name shown on the license (default: the signed data).
    #[arg(long)]
    pub name: Option<String>,

    // --- Serial layout ---
    /// Characters per serial group.
    #[arg(long)]
    pub group_size: Option<usize>,

    /// Serial groups per line.
    #[arg(long)]
    pub groups_per_line: Option<usize>,

    // --- Output ---
    /// Write the license to a file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    /// Apply serial layout overrides on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        self.signer.apply(config);
        if self.group_size.is_some() {
            config.serial.group_size = self.group_size;
        }
        if self.groups_per_line.is_some() {
            config.serial.groups_per_line = self.groups_per_line;
        }
        if let Some(ref template) = self.template {
            config.template.path = Some(template.clone());
        }
    }
}

/// Parse a `KEY=VALUE` template field.
fn parse_field(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in `{s}`"));
    }
    if key == license_key::constants::FIELD_SERIAL_FORMAT {
        return Err(format!("`{key}` is reserved"));
    }
    Ok((key.to_string(), value.to_string()))
}
