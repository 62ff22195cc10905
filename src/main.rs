//! license-key: signed software license key generator.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use license_key::config::Config;
use license_key::constants;
use license_key::env::Env;
use license_key::serial;
use license_key::template;
use license_key::{Generator, LicenseRequest, Model};

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use cli::args::{CheckArgs, Cli, Command, GenerateArgs};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    cli::init_tracing(cli.verbose);

    match cli.command {
        Command::Generate(args) => run_generate(*args, cli.config).await,
        Command::Check(args) => run_check(args, cli.config).await,
        Command::Template => run_template(),
        Command::Version => run_version(),
    }
}

/// Print detailed version and build information.
fn run_version() -> Result<()> {
    use colored::Colorize;

    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    println!("{}     {}", "target:".dimmed(), constants::TARGET);
    println!(
        "{}    openssl >= {}",
        "requires:".dimmed(),
        constants::MIN_OPENSSL_VERSION
    );
    Ok(())
}

/// Print the built-in template.
fn run_template() -> Result<()> {
    print!("{}", template::DEFAULT_TEMPLATE);
    Ok(())
}

/// Load the layered config from the working directory.
fn load_config(explicit: Option<&std::path::Path>) -> Result<Config> {
    let cwd = std::env::current_dir().context("could not determine working directory")?;
    let global = Config::global_config_path();
    Config::load(explicit, Some(&cwd), global.as_deref(), &Env::real())
        .context("failed to load configuration")
}

/// Verify the signing tool version.
async fn run_check(args: CheckArgs, config_path: Option<std::path::PathBuf>) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    args.signer.apply(&mut config);

    let generator =
        Generator::new(config.generator_options()).context("invalid signer configuration")?;
    generator
        .check_tool()
        .await
        .with_context(|| format!("{} check failed", generator.openssl_path().display()))?;

    cli::print_success(&format!(
        "{} is supported (>= {})",
        generator.openssl_path().display(),
        constants::MIN_OPENSSL_VERSION,
    ));
    Ok(())
}

/// Sign data and render a license.
async fn run_generate(args: GenerateArgs, config_path: Option<std::path::PathBuf>) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    args.apply(&mut config);

    let generator =
        Generator::new(config.generator_options()).context("invalid signer configuration")?;

    let template = match config.template.path {
        Some(ref path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read template {}", path.display()))?,
        ),
        None => None,
    };

    let mut model = match args.model {
        Some(ref path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read model {}", path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse model {}", path.display()))?;
            Some(Model::from_json(value).with_context(|| format!("invalid model {}", path.display()))?)
        }
        None => None,
    };

    let columns = config.serial.columns();
    let has_overrides = !args.fields.is_empty() || args.name.is_some() || columns.is_some();
    if has_overrides {
        let m = model.get_or_insert_with(Model::new);
        for (key, value) in &args.fields {
            m.insert(key.as_str(), value.as_str());
        }
        if let Some(ref name) = args.name {
            m.insert(constants::FIELD_NAME, name.as_str());
        }
        if let Some((group_size, groups_per_line)) = columns {
            m.set_serial_format(serial::columns(group_size, groups_per_line));
        }
    }

    let request = LicenseRequest {
        sign_this: args.sign_this,
        template,
        model,
    };
    let display_name = request.display_name();

    let license = generator
        .generate_license(request)
        .await
        .context("license generation failed")?;

    match args.output {
        Some(ref path) => {
            tokio::fs::write(path, &license)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            cli::print_success(&format!(
                "License for {display_name} written to {}",
                path.display()
            ));
        }
        None => print!("{license}"),
    }

    Ok(())
}
