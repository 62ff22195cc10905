//! CLI command definitions, logging setup and status output.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use tracing_subscriber::EnvFilter;

/// Help text shown by `--help`.
pub const ABOUT: &str = "Sign data with OpenSSL and render it into a license key.";

/// Install the stderr log subscriber.
///
/// `-v` flags win over `RUST_LOG`; without either only warnings are shown.
pub fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("license_key=debug,warn"),
        _ => EnvFilter::new("license_key=trace,info"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Print a green check line to stderr.
pub fn print_success(message: &str) {
    use colored::Colorize;
    eprintln!("  {} {}", "✔".green().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_twice_does_not_panic() {
        init_tracing(1);
        init_tracing(0);
    }

    #[test]
    fn about_is_non_empty() {
        assert!(ABOUT.contains("license"));
    }
}
