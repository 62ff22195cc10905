//! Signing invocation.
//!
//! The signature itself comes from a helper script called as
//! `<script> <openssl> <private-key> <data>`, the data passed as a single
//! argument exactly as given. The script's
//! standard output is reduced to the raw serial by [`crate::serial::clean`].

use std::path::{Path, PathBuf};

use crate::constants::SIGN_SCRIPT_NAME;
use crate::runner::{Invocation, ProcessRunner, RunnerError};
use crate::serial;

/// Built-in signing helper, embedded at compile time.
pub const BUILTIN_SCRIPT: &str = include_str!("../scripts/sign.sh");

/// Which helper script performs the signing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SignScript {
    /// Run [`BUILTIN_SCRIPT`] through `sh -c`.
    #[default]
    Builtin,
    /// Execute a script file directly.
    File(PathBuf),
}

/// Build the helper invocation for `sign_this`.
///
/// Both variants pass the same three positional arguments; the built-in one
/// goes through `sh -c <script> <$0>` so `$1..$3` line up.
pub fn sign_invocation(
    script: &SignScript,
    openssl: &Path,
    private_key: &Path,
    sign_this: &str,
) -> Invocation {
    let base = match script {
        SignScript::Builtin => Invocation::new("sh")
            .arg("-c")
            .arg(BUILTIN_SCRIPT)
            .arg(SIGN_SCRIPT_NAME),
        SignScript::File(path) => Invocation::new(path),
    };
    base.arg(openssl).arg(private_key).arg(sign_this)
}

/// Sign `sign_this` and return the cleaned raw serial.
pub async fn sign(
    runner: &dyn ProcessRunner,
    script: &SignScript,
    openssl: &Path,
    private_key: &Path,
    sign_this: &str,
) -> Result<String, RunnerError> {
    let invocation = sign_invocation(script, openssl, private_key, sign_this);
    let stdout = runner.run(&invocation).await?;
    let raw = serial::clean(&stdout);
    if raw.is_empty() {
        tracing::warn!("signing helper produced no output");
    }
    tracing::debug!(len = raw.len(), "generated raw serial");
    Ok(raw)
}
