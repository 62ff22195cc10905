//! External process invocation.
//!
//! Every process the generator starts (the version query and the signing
//! helper) goes through [`ProcessRunner`], so tests can swap in a
//! deterministic stub instead of spawning OpenSSL.

use std::ffi::OsString;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from running an external process.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("{program} output is not valid UTF-8")]
    InvalidOutput { program: String },
}

/// A program and its arguments, passed verbatim (no shell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Program name for log lines and error messages.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs an [`Invocation`] to completion and returns its standard output.
///
/// A non-zero exit status is an error.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<String, RunnerError>;
}

/// [`ProcessRunner`] backed by `tokio::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<String, RunnerError> {
        let program = invocation.program_name();
        tracing::debug!(command = %invocation, "running external process");

        let output = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| RunnerError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RunnerError::Failed {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| RunnerError::InvalidOutput { program })
    }
}
