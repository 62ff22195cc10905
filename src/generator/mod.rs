//! License generation.
//!
//! [`Generator`] validates a [`LicenseRequest`], makes sure the signing tool
//! is recent enough, asks the signing helper for a serial, and renders the
//! serial with the request's model into the license template.
//!
//! The tool-version check runs once per generator. Its outcome is cached,
//! including a failed check: an unsupported tool stays unsupported for the
//! generator's lifetime. A check that could not run at all is retried on the
//! next call.

pub mod request;

pub use request::{LicenseRequest, Model};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::constants::{DEFAULT_OPENSSL, FIELD_NAME, FIELD_SERIAL, MIN_OPENSSL_VERSION};
use crate::runner::{Invocation, ProcessRunner, RunnerError, SystemRunner};
use crate::signer::{self, SignScript};
use crate::template::{self, DEFAULT_TEMPLATE, TemplateError};
use crate::version;

/// Errors from constructing a generator or generating a license.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("signing tool invocation failed: {0}")]
    ToolInvocation(#[from] RunnerError),

    #[error("signing tool version isn't supported, should be >= {minimum}")]
    UnsupportedToolVersion { minimum: &'static str },

    #[error(transparent)]
    Render(#[from] TemplateError),
}

impl GeneratorError {
    fn unsupported() -> Self {
        Self::UnsupportedToolVersion {
            minimum: MIN_OPENSSL_VERSION,
        }
    }
}

/// Construction options for a [`Generator`].
#[derive(Clone, Default)]
pub struct GeneratorOptions {
    /// Private key handed to the signing helper. Required.
    pub private_key_path: Option<PathBuf>,
    /// Signing tool executable. Defaults to `openssl` from `PATH`.
    pub openssl_path: Option<PathBuf>,
    /// Custom signing helper. Defaults to the built-in script.
    pub script_path: Option<PathBuf>,
    /// Process runner. Defaults to [`SystemRunner`].
    pub runner: Option<Arc<dyn ProcessRunner>>,
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn private_key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.private_key_path = Some(path.into());
        self
    }

    pub fn openssl_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.openssl_path = Some(path.into());
        self
    }

    pub fn script_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.script_path = Some(path.into());
        self
    }

    pub fn runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    fn is_empty(&self) -> bool {
        self.private_key_path.is_none() && self.openssl_path.is_none() && self.script_path.is_none()
    }
}

impl fmt::Debug for GeneratorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorOptions")
            .field("private_key_path", &self.private_key_path)
            .field("openssl_path", &self.openssl_path)
            .field("script_path", &self.script_path)
            .field("runner", &self.runner.as_ref().map(|_| "[custom]"))
            .finish()
    }
}

/// Signs data with an external tool and renders license text.
///
/// Safe to share across tasks behind an `Arc`. Two calls racing through the
/// first version check may both query the tool; each still gets the right
/// answer.
pub struct Generator {
    private_key_path: PathBuf,
    openssl_path: PathBuf,
    script: SignScript,
    runner: Arc<dyn ProcessRunner>,
    tool_checked: AtomicBool,
    tool_supported: AtomicBool,
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("private_key_path", &self.private_key_path)
            .field("openssl_path", &self.openssl_path)
            .field("script", &self.script)
            .field("tool_checked", &self.is_tool_checked())
            .field("tool_supported", &self.is_tool_supported())
            .finish()
    }
}

impl Generator {
    /// Validate `options` and build a generator.
    ///
    /// Only checks that the configured paths exist and are regular files.
    pub fn new(options: GeneratorOptions) -> Result<Self, GeneratorError> {
        if options.is_empty() {
            return Err(GeneratorError::Configuration(
                "no options are provided".to_string(),
            ));
        }

        let private_key_path = options.private_key_path.ok_or_else(|| {
            GeneratorError::Configuration("no private key path is specified".to_string())
        })?;
        check_file(&private_key_path, "private key")?;

        let openssl_path = match options.openssl_path {
            Some(path) => {
                check_file(&path, "openssl")?;
                path
            }
            None => PathBuf::from(DEFAULT_OPENSSL),
        };

        let script = match options.script_path {
            Some(path) => {
                check_file(&path, "signing script")?;
                SignScript::File(path)
            }
            None => SignScript::Builtin,
        };

        Ok(Self {
            private_key_path,
            openssl_path,
            script,
            runner: options.runner.unwrap_or_else(|| Arc::new(SystemRunner)),
            tool_checked: AtomicBool::new(false),
            tool_supported: AtomicBool::new(false),
        })
    }

    pub fn private_key_path(&self) -> &Path {
        &self.private_key_path
    }

    pub fn openssl_path(&self) -> &Path {
        &self.openssl_path
    }

    pub fn script(&self) -> &SignScript {
        &self.script
    }

    pub fn is_tool_checked(&self) -> bool {
        self.tool_checked.load(Ordering::Acquire)
    }

    pub fn is_tool_supported(&self) -> bool {
        self.tool_supported.load(Ordering::Acquire)
    }

    /// Ensure the signing tool is at least [`MIN_OPENSSL_VERSION`].
    ///
    /// Queries `<openssl> version` the first time and answers from the
    /// cached result afterwards.
    pub async fn check_tool(&self) -> Result<(), GeneratorError> {
        if self.is_tool_checked() {
            return if self.is_tool_supported() {
                Ok(())
            } else {
                Err(GeneratorError::unsupported())
            };
        }

        let query = Invocation::new(&self.openssl_path).arg("version");
        let output = self.runner.run(&query).await?;
        let supported = version::is_tool_version_supported(&output);

        self.tool_supported.store(supported, Ordering::Release);
        self.tool_checked.store(true, Ordering::Release);

        if supported {
            tracing::debug!(output = output.trim(), "signing tool version supported");
            Ok(())
        } else {
            tracing::warn!(
                output = output.trim(),
                minimum = MIN_OPENSSL_VERSION,
                "signing tool version not supported"
            );
            Err(GeneratorError::unsupported())
        }
    }

    /// Sign `sign_this` and return the cleaned serial, without the version check.
    pub async fn generate_serial(&self, sign_this: &str) -> Result<String, GeneratorError> {
        let serial = signer::sign(
            self.runner.as_ref(),
            &self.script,
            &self.openssl_path,
            &self.private_key_path,
            sign_this,
        )
        .await?;
        Ok(serial)
    }

    /// Generate a license for `request`.
    ///
    /// Without a template the built-in one is used. `name` defaults to the
    /// signed data when the request has no model or no template and the
    /// model doesn't set it.
    pub async fn generate_license(&self, request: LicenseRequest) -> Result<String, GeneratorError> {
        let LicenseRequest {
            sign_this,
            template,
            model,
        } = request;

        if sign_this.is_empty() {
            return Err(request::invalid_sign_this());
        }

        let model_given = model.is_some();
        let mut model = model.unwrap_or_default();
        let serial_format = model.take_serial_format()?;

        let template = template.filter(|t| !t.is_empty());
        let uses_default = template.is_none();
        if (uses_default || !model_given) && !model.contains(FIELD_NAME) {
            model.insert(FIELD_NAME, sign_this.as_str());
        }

        self.check_tool().await?;
        let raw = self.generate_serial(&sign_this).await?;

        let serial = match serial_format {
            Some(format) => format(&raw),
            None => raw,
        };
        model.insert(FIELD_SERIAL, serial);

        let license = template::render(
            template.as_deref().unwrap_or(DEFAULT_TEMPLATE),
            &model.into_data(),
        )?;
        tracing::debug!(default_template = uses_default, "rendered license");
        Ok(license)
    }
}

fn check_file(path: &Path, what: &str) -> Result<(), GeneratorError> {
    let meta = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GeneratorError::Configuration(format!("{what} doesn't exist: {}", path.display()))
        } else {
            GeneratorError::Configuration(format!("cannot access {what} {}: {e}", path.display()))
        }
    })?;
    if !meta.is_file() {
        return Err(GeneratorError::Configuration(format!(
            "{what} isn't a file: {}",
            path.display()
        )));
    }
    Ok(())
}
