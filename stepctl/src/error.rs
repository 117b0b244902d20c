//! Error types for `stepctl`.

use std::process::ExitCode;
use std::sync::Arc;

use step_config::{ErrorCategory, StepConfigError};
use thiserror::Error;

/// Errors surfaced while running a step.
#[derive(Debug, Error)]
pub enum StepctlError {
    /// Loading configuration or resolving parameters failed.
    #[error(transparent)]
    Config(#[from] Arc<StepConfigError>),

    /// `--parameters-json` was not a JSON object.
    #[error("invalid --parameters-json: {0}")]
    ParametersJson(String),

    /// The subcommand does not name a shipped step.
    #[error("unknown step '{0}'")]
    UnknownStep(String),
}

impl StepctlError {
    /// Category reported through telemetry.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(err) => err.category(),
            Self::ParametersJson(_) => ErrorCategory::Configuration,
            Self::UnknownStep(_) => ErrorCategory::Undefined,
        }
    }

    /// Process exit status: `2` for missing mandatory parameters, which are
    /// usage errors, otherwise `1`.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(err) if err.is_missing_parameter() => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}
