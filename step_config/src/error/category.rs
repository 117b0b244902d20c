//! Error classification reported through telemetry and exit handling.

use std::fmt;

use serde::Serialize;

use super::StepConfigError;

/// Coarse classification of a failed step invocation.
///
/// Operators use the category to tell "the pipeline configuration is wrong"
/// apart from platform or runtime failures.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// No more specific classification applies.
    #[default]
    Undefined,
    /// Build tooling failed.
    Build,
    /// A compliance check failed.
    Compliance,
    /// Pipeline configuration or step metadata is invalid or incomplete.
    Configuration,
    /// Category supplied by a custom step.
    Custom,
    /// Infrastructure such as a secret store could not be reached.
    Infrastructure,
    /// A remote service rejected the request.
    Service,
    /// Tests executed by the step failed.
    Test,
}

impl ErrorCategory {
    /// Lower-case name used in telemetry payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Build => "build",
            Self::Compliance => "compliance",
            Self::Configuration => "configuration",
            Self::Custom => "custom",
            Self::Infrastructure => "infrastructure",
            Self::Service => "service",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StepConfigError {
    /// Classifies the error for telemetry.
    ///
    /// Store transport failures are infrastructure problems; everything else
    /// the resolver raises stems from configuration. An aggregate takes the
    /// infrastructure category when any member does.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SecretStoreUnreachable { .. } => ErrorCategory::Infrastructure,
            Self::Aggregate(errors) => errors.category(),
            _ => ErrorCategory::Configuration,
        }
    }

    /// Returns `true` when the error, or every member of an aggregate, reports
    /// a missing mandatory parameter.
    #[must_use]
    pub fn is_missing_parameter(&self) -> bool {
        match self {
            Self::MandatoryParameterMissing { .. } => true,
            Self::Aggregate(errors) => errors.only_missing_parameters(),
            _ => false,
        }
    }
}
