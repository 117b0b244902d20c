//! Several resolution failures reported together.

use std::{error::Error, fmt, sync::Arc};

use super::{ErrorCategory, StepConfigError};

/// Failures collected during one resolution pass, in the order they arose.
///
/// The resolver keeps going after a mandatory parameter turns out to be
/// missing, so a single run can name every gap at once.
///
/// # Examples
///
/// ```
/// use step_config::StepConfigError;
/// let e = StepConfigError::try_aggregate(vec![
///     StepConfigError::mandatory_missing("deploy", "cfOrg"),
///     StepConfigError::mandatory_missing("deploy", "cfSpace"),
/// ]);
/// if let Some(StepConfigError::Aggregate(agg)) = e {
///     assert_eq!(agg.missing_parameters().collect::<Vec<_>>(), ["cfOrg", "cfSpace"]);
/// }
/// ```
#[derive(Debug, Default)]
pub struct AggregatedErrors(Vec<Arc<StepConfigError>>);

impl AggregatedErrors {
    /// Wraps `errors`, keeping their order.
    #[must_use]
    pub const fn new(errors: Vec<Arc<StepConfigError>>) -> Self {
        Self(errors)
    }

    /// Iterates over the collected failures.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> impl Iterator<Item = &StepConfigError> {
        self.0.iter().map(Arc::as_ref)
    }

    /// Names of the mandatory parameters reported missing, nested aggregates
    /// included.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn missing_parameters(&self) -> impl Iterator<Item = &str> {
        self.iter().flat_map(missing_in)
    }

    /// Number of collected failures.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing was collected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Infrastructure when any member is, configuration otherwise.
    pub(crate) fn category(&self) -> ErrorCategory {
        if self
            .iter()
            .any(|err| err.category() == ErrorCategory::Infrastructure)
        {
            ErrorCategory::Infrastructure
        } else {
            ErrorCategory::Configuration
        }
    }

    /// `true` when there is at least one member and every one of them is a
    /// missing mandatory parameter.
    pub(crate) fn only_missing_parameters(&self) -> bool {
        !self.is_empty() && self.iter().all(StepConfigError::is_missing_parameter)
    }
}

fn missing_in(err: &StepConfigError) -> Box<dyn Iterator<Item = &str> + '_> {
    match err {
        StepConfigError::MandatoryParameterMissing { parameter, .. } => {
            Box::new(std::iter::once(parameter.as_str()))
        }
        StepConfigError::Aggregate(inner) => Box::new(inner.missing_parameters()),
        _ => Box::new(std::iter::empty()),
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} problems:", self.len())?;
        for err in self.iter() {
            write!(f, "\n  - {err}")?;
        }
        Ok(())
    }
}

impl Error for AggregatedErrors {}
