//! Constructors and aggregation helpers for `StepConfigError`.

use std::path::Path;
use std::sync::Arc;

use figment::Error as FigmentError;

use super::{AggregatedErrors, MetadataError, StepConfigError};
use crate::sources::StoreUnavailable;

impl StepConfigError {
    /// Tries to build a [`StepConfigError`] from an iterator of errors.
    ///
    /// The iterator is consumed eagerly. It returns:
    /// * `None` when no errors are supplied;
    /// * the inner error when a single [`Arc`] is uniquely owned;
    /// * [`Self::Aggregate`] containing that single [`Arc`] when the error is already shared; and
    /// * [`Self::Aggregate`] combining every error for two or more inputs.
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        if arcs.is_empty() {
            return None;
        }
        Some(if arcs.len() == 1 {
            let last = arcs.pop()?;
            match Arc::try_unwrap(last) {
                Ok(err) => err,
                Err(shared) => Self::Aggregate(Box::new(AggregatedErrors::new(vec![shared]))),
            }
        } else {
            Self::Aggregate(Box::new(AggregatedErrors::new(arcs)))
        })
    }

    /// Construct a missing mandatory parameter error.
    ///
    /// # Examples
    ///
    /// ```
    /// use step_config::StepConfigError;
    /// let e = StepConfigError::mandatory_missing("deploy", "cfOrg");
    /// assert!(e.to_string().contains("cfOrg"));
    /// ```
    #[must_use]
    pub fn mandatory_missing(step: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MandatoryParameterMissing {
            step: step.into(),
            parameter: parameter.into(),
        }
    }

    /// Construct a metadata error for `step`.
    #[must_use]
    pub fn metadata(step: impl Into<String>, source: MetadataError) -> Self {
        Self::Metadata {
            step: step.into(),
            source,
        }
    }

    /// Construct a transport failure for the named store kind.
    #[must_use]
    pub const fn unreachable(store: &'static str, source: StoreUnavailable) -> Self {
        Self::SecretStoreUnreachable { store, source }
    }

    /// Construct a file error for `path`.
    #[must_use]
    pub fn file(path: &Path, err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::File {
            path: path.to_path_buf(),
            source: err.into(),
        }
    }

    /// Construct a gathering error from a [`figment::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use step_config::StepConfigError;
    /// let fe = figment::Error::from("boom");
    /// let e = StepConfigError::gathering(fe);
    /// assert!(matches!(e, StepConfigError::Gathering(_)));
    /// ```
    #[must_use]
    pub fn gathering(source: FigmentError) -> Self {
        Self::Gathering(Box::new(source))
    }
}
