//! Trait-based conversions between external error types and `StepConfigError`.

use figment::Error as FigmentError;

use super::StepConfigError;

impl From<FigmentError> for StepConfigError {
    fn from(e: FigmentError) -> Self {
        Self::Gathering(e.into())
    }
}

impl From<serde_json::Error> for StepConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Extraction(e)
    }
}
