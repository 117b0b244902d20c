//! Extension for mapping errors to `StepResult` concisely.
//!
//! Reduces repetitive `.map_err(|e| Arc::new(StepConfigError::from(e)))`
//! chains when converting external error types into the crate's
//! `StepResult<T>` alias (`Result<T, Arc<StepConfigError>>`).
//!
//! # Examples
//!
//! ```
//! use step_config::{StepResult, StepResultExt};
//!
//! fn parse(raw: &str) -> StepResult<serde_json::Value> {
//!     // serde_json::Error implements Into<StepConfigError>
//!     serde_json::from_str(raw).into_step()
//! }
//!
//! assert!(parse("{").is_err());
//! ```

use std::sync::Arc;

use crate::{StepConfigError, StepResult};

/// Generic extension for mapping any `Result<T, E>` with
/// `E: Into<StepConfigError>` into a `StepResult<T>`.
pub trait StepResultExt<T, E> {
    /// Convert `Result<T, E>` into `StepResult<T>` using `Into<StepConfigError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<StepConfigError>`.
    fn into_step(self) -> StepResult<T>;
}

impl<T, E> StepResultExt<T, E> for Result<T, E>
where
    E: Into<StepConfigError>,
{
    fn into_step(self) -> StepResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
