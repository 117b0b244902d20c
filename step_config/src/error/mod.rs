//! Error types produced while declaring steps and resolving their parameters.

mod aggregate;
mod category;
mod constructors;
mod conversions;
mod types;

pub use aggregate::AggregatedErrors;
pub use category::ErrorCategory;
pub use types::{MetadataError, StepConfigError};
