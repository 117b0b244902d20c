//! The steps shipped with `stepctl`.
//!
//! Each step pairs its declarative parameter table with a body that receives
//! the resolved options.

mod abap_environment_create_system;
mod cloud_foundry;
mod cloud_foundry_delete_space;

use step_config::{ResolvedOptions, StepMetadata, StepResult};
use tracing::debug;

use crate::error::StepctlError;

/// Body of a step, run once its parameters have resolved.
pub type StepBody = fn(&ResolvedOptions) -> Result<(), StepctlError>;

/// A step's metadata together with its body.
#[derive(Debug)]
pub struct StepEntry {
    metadata: StepMetadata,
    body: StepBody,
}

impl StepEntry {
    /// Pairs `metadata` with `body`.
    #[must_use]
    pub const fn new(metadata: StepMetadata, body: StepBody) -> Self {
        Self { metadata, body }
    }

    /// Parameter table of the step.
    #[must_use]
    pub const fn metadata(&self) -> &StepMetadata {
        &self.metadata
    }

    /// Runs the body with resolved `options`.
    ///
    /// # Errors
    ///
    /// Propagates the body's failure.
    pub fn run(&self, options: &ResolvedOptions) -> Result<(), StepctlError> {
        debug!(step = options.step(), parameters = options.len(), "running step body");
        (self.body)(options)
    }
}

/// Every shipped step, in subcommand order.
///
/// # Errors
///
/// Returns an error when a step's metadata fails validation.
pub fn catalogue() -> StepResult<Vec<StepEntry>> {
    Ok(vec![
        StepEntry::new(
            abap_environment_create_system::metadata()?,
            abap_environment_create_system::run,
        ),
        StepEntry::new(
            cloud_foundry_delete_space::metadata()?,
            cloud_foundry_delete_space::run,
        ),
    ])
}

/// Finds the step called `name`, by its name or one of its aliases.
#[must_use]
pub fn find<'a>(steps: &'a [StepEntry], name: &str) -> Option<&'a StepEntry> {
    steps.iter().find(|entry| {
        let metadata = entry.metadata();
        metadata.name() == name || metadata.aliases().iter().any(|alias| alias == name)
    })
}
