//! Shared state for the parameter resolution scenarios.

use std::collections::BTreeMap;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use step_config::{
    CliValues, MemorySource, ResolvedOptions, SecretRegistry, StaticCredentialStore, StaticVault,
    StepResult,
};

/// Inputs gathered by `Given` steps and the outcome of the `When` step.
#[derive(Debug, Default, ScenarioState)]
pub struct ResolutionState {
    pub config: Slot<MemorySource>,
    pub environment: Slot<BTreeMap<String, String>>,
    pub cli: Slot<CliValues>,
    pub credentials: Slot<StaticCredentialStore>,
    pub vault: Slot<StaticVault>,
    pub registry: Slot<SecretRegistry>,
    pub outcome: Slot<StepResult<ResolvedOptions>>,
}

/// Fresh state for each scenario.
#[fixture]
pub fn resolution_state() -> ResolutionState {
    ResolutionState::default()
}
