//! Binds the parameter resolution feature file to the step registry.

use crate::fixtures::{ResolutionState, resolution_state};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/parameter_resolution.feature",
    fixtures = [resolution_state: ResolutionState]
);
