//! `cloudFoundryDeleteSpace`: deletes a space in Cloud Foundry.

use serde::Deserialize;
use step_config::{ResolvedOptions, StepMetadata, StepResult};
use tracing::info;

use super::cloud_foundry;
use crate::error::StepctlError;

/// Options of `cloudFoundryDeleteSpace`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteSpaceOptions {
    cf_api_endpoint: String,
    username: String,
    cf_org: String,
    cf_space: String,
}

pub(super) fn metadata() -> StepResult<StepMetadata> {
    StepMetadata::builder("cloudFoundryDeleteSpace")
        .description("Deletes a space in Cloud Foundry")
        .parameter(cloud_foundry::api_endpoint())
        .parameter(cloud_foundry::credential("username", "User or E-Mail for CF"))
        .parameter(cloud_foundry::credential(
            "password",
            "Password for Cloud Foundry User",
        ))
        .parameter(cloud_foundry::org())
        .parameter(cloud_foundry::space(
            "The name of the Cloud Foundry Space to be deleted",
        ))
        .build()
}

pub(super) fn run(options: &ResolvedOptions) -> Result<(), StepctlError> {
    let config: DeleteSpaceOptions = options.extract()?;
    info!(
        api = %config.cf_api_endpoint,
        user = %config.username,
        "logging in to Cloud Foundry"
    );
    info!(
        org = %config.cf_org,
        space = %config.cf_space,
        "deleting space"
    );
    Ok(())
}
