//! Shared fixtures for `step_config` integration tests.
//!
//! Provides a Cloud Foundry style step declaration and recording fakes for
//! the credential store and vault so tests can assert which lookups ran.

pub mod fakes;

use step_config::{ParameterDescriptor, Scope, StepMetadata};

/// Vault paths tried for Cloud Foundry credentials, in priority order.
pub const CF_VAULT_PATHS: [&str; 3] = [
    "$(vaultPath)/cloudfoundry-$(cfOrg)-$(cfSpace)",
    "$(vaultBasePath)/$(vaultPipelineName)/cloudfoundry-$(cfOrg)-$(cfSpace)",
    "$(vaultBasePath)/GROUP-SECRETS/cloudfoundry-$(cfOrg)-$(cfSpace)",
];

fn credential(name: &str) -> ParameterDescriptor {
    ParameterDescriptor::string(name)
        .mandatory()
        .scopes([Scope::Parameters, Scope::Stages, Scope::Steps])
        .secret_reference("cfCredentialsId", name)
        .vault_reference(CF_VAULT_PATHS)
}

/// A step declaring the usual Cloud Foundry connection parameters.
///
/// Credentials are declared before `cfOrg` and `cfSpace` so that tests
/// exercise dependency ordering.
pub fn cloud_foundry_step() -> StepMetadata {
    StepMetadata::builder("abapEnvironmentCreateSystem")
        .parameter(
            ParameterDescriptor::string("cfApiEndpoint")
                .mandatory()
                .all_scopes()
                .alias("cloudFoundry/apiEndpoint")
                .default_value("https://api.cf.eu10.hana.ondemand.com"),
        )
        .parameter(credential("username"))
        .parameter(credential("password"))
        .parameter(
            ParameterDescriptor::string("cfOrg")
                .mandatory()
                .all_scopes()
                .alias("cloudFoundry/org"),
        )
        .parameter(
            ParameterDescriptor::string("cfSpace")
                .mandatory()
                .all_scopes()
                .alias("cloudFoundry/space"),
        )
        .parameter(
            ParameterDescriptor::string("serviceManifest")
                .all_scopes()
                .alias("cloudFoundry/serviceManifest")
                .deprecated_alias("cfServiceManifest"),
        )
        .parameter(ParameterDescriptor::bool("includeAddon").scopes([Scope::Parameters, Scope::Stages]))
        .parameter(
            ParameterDescriptor::int("abapSystemSizeOfRuntime")
                .all_scopes()
                .default_value(0_i64),
        )
        .build()
        .expect("cloud foundry metadata is valid")
}
