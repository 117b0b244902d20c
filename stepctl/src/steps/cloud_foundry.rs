//! Parameters shared by steps that talk to Cloud Foundry.

use step_config::{ParameterDescriptor, Scope};

/// Vault locations searched for Cloud Foundry credentials, most specific first.
pub(super) const CREDENTIAL_VAULT_PATHS: [&str; 3] = [
    "$(vaultPath)/cloudfoundry-$(cfOrg)-$(cfSpace)",
    "$(vaultBasePath)/$(vaultPipelineName)/cloudfoundry-$(cfOrg)-$(cfSpace)",
    "$(vaultBasePath)/GROUP-SECRETS/cloudfoundry-$(cfOrg)-$(cfSpace)",
];

const CREDENTIALS_ID: &str = "cfCredentialsId";

const CREDENTIAL_SCOPES: [Scope; 3] = [Scope::Parameters, Scope::Stages, Scope::Steps];

pub(super) fn api_endpoint() -> ParameterDescriptor {
    ParameterDescriptor::string("cfApiEndpoint")
        .mandatory()
        .all_scopes()
        .alias("cloudFoundry/apiEndpoint")
        .default_value("https://api.cf.eu10.hana.ondemand.com")
        .description("Cloud Foundry API endpoint")
}

/// `username` or `password`, read from the `cfCredentialsId` credential.
pub(super) fn credential(field: &str, description: &str) -> ParameterDescriptor {
    ParameterDescriptor::string(field)
        .mandatory()
        .scopes(CREDENTIAL_SCOPES)
        .secret_reference(CREDENTIALS_ID, field)
        .secret()
        .description(description)
}

/// Like [`credential`], additionally searching the vault.
pub(super) fn vaulted_credential(field: &str, description: &str) -> ParameterDescriptor {
    credential(field, description).vault_reference(CREDENTIAL_VAULT_PATHS)
}

pub(super) fn org() -> ParameterDescriptor {
    ParameterDescriptor::string("cfOrg")
        .mandatory()
        .all_scopes()
        .alias("cloudFoundry/org")
        .description("Cloud Foundry org")
}

pub(super) fn space(description: &str) -> ParameterDescriptor {
    ParameterDescriptor::string("cfSpace")
        .mandatory()
        .all_scopes()
        .alias("cloudFoundry/space")
        .description(description)
}
