//! `abapEnvironmentCreateSystem`: creates an ABAP Environment system through
//! a Cloud Foundry service instance.

use serde::Deserialize;
use step_config::{ParameterDescriptor, ResolvedOptions, Scope, StepMetadata, StepResult};
use tracing::{debug, info};

use super::cloud_foundry;
use crate::error::StepctlError;

/// Options of `abapEnvironmentCreateSystem`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSystemOptions {
    cf_api_endpoint: String,
    username: String,
    cf_org: String,
    cf_space: String,
    #[serde(default)]
    cf_service: Option<String>,
    #[serde(default)]
    cf_service_plan: Option<String>,
    #[serde(default)]
    cf_service_instance: Option<String>,
    #[serde(default)]
    service_manifest: Option<String>,
    #[serde(default)]
    abap_system_admin_email: Option<String>,
    abap_system_description: String,
    abap_system_is_development_allowed: bool,
    #[serde(rename = "abapSystemID")]
    abap_system_id: String,
    abap_system_size_of_persistence: i64,
    abap_system_size_of_runtime: i64,
    #[serde(default)]
    addon_descriptor_file_name: Option<String>,
    #[serde(default)]
    include_addon: bool,
}

fn optional(name: &str, description: &str) -> ParameterDescriptor {
    ParameterDescriptor::string(name)
        .all_scopes()
        .description(description)
}

pub(super) fn metadata() -> StepResult<StepMetadata> {
    StepMetadata::builder("abapEnvironmentCreateSystem")
        .description("Creates a SAP Cloud Platform ABAP Environment system (aka Steampunk system)")
        .parameter(cloud_foundry::api_endpoint())
        .parameter(cloud_foundry::vaulted_credential("username", "User or E-Mail for CF"))
        .parameter(cloud_foundry::vaulted_credential(
            "password",
            "Password for Cloud Foundry User",
        ))
        .parameter(cloud_foundry::org())
        .parameter(cloud_foundry::space("Cloud Foundry Space"))
        .parameter(
            optional(
                "cfService",
                "Cloud Foundry Service used for creating the service instance",
            )
            .alias("cloudFoundry/service"),
        )
        .parameter(
            optional("cfServicePlan", "Cloud Foundry Service Plan of the service instance")
                .alias("cloudFoundry/servicePlan"),
        )
        .parameter(
            optional("cfServiceInstance", "Name of the Cloud Foundry service instance")
                .alias("cloudFoundry/serviceInstance"),
        )
        .parameter(
            optional(
                "serviceManifest",
                "Path to a Cloud Foundry service manifest in YAML format",
            )
            .alias("cloudFoundry/serviceManifest")
            .alias("cfServiceManifest"),
        )
        .parameter(optional(
            "abapSystemAdminEmail",
            "Admin E-Mail address for the initial administrator of the system",
        ))
        .parameter(
            optional(
                "abapSystemDescription",
                "Description for the ABAP Environment system",
            )
            .default_value("Test system created by an automated pipeline"),
        )
        .parameter(
            ParameterDescriptor::bool("abapSystemIsDevelopmentAllowed")
                .all_scopes()
                .default_value(true)
                .description("Whether development is allowed on the system"),
        )
        .parameter(
            optional(
                "abapSystemID",
                "Three character name of the system, mapped to 'sapSystemName'",
            )
            .default_value("H02"),
        )
        .parameter(
            ParameterDescriptor::int("abapSystemSizeOfPersistence")
                .all_scopes()
                .default_value(0_i64)
                .description("The size of the persistence"),
        )
        .parameter(
            ParameterDescriptor::int("abapSystemSizeOfRuntime")
                .all_scopes()
                .default_value(0_i64)
                .description("The size of the runtime"),
        )
        .parameter(optional(
            "addonDescriptorFileName",
            "The file name of the addonDescriptor",
        ))
        .parameter(
            ParameterDescriptor::bool("includeAddon")
                .scopes([Scope::Parameters, Scope::Stages])
                .default_value(false)
                .description(
                    "Must be set to true to install the addon provided via 'addonDescriptorFileName'",
                ),
        )
        .build()
}

pub(super) fn run(options: &ResolvedOptions) -> Result<(), StepctlError> {
    let config: CreateSystemOptions = options.extract()?;
    info!(
        api = %config.cf_api_endpoint,
        user = %config.username,
        org = %config.cf_org,
        space = %config.cf_space,
        "logging in to Cloud Foundry"
    );
    if let Some(manifest) = &config.service_manifest {
        info!(manifest = %manifest, "creating service from manifest");
        return Ok(());
    }
    debug!(
        admin = config.abap_system_admin_email.as_deref().unwrap_or_default(),
        description = %config.abap_system_description,
        development_allowed = config.abap_system_is_development_allowed,
        size_of_persistence = config.abap_system_size_of_persistence,
        size_of_runtime = config.abap_system_size_of_runtime,
        addon = config.addon_descriptor_file_name.as_deref().unwrap_or_default(),
        include_addon = config.include_addon,
        "service parameters"
    );
    info!(
        service = config.cf_service.as_deref().unwrap_or_default(),
        plan = config.cf_service_plan.as_deref().unwrap_or_default(),
        instance = config.cf_service_instance.as_deref().unwrap_or_default(),
        system_id = %config.abap_system_id,
        "creating ABAP Environment system"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{metadata, run};
    use std::collections::BTreeMap;
    use step_config::{
        CliValues, ConfigurationResolver, MemorySource, ParamType, ParamValue, ReferenceKind,
        Scope, SecretRegistry,
    };

    #[test]
    fn credentials_search_store_then_vault() {
        let step = metadata().expect("metadata is valid");
        let username = step.parameter("username").expect("declared");
        let kinds: Vec<ReferenceKind> = username
            .references()
            .iter()
            .map(step_config::ResourceReference::kind)
            .collect();
        assert_eq!(kinds, [ReferenceKind::Secret, ReferenceKind::VaultSecret]);
    }

    #[test]
    fn declares_typed_defaults() {
        let step = metadata().expect("metadata is valid");
        let runtime = step.parameter("abapSystemSizeOfRuntime").expect("declared");
        assert_eq!(runtime.param_type(), ParamType::Int);
        assert_eq!(
            step.parameter("abapSystemID")
                .and_then(|parameter| parameter.declared_default()),
            Some(&ParamValue::from("H02"))
        );
    }

    #[test]
    fn credentials_resolve_after_org_and_space() {
        let step = metadata().expect("metadata is valid");
        let order: Vec<&str> = step
            .resolution_order()
            .map(|parameter| parameter.name())
            .collect();
        let position = |name: &str| order.iter().position(|candidate| *candidate == name);
        assert!(position("password") > position("cfOrg"));
        assert!(position("password") > position("cfSpace"));
    }

    #[test]
    fn manifest_aliases_are_current_names() {
        let step = metadata().expect("metadata is valid");
        let manifest = step.parameter("serviceManifest").expect("declared");
        let aliases: Vec<(&str, bool)> = manifest
            .aliases()
            .iter()
            .map(|alias| (alias.name(), alias.is_deprecated()))
            .collect();
        assert_eq!(
            aliases,
            [("cloudFoundry/serviceManifest", false), ("cfServiceManifest", false)]
        );
    }

    #[test]
    fn addon_flag_without_descriptor_still_runs() {
        let step = metadata().expect("metadata is valid");
        let config = MemorySource::new()
            .with(Scope::General, "cfOrg", "org1")
            .with(Scope::General, "cfSpace", "space1")
            .with(Scope::Parameters, "username", "robot")
            .with(Scope::Parameters, "password", "s3cret")
            .with(Scope::Stages, "includeAddon", true);
        let options = ConfigurationResolver::new(&step, &config, &BTreeMap::<String, String>::new())
            .resolve(&CliValues::new(), &SecretRegistry::new())
            .expect("parameters resolve");
        assert_eq!(options.bool("includeAddon"), Some(true));
        assert!(run(&options).is_ok());
    }
}
