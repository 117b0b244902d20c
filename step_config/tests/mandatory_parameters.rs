//! Reporting of mandatory parameters that stay unset.

mod common;

use std::collections::BTreeMap;

use common::cloud_foundry_step;
use step_config::{
    CliValues, ConfigurationResolver, ErrorCategory, MemorySource, Scope, SecretRegistry,
    StepConfigError,
};

fn missing_parameters(err: &StepConfigError) -> Vec<String> {
    match err {
        StepConfigError::MandatoryParameterMissing { parameter, .. } => vec![parameter.clone()],
        StepConfigError::Aggregate(errors) => {
            errors.missing_parameters().map(str::to_owned).collect()
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn every_missing_parameter_is_reported_in_declaration_order() {
    let step = cloud_foundry_step();
    let config = MemorySource::new().with(Scope::General, "cfOrg", "org1");
    let err = ConfigurationResolver::new(&step, &config, &BTreeMap::<String, String>::new())
        .resolve(&CliValues::new(), &SecretRegistry::new())
        .expect_err("credentials and space are missing");

    assert!(err.is_missing_parameter());
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert_eq!(missing_parameters(&err), ["username", "password", "cfSpace"]);
}

#[test]
fn single_missing_parameter_is_not_wrapped() {
    let step = cloud_foundry_step();
    let config = MemorySource::new()
        .with(Scope::General, "cfOrg", "org1")
        .with(Scope::Parameters, "username", "robot")
        .with(Scope::Parameters, "password", "s3cret");
    let err = ConfigurationResolver::new(&step, &config, &BTreeMap::<String, String>::new())
        .resolve(&CliValues::new(), &SecretRegistry::new())
        .expect_err("space is missing");

    assert_eq!(
        err.to_string(),
        "mandatory parameter 'cfSpace' of step 'abapEnvironmentCreateSystem' is not set"
    );
}

#[test]
fn explicit_empty_value_does_not_satisfy_mandatory_parameter() {
    let step = cloud_foundry_step();
    let config = MemorySource::new()
        .with(Scope::General, "cfOrg", "org1")
        .with(Scope::General, "cfSpace", "space1")
        .with(Scope::Parameters, "username", "robot")
        .with(Scope::Parameters, "password", "s3cret");
    let cli = CliValues::new().insert("cfOrg", "");
    let err = ConfigurationResolver::new(&step, &config, &BTreeMap::<String, String>::new())
        .resolve(&cli, &SecretRegistry::new())
        .expect_err("empty command-line value wins and is empty");

    assert_eq!(missing_parameters(&err), ["cfOrg"]);
}

#[test]
fn error_messages_never_contain_values() {
    let step = cloud_foundry_step();
    let config = MemorySource::new()
        .with(Scope::General, "cfOrg", "org1")
        .with(Scope::General, "cfSpace", "space1")
        .with(Scope::Parameters, "username", "robot")
        .with(Scope::Parameters, "password", "s3cret")
        .with(Scope::General, "abapSystemSizeOfRuntime", "hunter2");
    let err = ConfigurationResolver::new(&step, &config, &BTreeMap::<String, String>::new())
        .resolve(&CliValues::new(), &SecretRegistry::new())
        .expect_err("size is not an integer");

    let message = err.to_string();
    assert!(message.contains("abapSystemSizeOfRuntime"));
    assert!(message.contains("GENERAL configuration key"), "{message}");
    assert!(!message.contains("hunter2"));
}
