//! Step implementations for the parameter resolution scenarios.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow, bail, ensure};
use rstest_bdd_macros::{given, then, when};
use step_config::{
    CliValues, ConfigurationResolver, ErrorCategory, MemorySource, Scope, SecretRegistry,
    StaticCredentialStore, StaticVault, StepConfigError,
};

use crate::common::cloud_foundry_step;
use crate::fixtures::ResolutionState;

fn scope_named(name: &str) -> Result<Scope> {
    match name {
        "step" => Ok(Scope::Steps),
        "stage" => Ok(Scope::Stages),
        "parameters" => Ok(Scope::Parameters),
        "general" => Ok(Scope::General),
        other => bail!("unknown scope {other}"),
    }
}

fn configure(state: &ResolutionState, scope: Scope, key: &str, value: &str) {
    let source = state.config.take().unwrap_or_default();
    state.config.set(source.with(scope, key, value));
}

fn missing_parameters(err: &StepConfigError) -> Vec<String> {
    match err {
        StepConfigError::MandatoryParameterMissing { parameter, .. } => vec![parameter.clone()],
        StepConfigError::Aggregate(errors) => {
            errors.missing_parameters().map(str::to_owned).collect()
        }
        _ => Vec::new(),
    }
}

#[given("a configuration with org {org} and space {space}")]
fn connection(resolution_state: &ResolutionState, org: String, space: String) {
    configure(resolution_state, Scope::General, "cfOrg", &org);
    configure(resolution_state, Scope::General, "cfSpace", &space);
}

#[given("robot credentials are passed as parameters")]
fn robot_credentials(resolution_state: &ResolutionState) {
    configure(resolution_state, Scope::Parameters, "username", "robot-user");
    configure(resolution_state, Scope::Parameters, "password", "robot-pass");
}

#[given("the {scope} scope sets {key} to {value}")]
fn scope_value(
    resolution_state: &ResolutionState,
    scope: String,
    key: String,
    value: String,
) -> Result<()> {
    configure(resolution_state, scope_named(&scope)?, &key, &value);
    Ok(())
}

#[given("the command line sets {name} to {value}")]
fn command_line_value(resolution_state: &ResolutionState, name: String, value: String) {
    let cli = resolution_state.cli.take().unwrap_or_default();
    resolution_state.cli.set(cli.insert(name, value));
}

#[given("the environment variable {variable} is {value}")]
fn environment_value(resolution_state: &ResolutionState, variable: String, value: String) {
    let mut environment = resolution_state.environment.take().unwrap_or_default();
    environment.insert(variable, value);
    resolution_state.environment.set(environment);
}

#[given("the credential {id} has {field} set to {value}")]
fn credential_value(resolution_state: &ResolutionState, id: String, field: String, value: String) {
    let store = resolution_state.credentials.take().unwrap_or_default();
    resolution_state.credentials.set(store.insert(id, field, value));
}

#[given("the vault entry {path} has {field} set to {value}")]
fn vault_value(resolution_state: &ResolutionState, path: String, field: String, value: String) {
    let vault = resolution_state.vault.take().unwrap_or_default();
    resolution_state.vault.set(vault.insert(path, field, value));
}

#[when("the parameters are resolved")]
fn resolve(resolution_state: &ResolutionState) {
    let step = cloud_foundry_step();
    let config: MemorySource = resolution_state.config.take().unwrap_or_default();
    let environment: BTreeMap<String, String> =
        resolution_state.environment.take().unwrap_or_default();
    let cli: CliValues = resolution_state.cli.take().unwrap_or_default();
    let credentials: StaticCredentialStore =
        resolution_state.credentials.take().unwrap_or_default();
    let vault: StaticVault = resolution_state.vault.take().unwrap_or_default();
    let registry = SecretRegistry::new();
    let outcome = ConfigurationResolver::new(&step, &config, &environment)
        .with_credentials(&credentials)
        .with_vault(&vault)
        .resolve(&cli, &registry);
    resolution_state.registry.set(registry);
    resolution_state.outcome.set(outcome);
}

#[then("the parameter {name} resolves to {expected}")]
fn resolves_to(resolution_state: &ResolutionState, name: String, expected: String) -> Result<()> {
    let outcome = resolution_state
        .outcome
        .get()
        .ok_or_else(|| anyhow!("parameters were not resolved"))?;
    let options = outcome.map_err(|err| anyhow!("resolution failed: {err}"))?;
    let actual = options
        .get(&name)
        .ok_or_else(|| anyhow!("parameter {name} is unset"))?
        .to_string();
    ensure!(actual == expected, "{name} resolved to {actual}; expected {expected}");
    Ok(())
}

#[then("the parameter {name} is unset")]
fn is_unset(resolution_state: &ResolutionState, name: String) -> Result<()> {
    let outcome = resolution_state
        .outcome
        .get()
        .ok_or_else(|| anyhow!("parameters were not resolved"))?;
    let options = outcome.map_err(|err| anyhow!("resolution failed: {err}"))?;
    ensure!(!options.contains(&name), "{name} unexpectedly resolved");
    Ok(())
}

#[then("the value {value} is registered as a secret")]
fn registered(resolution_state: &ResolutionState, value: String) -> Result<()> {
    let registry = resolution_state
        .registry
        .get()
        .ok_or_else(|| anyhow!("parameters were not resolved"))?;
    ensure!(registry.is_registered(&value), "{value} is not registered");
    Ok(())
}

#[then("resolution fails for missing parameters {names}")]
fn fails_for_missing(resolution_state: &ResolutionState, names: String) -> Result<()> {
    let outcome = resolution_state
        .outcome
        .get()
        .ok_or_else(|| anyhow!("parameters were not resolved"))?;
    let Err(err) = outcome else {
        bail!("resolution unexpectedly succeeded");
    };
    let expected: Vec<&str> = names.split(',').map(str::trim).collect();
    let actual = missing_parameters(&err);
    ensure!(actual == expected, "missing {actual:?}; expected {expected:?}");
    Ok(())
}

#[then("resolution fails with category {category}")]
fn fails_with_category(resolution_state: &ResolutionState, category: String) -> Result<()> {
    let outcome = resolution_state
        .outcome
        .get()
        .ok_or_else(|| anyhow!("parameters were not resolved"))?;
    let Err(err) = outcome else {
        bail!("resolution unexpectedly succeeded");
    };
    let actual: ErrorCategory = err.category();
    ensure!(actual.as_str() == category, "category {actual}; expected {category}");
    Ok(())
}
