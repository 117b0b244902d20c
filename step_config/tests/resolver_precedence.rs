//! Precedence between command line, configuration scopes, environment and
//! defaults.

mod common;

use std::collections::BTreeMap;

use common::cloud_foundry_step;
use rstest::{fixture, rstest};
use serde_json::json;
use step_config::{
    CliValues, ConfigDocument, ConfigurationResolver, MemorySource, ParamType, PipelineConfig,
    ResolvedOptions, Scope, SecretRegistry, StepConfigError, StepMetadata, StepResult, ValueOrigin,
};

#[fixture]
fn step() -> StepMetadata {
    cloud_foundry_step()
}

/// Configuration satisfying every mandatory parameter from `GENERAL`.
fn base() -> MemorySource {
    MemorySource::new()
        .with(Scope::General, "cfOrg", "general-org")
        .with(Scope::General, "cfSpace", "general-space")
        .with(Scope::Parameters, "username", "robot")
        .with(Scope::Parameters, "password", "s3cret")
}

fn resolve(
    step: &StepMetadata,
    config: &MemorySource,
    env: &BTreeMap<String, String>,
    cli: &CliValues,
) -> StepResult<ResolvedOptions> {
    ConfigurationResolver::new(step, config, env).resolve(cli, &SecretRegistry::new())
}

#[rstest]
fn command_line_wins_over_every_other_source(step: StepMetadata) {
    let config = base()
        .with(Scope::Steps, "cfOrg", "steps-org")
        .with(Scope::Stages, "cfOrg", "stage-org");
    let env = BTreeMap::from([("PIPER_cfOrg".to_owned(), "env-org".to_owned())]);
    let cli = CliValues::new().insert("cfOrg", "cli-org");

    let options = resolve(&step, &config, &env, &cli).expect("resolution succeeds");
    assert_eq!(options.string("cfOrg"), Some("cli-org"));
    assert_eq!(options.origin("cfOrg"), Some(&ValueOrigin::Cli));
}

#[rstest]
#[case::steps_over_stages(
    &[(Scope::Stages, "stage-space"), (Scope::Steps, "steps-space"), (Scope::General, "g")],
    "steps-space",
    Scope::Steps
)]
#[case::stages_over_parameters(
    &[(Scope::Parameters, "param-space"), (Scope::Stages, "stage-space")],
    "stage-space",
    Scope::Stages
)]
#[case::parameters_over_general(
    &[(Scope::General, "general-space"), (Scope::Parameters, "param-space")],
    "param-space",
    Scope::Parameters
)]
fn more_specific_scopes_win(
    step: StepMetadata,
    #[case] entries: &[(Scope, &str)],
    #[case] expected: &str,
    #[case] expected_scope: Scope,
) {
    let config = entries
        .iter()
        .fold(base(), |source, (scope, value)| source.with(*scope, "cfSpace", *value));
    let options =
        resolve(&step, &config, &BTreeMap::new(), &CliValues::new()).expect("resolution succeeds");
    assert_eq!(options.string("cfSpace"), Some(expected));
    assert_eq!(
        options.origin("cfSpace"),
        Some(&ValueOrigin::Configuration {
            scope: expected_scope,
            key: "cfSpace".to_owned(),
        })
    );
}

#[rstest]
fn alias_populates_parameter_without_direct_entry(step: StepMetadata) {
    let config = base().with(Scope::General, "cloudFoundry/apiEndpoint", "https://api.example");
    let options =
        resolve(&step, &config, &BTreeMap::new(), &CliValues::new()).expect("resolution succeeds");
    assert_eq!(options.string("cfApiEndpoint"), Some("https://api.example"));
    assert_eq!(
        options.origin("cfApiEndpoint"),
        Some(&ValueOrigin::Configuration {
            scope: Scope::General,
            key: "cloudFoundry/apiEndpoint".to_owned(),
        })
    );
}

#[rstest]
fn parameter_name_wins_over_alias_within_a_scope(step: StepMetadata) {
    let config = base()
        .with(Scope::General, "cloudFoundry/apiEndpoint", "https://alias.example")
        .with(Scope::General, "cfApiEndpoint", "https://name.example");
    let options =
        resolve(&step, &config, &BTreeMap::new(), &CliValues::new()).expect("resolution succeeds");
    assert_eq!(options.string("cfApiEndpoint"), Some("https://name.example"));
}

#[rstest]
fn first_alias_in_declaration_order_wins(step: StepMetadata) {
    let config = base()
        .with(Scope::General, "cfServiceManifest", "deprecated.yml")
        .with(Scope::General, "cloudFoundry/serviceManifest", "current.yml");
    let options =
        resolve(&step, &config, &BTreeMap::new(), &CliValues::new()).expect("resolution succeeds");
    assert_eq!(options.string("serviceManifest"), Some("current.yml"));
}

#[rstest]
fn deprecated_alias_still_resolves(step: StepMetadata) {
    let config = base().with(Scope::Steps, "cfServiceManifest", "legacy.yml");
    let options =
        resolve(&step, &config, &BTreeMap::new(), &CliValues::new()).expect("resolution succeeds");
    assert_eq!(options.string("serviceManifest"), Some("legacy.yml"));
}

#[rstest]
fn values_from_disallowed_scopes_are_ignored(step: StepMetadata) {
    let config = base()
        .with(Scope::General, "includeAddon", true)
        .with(Scope::Steps, "includeAddon", true);
    let options =
        resolve(&step, &config, &BTreeMap::new(), &CliValues::new()).expect("resolution succeeds");
    assert!(!options.contains("includeAddon"));

    let allowed = config.with(Scope::Stages, "includeAddon", true);
    let options =
        resolve(&step, &allowed, &BTreeMap::new(), &CliValues::new()).expect("resolution succeeds");
    assert_eq!(options.bool("includeAddon"), Some(true));
}

#[rstest]
fn environment_fills_gaps_left_by_configuration(step: StepMetadata) {
    let env = BTreeMap::from([
        ("PIPER_cfSpace".to_owned(), "env-space".to_owned()),
        ("PIPER_abapSystemSizeOfRuntime".to_owned(), "8".to_owned()),
    ]);
    let config = MemorySource::new()
        .with(Scope::General, "cfOrg", "general-org")
        .with(Scope::Parameters, "username", "robot")
        .with(Scope::Parameters, "password", "s3cret");
    let options = resolve(&step, &config, &env, &CliValues::new()).expect("resolution succeeds");
    assert_eq!(options.string("cfSpace"), Some("env-space"));
    assert_eq!(options.int("abapSystemSizeOfRuntime"), Some(8));
    assert_eq!(
        options.origin("cfSpace"),
        Some(&ValueOrigin::Environment {
            variable: "PIPER_cfSpace".to_owned(),
        })
    );
}

#[rstest]
fn configuration_wins_over_environment(step: StepMetadata) {
    let env = BTreeMap::from([("PIPER_cfOrg".to_owned(), "env-org".to_owned())]);
    let options =
        resolve(&step, &base(), &env, &CliValues::new()).expect("resolution succeeds");
    assert_eq!(options.string("cfOrg"), Some("general-org"));
}

#[rstest]
fn declared_defaults_apply_last(step: StepMetadata) {
    let options = resolve(&step, &base(), &BTreeMap::new(), &CliValues::new())
        .expect("resolution succeeds");
    assert_eq!(
        options.string("cfApiEndpoint"),
        Some("https://api.cf.eu10.hana.ondemand.com")
    );
    assert_eq!(options.origin("cfApiEndpoint"), Some(&ValueOrigin::Default));
    assert_eq!(options.int("abapSystemSizeOfRuntime"), Some(0));
    assert!(!options.contains("serviceManifest"));
}

#[rstest]
fn empty_configuration_values_count_as_absent(step: StepMetadata) {
    let config = base()
        .with(Scope::Steps, "cfOrg", "")
        .with(Scope::Stages, "cfOrg", serde_json::Value::Null);
    let options =
        resolve(&step, &config, &BTreeMap::new(), &CliValues::new()).expect("resolution succeeds");
    assert_eq!(options.string("cfOrg"), Some("general-org"));
}

#[rstest]
#[case::string_for_int(Scope::General, "abapSystemSizeOfRuntime", json!("large"), ParamType::Int)]
#[case::float_for_int(Scope::General, "abapSystemSizeOfRuntime", json!(1.5), ParamType::Int)]
#[case::word_for_bool(Scope::Stages, "includeAddon", json!("maybe"), ParamType::Bool)]
#[case::list_for_string(Scope::General, "cfOrg", json!(["a", "b"]), ParamType::String)]
fn mistyped_values_are_errors(
    step: StepMetadata,
    #[case] scope: Scope,
    #[case] key: &str,
    #[case] raw: serde_json::Value,
    #[case] expected_type: ParamType,
) {
    let config = base().with(Scope::Steps, key, raw.clone()).with(scope, key, raw);
    let err = resolve(&step, &config, &BTreeMap::new(), &CliValues::new())
        .expect_err("mistyped value must fail");
    match err.as_ref() {
        StepConfigError::InvalidType {
            parameter, expected, ..
        } => {
            assert_eq!(parameter, key);
            assert_eq!(*expected, expected_type);
        }
        other => panic!("expected InvalidType, got {other:?}"),
    }
}

#[rstest]
fn string_encoded_scalars_convert_to_declared_types(step: StepMetadata) {
    let config = base()
        .with(Scope::Stages, "includeAddon", "TRUE")
        .with(Scope::General, "abapSystemSizeOfRuntime", " 16 ");
    let options =
        resolve(&step, &config, &BTreeMap::new(), &CliValues::new()).expect("resolution succeeds");
    assert_eq!(options.bool("includeAddon"), Some(true));
    assert_eq!(options.int("abapSystemSizeOfRuntime"), Some(16));
}

#[rstest]
fn pipeline_documents_follow_scope_layout(step: StepMetadata) {
    let config = PipelineConfig::builder(step.name())
        .custom(ConfigDocument::new(json!({
            "general": {"cloudFoundry": {"org": "doc-org", "space": "doc-space"}},
            "stages": {"Release": {"includeAddon": true}},
            "steps": {"abapEnvironmentCreateSystem": {"abapSystemSizeOfRuntime": 4}},
        })))
        .stage("Release")
        .parameters(json!({"username": "robot", "password": "s3cret"}))
        .build();
    let options = ConfigurationResolver::new(&step, &config, &BTreeMap::<String, String>::new())
        .resolve(&CliValues::new(), &SecretRegistry::new())
        .expect("resolution succeeds");
    assert_eq!(options.string("cfOrg"), Some("doc-org"));
    assert_eq!(options.string("cfSpace"), Some("doc-space"));
    assert_eq!(options.bool("includeAddon"), Some(true));
    assert_eq!(options.int("abapSystemSizeOfRuntime"), Some(4));
}

#[rstest]
fn resolution_is_deterministic(step: StepMetadata) {
    let config = base().with(Scope::Stages, "cfSpace", "stage-space");
    let first = resolve(&step, &config, &BTreeMap::new(), &CliValues::new())
        .expect("resolution succeeds");
    let second = resolve(&step, &config, &BTreeMap::new(), &CliValues::new())
        .expect("resolution succeeds");
    assert_eq!(first, second);
}
