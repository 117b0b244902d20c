//! One `stepctl` invocation: parse, resolve, run, report.

use std::ffi::OsString;
use std::process::ExitCode;
use std::time::Instant;

use camino::Utf8Path;
use clap::ArgMatches;
use serde_json::Value as JsonValue;
use step_config::cli::explicit_values;
use step_config::file::{load_required_document, locate_pipeline_config};
use step_config::{
    ConfigurationResolver, ENV_PREFIX, Environment, PipelineConfig, ProcessEnvironment,
    SecretRegistry, StaticCredentialStore, StaticVault,
};
use tracing::{debug, error, info, info_span};

use crate::cli::{GlobalArgs, command};
use crate::error::StepctlError;
use crate::logging;
use crate::steps::{StepEntry, catalogue, find};
use crate::telemetry::{Disabled, LogSink, TelemetryData, TelemetrySink};

/// Runs `stepctl` with `args`, including the program name.
///
/// The exit code is `0` on success, `2` for usage errors such as unknown
/// flags or missing mandatory parameters, and `1` for every other failure.
pub fn run<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let registry = SecretRegistry::new();
    let steps = match catalogue() {
        Ok(steps) => steps,
        Err(err) => {
            drop(logging::init(false, registry));
            error!(error = %err, "shipped step metadata is invalid");
            return ExitCode::FAILURE;
        }
    };
    let matches = match command(&steps).try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(err) => return usage_exit(&err),
    };
    let globals = match GlobalArgs::from_matches(&matches) {
        Ok(globals) => globals,
        Err(err) => return usage_exit(&err),
    };
    if let Err(err) = logging::init(globals.is_verbose, registry.clone()) {
        debug!(error = %err, "keeping the installed subscriber");
    }
    let Some((name, step_matches)) = matches.subcommand() else {
        error!("no step selected");
        return ExitCode::from(2);
    };

    let span = info_span!(
        "step",
        step = name,
        correlation_id = globals.correlation_id.as_deref().unwrap_or_default()
    );
    let _entered = span.enter();
    let started = Instant::now();
    let sink: &dyn TelemetrySink = if globals.should_skip_telemetry {
        &Disabled
    } else {
        &LogSink
    };

    let outcome = find(&steps, name)
        .ok_or_else(|| StepctlError::UnknownStep(name.to_owned()))
        .and_then(|entry| execute(entry, step_matches, &globals, &ProcessEnvironment, &registry));
    match outcome {
        Ok(()) => {
            info!("SUCCESS");
            sink.send(&TelemetryData::success(
                name,
                started.elapsed(),
                globals.correlation_id.clone(),
            ));
            ExitCode::SUCCESS
        }
        Err(err) => {
            let category = err.category();
            error!(error = %err, %category, "step failed");
            sink.send(&TelemetryData::failure(
                name,
                category,
                started.elapsed(),
                globals.correlation_id.clone(),
            ));
            err.exit_code()
        }
    }
}

fn usage_exit(err: &clap::Error) -> ExitCode {
    drop(err.print());
    if err.use_stderr() {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

/// Resolves the parameters of `entry` and runs its body.
///
/// Values read from the credential store or vault, and values of sensitive
/// parameters, are registered with `registry` as they resolve.
///
/// # Errors
///
/// Returns a [`StepctlError`] when configuration cannot be loaded, a
/// parameter fails to resolve, or the step body fails.
pub fn execute<E: Environment>(
    entry: &StepEntry,
    matches: &ArgMatches,
    globals: &GlobalArgs,
    environment: &E,
    registry: &SecretRegistry,
) -> Result<(), StepctlError> {
    let step = entry.metadata();
    let config = pipeline_config(entry, globals, environment)?;
    let credentials = globals
        .credentials_file
        .as_deref()
        .map(StaticCredentialStore::from_file)
        .transpose()?;
    let vault = globals
        .vault_file
        .as_deref()
        .map(StaticVault::from_file)
        .transpose()?;

    let mut resolver = ConfigurationResolver::new(step, &config, environment);
    if let Some(store) = &credentials {
        resolver = resolver.with_credentials(store);
    }
    if let Some(secrets) = &vault {
        resolver = resolver.with_vault(secrets);
    }
    let options = resolver.resolve(&explicit_values(step, matches), registry)?;
    entry.run(&options)
}

/// Assembles the configuration sources named by the global flags.
///
/// Without `--custom-config`, `.pipeline/config.yml` (or `.yaml`) below the
/// working directory is used when present. The stage comes from
/// `--stage-name`, else `PIPER_stageName`.
///
/// # Errors
///
/// Returns a [`StepctlError`] when a named file is missing or malformed, or
/// when `--parameters-json` is not a JSON object.
pub fn pipeline_config<E: Environment>(
    entry: &StepEntry,
    globals: &GlobalArgs,
    environment: &E,
) -> Result<PipelineConfig, StepctlError> {
    let step = entry.metadata();
    let mut builder =
        PipelineConfig::builder(step.name()).step_aliases(step.aliases().iter().cloned());

    let custom_path = globals
        .custom_config
        .clone()
        .or_else(|| locate_pipeline_config(Utf8Path::new(".")));
    if let Some(path) = custom_path {
        builder = builder.custom(load_required_document(&path)?);
    }
    for path in &globals.default_config {
        builder = builder.default_document(load_required_document(path)?);
    }
    if let Some(raw) = &globals.parameters_json {
        builder = builder.parameters(parameters_object(raw)?);
    }
    let stage = globals
        .stage_name
        .clone()
        .or_else(|| environment.get(&format!("{ENV_PREFIX}stageName")))
        .filter(|stage| !stage.is_empty());
    if let Some(name) = stage {
        builder = builder.stage(name);
    }
    Ok(builder.build())
}

fn parameters_object(raw: &str) -> Result<JsonValue, StepctlError> {
    let parsed: JsonValue =
        serde_json::from_str(raw).map_err(|err| StepctlError::ParametersJson(err.to_string()))?;
    if parsed.is_object() {
        Ok(parsed)
    } else {
        Err(StepctlError::ParametersJson("expected a JSON object".to_owned()))
    }
}
