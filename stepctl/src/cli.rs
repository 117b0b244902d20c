//! Command-line surface of `stepctl`.
//!
//! Global flags are declared once with `global = true` so they may appear
//! before or after the step subcommand. Each shipped step contributes one
//! subcommand generated from its metadata.

use camino::Utf8PathBuf;
use clap::{ArgAction, Args, Command, FromArgMatches};
use step_config::cli::step_command;

use crate::steps::StepEntry;

/// Flags shared by every step.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Pipeline configuration file; defaults to `.pipeline/config.yml`.
    #[arg(long = "custom-config", value_name = "PATH", global = true)]
    pub custom_config: Option<Utf8PathBuf>,
    /// Lower-priority default configuration files (repeatable).
    #[arg(long = "default-config", value_name = "PATH", global = true)]
    pub default_config: Vec<Utf8PathBuf>,
    /// JSON object feeding the `PARAMETERS` scope.
    #[arg(long = "parameters-json", value_name = "JSON", global = true)]
    pub parameters_json: Option<String>,
    /// Stage whose `stages.<name>` section applies; falls back to
    /// `PIPER_stageName`.
    #[arg(long = "stage-name", value_name = "NAME", global = true)]
    pub stage_name: Option<String>,
    /// Emits debug logging.
    #[arg(long = "verbose", short = 'v', action = ArgAction::SetTrue, global = true)]
    pub is_verbose: bool,
    /// Correlation id attached to every log line.
    #[arg(long = "correlation-id", value_name = "ID", global = true)]
    pub correlation_id: Option<String>,
    /// Suppresses the telemetry record.
    #[arg(long = "no-telemetry", action = ArgAction::SetTrue, global = true)]
    pub should_skip_telemetry: bool,
    /// File-backed credential store (credential id to field map).
    #[arg(long = "credentials-file", value_name = "PATH", global = true)]
    pub credentials_file: Option<Utf8PathBuf>,
    /// File-backed vault (vault path to field map).
    #[arg(long = "vault-file", value_name = "PATH", global = true)]
    pub vault_file: Option<Utf8PathBuf>,
}

impl GlobalArgs {
    /// Reads the global flags from top-level matches.
    ///
    /// # Errors
    ///
    /// Returns a [`clap::Error`] when the matches were not produced by
    /// [`command`].
    pub fn from_matches(matches: &clap::ArgMatches) -> Result<Self, clap::Error> {
        Self::from_arg_matches(matches)
    }
}

/// Builds the `stepctl` command with one subcommand per entry in `steps`.
#[must_use]
pub fn command(steps: &[StepEntry]) -> Command {
    let root = Command::new("stepctl")
        .about("Runs pipeline steps with declaratively resolved parameters")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true);
    steps.iter().fold(GlobalArgs::augment_args(root), |cmd, entry| {
        cmd.subcommand(step_command(entry.metadata()))
    })
}
