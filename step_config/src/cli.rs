//! Command-line surface generated from step metadata.
//!
//! Each parameter becomes a long flag with the parameter's exact name. Only
//! flags the user actually typed are handed to the resolver; clap defaults
//! never shadow configuration values.

use std::collections::BTreeMap;
use std::fmt;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use serde_json::Value as JsonValue;

use crate::metadata::{ParameterDescriptor, StepMetadata};
use crate::value::ParamType;

/// Parameter values supplied explicitly on the command line.
///
/// `Debug` lists flag names only, since flags such as `--password` carry
/// secrets.
#[derive(Clone, Default, PartialEq)]
pub struct CliValues {
    values: BTreeMap<String, JsonValue>,
}

impl CliValues {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Records an explicit value for `name`.
    #[must_use]
    pub fn insert(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Explicit value for `name`, if one was supplied.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.values.get(name)
    }

    /// Number of explicit values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for CliValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

/// Builds the subcommand for `step`.
///
/// Bool flags accept `--flag`, `--flag=true` and `--flag=false`; int flags
/// are parsed as `i64`. Mandatory parameters are not marked required because
/// configuration may still supply them.
#[must_use]
pub fn step_command(step: &StepMetadata) -> Command {
    let mut command = Command::new(step.name().to_owned())
        .about(step.description().to_owned())
        .visible_aliases(step.aliases().iter().cloned());
    for parameter in step.parameters() {
        command = command.arg(parameter_arg(parameter));
    }
    command
}

fn parameter_arg(parameter: &ParameterDescriptor) -> Arg {
    let arg = Arg::new(parameter.name().to_owned())
        .long(parameter.name().to_owned())
        .help(parameter.help().to_owned())
        .action(ArgAction::Set)
        .required(false);
    match parameter.param_type() {
        ParamType::String => arg.value_parser(value_parser!(String)),
        ParamType::Int => arg
            .value_parser(value_parser!(i64))
            .allow_negative_numbers(true),
        ParamType::Bool => arg
            .value_parser(value_parser!(bool))
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true"),
    }
}

/// Collects the flags of `step` that were given on the command line.
#[must_use]
pub fn explicit_values(step: &StepMetadata, matches: &ArgMatches) -> CliValues {
    step.parameters()
        .iter()
        .filter(|parameter| {
            matches.value_source(parameter.name()) == Some(ValueSource::CommandLine)
        })
        .filter_map(|parameter| {
            explicit_value(parameter, matches).map(|value| (parameter.name().to_owned(), value))
        })
        .fold(CliValues::new(), |values, (name, value)| values.insert(name, value))
}

fn explicit_value(parameter: &ParameterDescriptor, matches: &ArgMatches) -> Option<JsonValue> {
    let name = parameter.name();
    match parameter.param_type() {
        ParamType::String => matches
            .try_get_one::<String>(name)
            .ok()
            .flatten()
            .map(|text| JsonValue::from(text.as_str())),
        ParamType::Bool => matches
            .try_get_one::<bool>(name)
            .ok()
            .flatten()
            .map(|flag| JsonValue::from(*flag)),
        ParamType::Int => matches
            .try_get_one::<i64>(name)
            .ok()
            .flatten()
            .map(|number| JsonValue::from(*number)),
    }
}
