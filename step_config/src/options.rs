//! The typed option set handed to a step body.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::scope::Scope;
use crate::value::ParamValue;
use crate::{StepResult, StepResultExt};

/// Where a resolved value came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValueOrigin {
    /// An explicit command-line flag.
    Cli,
    /// A configuration section.
    Configuration {
        /// Scope the value was read from.
        scope: Scope,
        /// Parameter name or alias that matched.
        key: String,
    },
    /// A `PIPER_<name>` environment variable.
    Environment {
        /// Variable name.
        variable: String,
    },
    /// A credential store entry.
    CredentialStore {
        /// Credential id that was looked up.
        credential: String,
        /// Field read from the credential.
        field: String,
    },
    /// A vault entry.
    Vault {
        /// Rendered vault path.
        path: String,
    },
    /// The parameter's declared default.
    Default,
}

impl ValueOrigin {
    /// Whether the value was read from a credential store or vault.
    #[must_use]
    pub const fn is_secret_reference(&self) -> bool {
        matches!(self, Self::CredentialStore { .. } | Self::Vault { .. })
    }
}

impl fmt::Display for ValueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => f.write_str("command line"),
            Self::Configuration { scope, key } => write!(f, "{scope} configuration key '{key}'"),
            Self::Environment { variable } => write!(f, "environment variable {variable}"),
            Self::CredentialStore { credential, field } => {
                write!(f, "credential '{credential}' field '{field}'")
            }
            Self::Vault { path } => write!(f, "vault path '{path}'"),
            Self::Default => f.write_str("default value"),
        }
    }
}

/// One resolved value and its origin.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    /// Typed value.
    pub value: ParamValue,
    /// Source the value was taken from.
    pub origin: ValueOrigin,
}

impl fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedValue")
            .field("type", &self.value.param_type())
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Immutable, fully resolved parameters of one step invocation.
///
/// Parameters without a value are simply absent. The `Debug` output lists
/// names and origins only.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ResolvedOptions {
    step: String,
    values: BTreeMap<String, ResolvedValue>,
}

impl ResolvedOptions {
    pub(crate) fn new(step: impl Into<String>, values: BTreeMap<String, ResolvedValue>) -> Self {
        Self {
            step: step.into(),
            values,
        }
    }

    /// Step the options were resolved for.
    #[must_use]
    pub fn step(&self) -> &str {
        &self.step
    }

    /// Typed value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name).map(|resolved| &resolved.value)
    }

    /// Origin of the value of `name`.
    #[must_use]
    pub fn origin(&self, name: &str) -> Option<&ValueOrigin> {
        self.values.get(name).map(|resolved| &resolved.origin)
    }

    /// Text of a string parameter.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    /// Value of a bool parameter.
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }

    /// Value of an int parameter.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_int)
    }

    /// Whether `name` resolved to a value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of resolved parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameter resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolved parameters ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Deserialises the options into a step-specific struct.
    ///
    /// Field names match parameter names, so structs usually carry
    /// `#[serde(rename_all = "camelCase")]`. Unset parameters are missing
    /// keys; give such fields `Option` types or `#[serde(default)]`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StepConfigError::Extraction`] when the options do not fit `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> StepResult<T> {
        let object: serde_json::Map<String, JsonValue> = self
            .values
            .iter()
            .map(|(name, resolved)| (name.clone(), resolved.value.to_json()))
            .collect();
        serde_json::from_value(JsonValue::Object(object)).into_step()
    }
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("step", &self.step)
            .field(
                "values",
                &self
                    .values
                    .iter()
                    .map(|(name, resolved)| (name, &resolved.origin))
                    .collect::<BTreeMap<_, _>>(),
            )
            .finish()
    }
}
