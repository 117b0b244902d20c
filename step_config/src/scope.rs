//! Configuration scopes and the rules deciding where a parameter may be set.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metadata::ParameterDescriptor;

/// A configuration section level from which parameter values may be read.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scope {
    /// Values passed to the step invocation as a JSON object.
    Parameters,
    /// Values from the `stages.<stage>` section of the configuration.
    Stages,
    /// Values from the `steps.<step>` section of the configuration.
    Steps,
    /// Values from the `general` section of the configuration.
    General,
}

impl Scope {
    /// Every scope, in declaration order.
    pub const ALL: [Self; 4] = [Self::Parameters, Self::Stages, Self::Steps, Self::General];

    /// Order in which configuration scopes are searched, most specific first.
    pub const LOOKUP_ORDER: [Self; 4] = [Self::Steps, Self::Stages, Self::Parameters, Self::General];

    /// Upper-case scope name used in metadata declarations.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parameters => "PARAMETERS",
            Self::Stages => "STAGES",
            Self::Steps => "STEPS",
            Self::General => "GENERAL",
        }
    }

    /// Parses a scope name, ignoring ASCII case.
    ///
    /// Unknown names yield `None`: a scope that cannot be named is never
    /// allowed.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `true` when `descriptor` honours configuration values from `scope`.
#[must_use]
pub fn is_allowed(descriptor: &ParameterDescriptor, scope: Scope) -> bool {
    descriptor.allowed_scopes().contains(&scope)
}
