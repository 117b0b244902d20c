//! Parameter types and typed values.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Declared type of a step parameter.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Free-form text.
    String,
    /// `true` or `false`.
    Bool,
    /// Signed integer.
    Int,
}

impl ParamType {
    /// Name used in metadata declarations.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
        }
    }

    /// Parses a metadata type name; unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "bool" => Some(Self::Bool),
            "int" => Some(Self::Int),
            _ => None,
        }
    }

    /// Converts a raw configuration value into this type.
    ///
    /// Strings are accepted for every type so that environment variables and
    /// quoted YAML scalars work; scalars are accepted for strings. On failure
    /// the kind of the rejected value is returned, never the value itself.
    pub(crate) fn coerce(self, raw: &JsonValue) -> Result<ParamValue, &'static str> {
        match (self, raw) {
            (Self::String, JsonValue::String(text)) => Ok(ParamValue::String(text.clone())),
            (Self::String, JsonValue::Number(number)) => Ok(ParamValue::String(number.to_string())),
            (Self::String, JsonValue::Bool(flag)) => Ok(ParamValue::String(flag.to_string())),
            (Self::Bool, JsonValue::Bool(flag)) => Ok(ParamValue::Bool(*flag)),
            (Self::Bool, JsonValue::String(text)) => parse_bool(text)
                .map(ParamValue::Bool)
                .ok_or("non-boolean string"),
            (Self::Int, JsonValue::Number(number)) => number
                .as_i64()
                .map(ParamValue::Int)
                .ok_or("non-integer number"),
            (Self::Int, JsonValue::String(text)) => text
                .trim()
                .parse::<i64>()
                .map(ParamValue::Int)
                .map_err(|_| "non-integer string"),
            (_, other) => Err(kind_of(other)),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

const fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "map",
    }
}

/// A typed parameter value.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Text value.
    String(String),
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
}

impl ParamValue {
    /// Type of the held value.
    #[must_use]
    pub const fn param_type(&self) -> ParamType {
        match self {
            Self::String(_) => ParamType::String,
            Self::Bool(_) => ParamType::Bool,
            Self::Int(_) => ParamType::Int,
        }
    }

    /// Returns `true` for an empty string. Booleans and integers are never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        match self {
            Self::String(text) => text.is_empty(),
            Self::Bool(_) | Self::Int(_) => false,
        }
    }

    /// Borrow the text of a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            Self::Bool(_) | Self::Int(_) => None,
        }
    }

    /// Returns the boolean of a bool value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            Self::String(_) | Self::Int(_) => None,
        }
    }

    /// Returns the integer of an int value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(number) => Some(*number),
            Self::String(_) | Self::Bool(_) => None,
        }
    }

    pub(crate) fn to_json(&self) -> JsonValue {
        match self {
            Self::String(text) => JsonValue::from(text.as_str()),
            Self::Bool(flag) => JsonValue::from(*flag),
            Self::Int(number) => JsonValue::from(*number),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(text) => f.write_str(text),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}
