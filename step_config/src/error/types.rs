//! Primary error enums for metadata construction and parameter resolution.

use figment::Error as FigmentError;
use thiserror::Error;

use super::aggregate::AggregatedErrors;
use crate::metadata::TemplateError;
use crate::sources::StoreUnavailable;
use crate::value::ParamType;

/// Errors that can occur while building metadata or resolving parameters.
///
/// Messages never include parameter values; only names, origins and value
/// kinds are reported so that secrets cannot leak through error text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StepConfigError {
    /// Error originating from a configuration file.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the configuration failure.
        path: std::path::PathBuf,
        /// Underlying error reported by the file loader.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error while gathering values from a Figment provider.
    #[error("Failed to gather configuration: {0}")]
    Gathering(#[from] Box<FigmentError>),

    /// A step declaration is internally inconsistent.
    #[error("invalid metadata for step '{step}': {source}")]
    Metadata {
        /// Step whose declaration was rejected.
        step: String,
        /// Specific inconsistency.
        #[source]
        source: MetadataError,
    },

    /// A value could not be converted to the parameter's declared type.
    #[error("parameter '{parameter}' expects a {expected} value but {origin} supplied a {found}")]
    InvalidType {
        /// Parameter being resolved.
        parameter: String,
        /// Declared parameter type.
        expected: ParamType,
        /// Kind of the rejected value (never the value itself).
        found: &'static str,
        /// Human-readable description of where the value came from.
        origin: String,
    },

    /// A mandatory parameter had no value after every source was consulted.
    #[error("mandatory parameter '{parameter}' of step '{step}' is not set")]
    MandatoryParameterMissing {
        /// Step being resolved.
        step: String,
        /// Parameter that stayed unset.
        parameter: String,
    },

    /// A credential store or vault could not be reached.
    #[error("secret store '{store}' is unreachable: {source}")]
    SecretStoreUnreachable {
        /// Kind of store that failed (`credential store` or `vault`).
        store: &'static str,
        /// Transport failure reported by the store.
        #[source]
        source: StoreUnavailable,
    },

    /// Resolved options could not be deserialised into the requested type.
    #[error("Failed to extract resolved options: {0}")]
    Extraction(#[source] serde_json::Error),

    /// Multiple errors occurred during one resolution pass.
    #[error("multiple configuration errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}

/// Inconsistencies detected while constructing [`crate::StepMetadata`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetadataError {
    /// Two descriptors share the same name.
    #[error("parameter '{0}' is declared more than once")]
    DuplicateParameter(String),

    /// A vault path template is malformed.
    #[error("parameter '{parameter}' has an invalid vault path '{template}': {source}")]
    InvalidTemplate {
        /// Parameter owning the template.
        parameter: String,
        /// Raw template text.
        template: String,
        /// Parse failure.
        #[source]
        source: TemplateError,
    },

    /// A declared default does not match the declared type.
    #[error("parameter '{parameter}' declares a {found} default for a {expected} parameter")]
    DefaultTypeMismatch {
        /// Parameter owning the default.
        parameter: String,
        /// Declared parameter type.
        expected: ParamType,
        /// Type of the supplied default.
        found: ParamType,
    },

    /// Placeholder or credential references form a cycle.
    #[error("cyclic parameter references detected: {cycle}")]
    PlaceholderCycle {
        /// Chain of parameter names participating in the cycle.
        cycle: String,
    },

    /// A declaration names a parameter type the resolver does not support.
    #[error("parameter '{parameter}' uses unsupported type '{type_name}'")]
    UnknownType {
        /// Parameter owning the type.
        parameter: String,
        /// Unsupported type name.
        type_name: String,
    },

    /// A declaration names a resource reference kind the resolver does not support.
    #[error("parameter '{parameter}' uses unsupported resource reference type '{kind}'")]
    UnknownReference {
        /// Parameter owning the reference.
        parameter: String,
        /// Unsupported reference kind.
        kind: String,
    },

    /// A metadata document could not be parsed.
    #[error("failed to parse metadata document: {0}")]
    Parse(String),
}
