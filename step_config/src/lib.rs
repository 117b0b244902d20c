//! Declarative parameter resolution for pipeline step commands.
//!
//! Every step command declares its parameters once, as a table of
//! [`ParameterDescriptor`] values collected into a [`StepMetadata`]. The
//! [`ConfigurationResolver`] walks that table and produces one typed value per
//! parameter from, in order of precedence:
//!
//! 1. explicit command-line flags;
//! 2. pipeline configuration sections (`steps`, `stages`, `PARAMETERS` JSON,
//!    `general`) permitted by the parameter's [`Scope`] list;
//! 3. `PIPER_<name>` environment variables;
//! 4. credential store and vault [`ResourceReference`]s;
//! 5. the declared default.
//!
//! Values that originate from secret stores, or that belong to sensitive
//! parameters, are recorded in a [`SecretRegistry`] so that the
//! [`redact`] writer can scrub them from log output.
//!
//! ```rust
//! use step_config::{
//!     CliValues, ConfigurationResolver, MemorySource, ParameterDescriptor, Scope,
//!     SecretRegistry, StepMetadata,
//! };
//! use std::collections::BTreeMap;
//!
//! let step = StepMetadata::builder("cloudFoundryDeleteSpace")
//!     .parameter(
//!         ParameterDescriptor::string("cfOrg")
//!             .mandatory()
//!             .all_scopes()
//!             .alias("cloudFoundry/org"),
//!     )
//!     .build()
//!     .expect("valid metadata");
//!
//! let config = MemorySource::new().with(Scope::General, "cloudFoundry/org", "org1");
//! let environment = BTreeMap::<String, String>::new();
//! let registry = SecretRegistry::new();
//!
//! let options = ConfigurationResolver::new(&step, &config, &environment)
//!     .resolve(&CliValues::new(), &registry)
//!     .expect("resolution succeeds");
//! assert_eq!(options.string("cfOrg"), Some("org1"));
//! ```

pub mod cli;
mod error;
pub mod file;
pub mod metadata;
mod options;
pub mod redact;
pub mod resolver;
mod result_ext;
pub mod scope;
pub mod secrets;
pub mod sources;
mod value;

use std::sync::Arc;

pub use cli::CliValues;
pub use error::{AggregatedErrors, ErrorCategory, MetadataError, StepConfigError};
pub use metadata::{
    Alias, ParameterDescriptor, PathTemplate, ReferenceKind, ResourceReference, StepMetadata,
    StepMetadataBuilder, TemplateError,
};
pub use options::{ResolvedOptions, ResolvedValue, ValueOrigin};
pub use resolver::ConfigurationResolver;
pub use result_ext::StepResultExt;
pub use scope::Scope;
pub use secrets::SecretRegistry;
pub use sources::{
    ConfigDocument, ConfigurationSource, CredentialStore, Environment, MemorySource,
    PipelineConfig, PipelineConfigBuilder, ProcessEnvironment, SecretVault, StaticCredentialStore,
    StaticVault, StoreUnavailable, VaultEntry,
};
pub use value::{ParamType, ParamValue};

/// Prefix prepended to a parameter name to form its environment variable.
pub const ENV_PREFIX: &str = "PIPER_";

/// Result alias used throughout the crate.
///
/// Errors are shared behind an [`Arc`] so that several failures can be
/// collected into one [`StepConfigError::Aggregate`] without cloning.
pub type StepResult<T> = Result<T, Arc<StepConfigError>>;
