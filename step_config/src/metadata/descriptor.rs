//! Per-parameter declarations.

use crate::ENV_PREFIX;
use crate::scope::Scope;
use crate::secrets::is_sensitive_name;
use crate::value::{ParamType, ParamValue};

use super::reference::ResourceReference;
use super::template::PathTemplate;

/// Alternate lookup name for a parameter in configuration sources.
///
/// Names may be hierarchical: `cloudFoundry/apiEndpoint` addresses the
/// `apiEndpoint` key nested under `cloudFoundry`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alias {
    name: String,
    deprecated: bool,
}

impl Alias {
    /// Creates a current alias.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deprecated: false,
        }
    }

    /// Creates an alias that still resolves but logs a deprecation warning.
    #[must_use]
    pub fn deprecated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deprecated: true,
        }
    }

    /// The alias name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the alias is deprecated.
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.deprecated
    }
}

/// Declarative description of one step parameter.
///
/// Descriptors are built with chained setters and then frozen inside a
/// [`crate::StepMetadata`]:
///
/// ```
/// use step_config::{ParameterDescriptor, Scope};
///
/// let password = ParameterDescriptor::string("password")
///     .mandatory()
///     .scopes([Scope::Parameters, Scope::Stages, Scope::Steps])
///     .secret_reference("cfCredentialsId", "password")
///     .vault_reference(["$(vaultPath)/cloudfoundry-$(cfOrg)-$(cfSpace)"]);
/// assert!(password.is_sensitive());
/// assert_eq!(password.env_var(), "PIPER_password");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterDescriptor {
    name: String,
    param_type: ParamType,
    mandatory: bool,
    scopes: Vec<Scope>,
    aliases: Vec<Alias>,
    references: Vec<ResourceReference>,
    default: Option<ParamValue>,
    secret: bool,
    description: String,
}

impl ParameterDescriptor {
    /// Creates an optional parameter with no scopes, aliases or references.
    #[must_use]
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            mandatory: false,
            scopes: Vec::new(),
            aliases: Vec::new(),
            references: Vec::new(),
            default: None,
            secret: false,
            description: String::new(),
        }
    }

    /// Shorthand for a string parameter.
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::String)
    }

    /// Shorthand for a boolean parameter.
    #[must_use]
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Bool)
    }

    /// Shorthand for an integer parameter.
    #[must_use]
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Int)
    }

    /// Marks the parameter as mandatory.
    #[must_use]
    pub const fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Replaces the scopes configuration values are honoured from.
    #[must_use]
    pub fn scopes(mut self, scopes: impl IntoIterator<Item = Scope>) -> Self {
        self.scopes = scopes.into_iter().collect();
        self
    }

    /// Honours configuration values from every scope.
    #[must_use]
    pub fn all_scopes(self) -> Self {
        self.scopes(Scope::ALL)
    }

    /// Appends an alias.
    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(Alias::new(name));
        self
    }

    /// Appends a deprecated alias.
    #[must_use]
    pub fn deprecated_alias(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(Alias::deprecated(name));
        self
    }

    /// Appends a resource reference.
    #[must_use]
    pub fn reference(mut self, reference: ResourceReference) -> Self {
        self.references.push(reference);
        self
    }

    /// Appends a credential store reference reading `field` of `credential`.
    #[must_use]
    pub fn secret_reference(self, credential: impl Into<String>, field: impl Into<String>) -> Self {
        self.reference(ResourceReference::secret(credential, field))
    }

    /// Appends a vault reference trying `paths` in order.
    #[must_use]
    pub fn vault_reference<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference(ResourceReference::vault_secret(
            paths.into_iter().map(PathTemplate::new),
        ))
    }

    /// Declares the value used when no source supplies one.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Marks the value as secret regardless of the parameter's name.
    #[must_use]
    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Sets the help text shown for the parameter's flag.
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Parameter name, also used as flag and configuration key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    #[must_use]
    pub const fn param_type(&self) -> ParamType {
        self.param_type
    }

    /// Whether resolution fails when no value is found.
    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Scopes configuration values are honoured from.
    #[must_use]
    pub fn allowed_scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Aliases in declaration order.
    #[must_use]
    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    /// Resource references in declaration order.
    #[must_use]
    pub fn references(&self) -> &[ResourceReference] {
        &self.references
    }

    /// Declared default value.
    #[must_use]
    pub const fn declared_default(&self) -> Option<&ParamValue> {
        self.default.as_ref()
    }

    /// Help text for the parameter's flag.
    #[must_use]
    pub fn help(&self) -> &str {
        &self.description
    }

    /// Whether the resolved value must be kept out of logs.
    ///
    /// True for parameters explicitly marked secret and for conventionally
    /// sensitive names such as `username` or `password`.
    #[must_use]
    pub fn is_sensitive(&self) -> bool {
        self.secret || is_sensitive_name(&self.name)
    }

    /// Environment variable consulted for this parameter.
    #[must_use]
    pub fn env_var(&self) -> String {
        format!("{ENV_PREFIX}{}", self.name)
    }

    /// Names of other parameters this one depends on through its references.
    pub(crate) fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.references
            .iter()
            .flat_map(|reference| reference.dependencies())
    }
}
