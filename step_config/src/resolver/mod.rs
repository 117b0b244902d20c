//! Resolution of one step's parameters from every configured source.

mod references;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::cli::CliValues;
use crate::metadata::{ParameterDescriptor, StepMetadata};
use crate::options::{ResolvedOptions, ResolvedValue, ValueOrigin};
use crate::scope::{Scope, is_allowed};
use crate::secrets::SecretRegistry;
use crate::sources::{ConfigurationSource, CredentialStore, Environment, SecretVault};
use crate::{StepConfigError, StepResult};

use references::ReferenceResolver;

/// Resolves a step's parameters with a fixed precedence.
///
/// For each parameter, in dependency order, the first source with a
/// non-empty value wins:
///
/// 1. an explicit command-line value;
/// 2. configuration from an allowed scope, searching `STEPS`, `STAGES`,
///    `PARAMETERS` then `GENERAL`, and within a scope the parameter name before
///    its aliases;
/// 3. the `PIPER_<name>` environment variable;
/// 4. the parameter's resource references, in declaration order;
/// 5. the declared default.
///
/// Missing mandatory parameters are reported together once every parameter
/// has been tried. Values read from a credential store or vault, and values of
/// sensitive parameters, are registered with the [`SecretRegistry`] as soon as
/// they resolve.
pub struct ConfigurationResolver<'a> {
    step: &'a StepMetadata,
    config: &'a dyn ConfigurationSource,
    environment: &'a dyn Environment,
    credentials: Option<&'a dyn CredentialStore>,
    vault: Option<&'a dyn SecretVault>,
}

impl<'a> ConfigurationResolver<'a> {
    /// Creates a resolver without secret stores; resource references are
    /// skipped until stores are attached.
    #[must_use]
    pub fn new<C, E>(step: &'a StepMetadata, config: &'a C, environment: &'a E) -> Self
    where
        C: ConfigurationSource,
        E: Environment,
    {
        Self {
            step,
            config,
            environment,
            credentials: None,
            vault: None,
        }
    }

    /// Attaches the credential store used by `secret` references.
    #[must_use]
    pub fn with_credentials<S: CredentialStore>(mut self, store: &'a S) -> Self {
        self.credentials = Some(store);
        self
    }

    /// Attaches the vault used by `vaultSecret` references.
    #[must_use]
    pub fn with_vault<V: SecretVault>(mut self, vault: &'a V) -> Self {
        self.vault = Some(vault);
        self
    }

    /// Resolves every parameter of the step.
    ///
    /// # Errors
    ///
    /// * [`StepConfigError::InvalidType`] when a value does not convert to its
    ///   parameter's type;
    /// * [`StepConfigError::SecretStoreUnreachable`] when a store or vault
    ///   reports a transport failure;
    /// * [`StepConfigError::MandatoryParameterMissing`], or an aggregate of
    ///   them, when mandatory parameters stay empty.
    pub fn resolve(&self, cli: &CliValues, registry: &SecretRegistry) -> StepResult<ResolvedOptions> {
        let mut resolved: BTreeMap<String, ResolvedValue> = BTreeMap::new();
        for descriptor in self.step.resolution_order() {
            let Some(value) = self.resolve_parameter(descriptor, cli, &resolved, registry)? else {
                debug!(step = self.step.name(), parameter = descriptor.name(), "parameter unset");
                continue;
            };
            debug!(
                step = self.step.name(),
                parameter = descriptor.name(),
                origin = %value.origin,
                "parameter resolved"
            );
            register_secret(descriptor, &value, registry);
            resolved.insert(descriptor.name().to_owned(), value);
        }
        self.check_mandatory(&resolved)?;
        Ok(ResolvedOptions::new(self.step.name(), resolved))
    }

    fn resolve_parameter(
        &self,
        descriptor: &ParameterDescriptor,
        cli: &CliValues,
        resolved: &BTreeMap<String, ResolvedValue>,
        registry: &SecretRegistry,
    ) -> StepResult<Option<ResolvedValue>> {
        if let Some(raw) = cli.get(descriptor.name()) {
            return typed(descriptor, raw, ValueOrigin::Cli).map(Some);
        }
        if let Some((raw, origin)) = self.from_configuration(descriptor) {
            return typed(descriptor, &raw, origin).map(Some);
        }
        let variable = descriptor.env_var();
        if let Some(text) = self.environment.get(&variable).filter(|text| !text.is_empty()) {
            let origin = ValueOrigin::Environment { variable };
            return typed(descriptor, &JsonValue::String(text), origin).map(Some);
        }
        if !descriptor.references().is_empty() {
            let references = ReferenceResolver {
                step: self.step,
                config: self.config,
                environment: self.environment,
                credentials: self.credentials,
                vault: self.vault,
                resolved,
            };
            if let Some((text, origin)) = references.resolve(descriptor)? {
                registry.register(text.as_str());
                return typed(descriptor, &JsonValue::String(text), origin).map(Some);
            }
        }
        Ok(descriptor.declared_default().map(|value| ResolvedValue {
            value: value.clone(),
            origin: ValueOrigin::Default,
        }))
    }

    fn from_configuration(&self, descriptor: &ParameterDescriptor) -> Option<(JsonValue, ValueOrigin)> {
        Scope::LOOKUP_ORDER
            .into_iter()
            .filter(|scope| is_allowed(descriptor, *scope))
            .find_map(|scope| self.from_scope(descriptor, scope))
    }

    fn from_scope(
        &self,
        descriptor: &ParameterDescriptor,
        scope: Scope,
    ) -> Option<(JsonValue, ValueOrigin)> {
        if let Some(raw) = present(self.config.get(scope, descriptor.name())) {
            let key = descriptor.name().to_owned();
            return Some((raw, ValueOrigin::Configuration { scope, key }));
        }
        descriptor.aliases().iter().find_map(|alias| {
            let raw = present(self.config.get(scope, alias.name()))?;
            if alias.is_deprecated() {
                warn!(
                    step = self.step.name(),
                    parameter = descriptor.name(),
                    alias = alias.name(),
                    %scope,
                    "configuration uses deprecated alias; rename it to the parameter name"
                );
            }
            let key = alias.name().to_owned();
            Some((raw, ValueOrigin::Configuration { scope, key }))
        })
    }

    fn check_mandatory(&self, resolved: &BTreeMap<String, ResolvedValue>) -> StepResult<()> {
        let missing: Vec<StepConfigError> = self
            .step
            .parameters()
            .iter()
            .filter(|descriptor| descriptor.is_mandatory())
            .filter(|descriptor| {
                resolved
                    .get(descriptor.name())
                    .is_none_or(|value| value.value.is_empty())
            })
            .map(|descriptor| StepConfigError::mandatory_missing(self.step.name(), descriptor.name()))
            .collect();
        StepConfigError::try_aggregate(missing).map_or(Ok(()), |err| Err(Arc::new(err)))
    }
}

/// Treats `null` and empty strings from configuration as absent.
fn present(value: Option<JsonValue>) -> Option<JsonValue> {
    value.filter(|raw| match raw {
        JsonValue::Null => false,
        JsonValue::String(text) => !text.is_empty(),
        _ => true,
    })
}

fn typed(
    descriptor: &ParameterDescriptor,
    raw: &JsonValue,
    origin: ValueOrigin,
) -> StepResult<ResolvedValue> {
    let value = descriptor.param_type().coerce(raw).map_err(|found| {
        Arc::new(StepConfigError::InvalidType {
            parameter: descriptor.name().to_owned(),
            expected: descriptor.param_type(),
            found,
            origin: origin.to_string(),
        })
    })?;
    Ok(ResolvedValue { value, origin })
}

fn register_secret(descriptor: &ParameterDescriptor, value: &ResolvedValue, registry: &SecretRegistry) {
    if !(value.origin.is_secret_reference() || descriptor.is_sensitive()) {
        return;
    }
    registry.register(value.value.to_string());
}
