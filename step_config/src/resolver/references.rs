//! Following credential store and vault references.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::metadata::{ParameterDescriptor, PathTemplate, ResourceReference, StepMetadata};
use crate::options::{ResolvedValue, ValueOrigin};
use crate::scope::Scope;
use crate::sources::{ConfigurationSource, CredentialStore, Environment, SecretVault};
use crate::{ENV_PREFIX, StepConfigError, StepResult};

const CREDENTIAL_STORE: &str = "credential store";
const VAULT: &str = "vault";

/// Borrowed view of everything a reference may need during one resolution.
pub(super) struct ReferenceResolver<'r> {
    pub(super) step: &'r StepMetadata,
    pub(super) config: &'r dyn ConfigurationSource,
    pub(super) environment: &'r dyn Environment,
    pub(super) credentials: Option<&'r dyn CredentialStore>,
    pub(super) vault: Option<&'r dyn SecretVault>,
    pub(super) resolved: &'r BTreeMap<String, ResolvedValue>,
}

impl ReferenceResolver<'_> {
    /// Tries the references of `descriptor` in order and returns the first hit.
    ///
    /// Misses fall through to the next reference; transport failures abort.
    pub(super) fn resolve(
        &self,
        descriptor: &ParameterDescriptor,
    ) -> StepResult<Option<(String, ValueOrigin)>> {
        for reference in descriptor.references() {
            let hit = match reference {
                ResourceReference::Secret { credential, field } => {
                    self.from_credentials(descriptor, credential, field)?
                }
                ResourceReference::VaultSecret { paths } => self.from_vault(descriptor, paths)?,
            };
            if hit.is_some() {
                return Ok(hit);
            }
        }
        Ok(None)
    }

    fn from_credentials(
        &self,
        descriptor: &ParameterDescriptor,
        credential: &str,
        field: &str,
    ) -> StepResult<Option<(String, ValueOrigin)>> {
        let Some(store) = self.credentials else {
            debug!(parameter = descriptor.name(), "no credential store configured");
            return Ok(None);
        };
        let id = self.lookup(credential).unwrap_or_else(|| credential.to_owned());
        let found = store
            .lookup(&id, field)
            .map_err(|source| Arc::new(StepConfigError::unreachable(CREDENTIAL_STORE, source)))?
            .filter(|value| !value.is_empty());
        if found.is_none() {
            debug!(parameter = descriptor.name(), credential = %id, field, "credential not found");
        }
        Ok(found.map(|value| {
            let origin = ValueOrigin::CredentialStore {
                credential: id,
                field: field.to_owned(),
            };
            (value, origin)
        }))
    }

    fn from_vault(
        &self,
        descriptor: &ParameterDescriptor,
        paths: &[PathTemplate],
    ) -> StepResult<Option<(String, ValueOrigin)>> {
        let Some(vault) = self.vault else {
            debug!(parameter = descriptor.name(), "no vault configured");
            return Ok(None);
        };
        for template in paths {
            let Some(path) = template.render(|name| self.lookup(name)) else {
                debug!(
                    parameter = descriptor.name(),
                    template = template.as_str(),
                    "skipping vault path with unresolved placeholders"
                );
                continue;
            };
            let entry = vault
                .read(&path)
                .map_err(|source| Arc::new(StepConfigError::unreachable(VAULT, source)))?;
            let found = entry
                .and_then(|mut fields| fields.remove(descriptor.name()))
                .filter(|value| !value.is_empty());
            if let Some(value) = found {
                return Ok(Some((value, ValueOrigin::Vault { path })));
            }
            debug!(parameter = descriptor.name(), %path, "vault entry not found");
        }
        Ok(None)
    }

    /// Value of a placeholder or credential id name.
    ///
    /// Declared parameters only ever use their resolved value. Other names
    /// are ambient settings such as `vaultPath`, read from configuration in
    /// lookup order and then from the environment.
    fn lookup(&self, name: &str) -> Option<String> {
        if self.step.parameter(name).is_some() {
            return self
                .resolved
                .get(name)
                .map(|resolved| resolved.value.to_string())
                .filter(|text| !text.is_empty());
        }
        Scope::LOOKUP_ORDER
            .into_iter()
            .find_map(|scope| self.config.get(scope, name).and_then(|raw| scalar_text(&raw)))
            .or_else(|| {
                self.environment
                    .get(&format!("{ENV_PREFIX}{name}"))
                    .filter(|text| !text.is_empty())
            })
    }
}

fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(text) if !text.is_empty() => Some(text.clone()),
        JsonValue::Number(number) => Some(number.to_string()),
        JsonValue::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
