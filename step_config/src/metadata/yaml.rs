//! Step metadata authored as YAML.
//!
//! The document layout is:
//!
//! ```yaml
//! metadata:
//!   name: cloudFoundryDeleteSpace
//!   aliases:
//!     - name: deleteSpace
//!   description: Deletes a space in Cloud Foundry
//! spec:
//!   inputs:
//!     params:
//!       - name: cfOrg
//!         type: string
//!         mandatory: true
//!         scope: [PARAMETERS, STAGES, STEPS, GENERAL]
//!         aliases:
//!           - name: cloudFoundry/org
//!       - name: password
//!         type: string
//!         scope: [PARAMETERS, STAGES, STEPS]
//!         resourceRef:
//!           - name: cfCredentialsId
//!             type: secret
//!             param: password
//!           - type: vaultSecret
//!             paths: ["$(vaultPath)/cloudfoundry-$(cfOrg)-$(cfSpace)"]
//! ```

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::error::{MetadataError, StepConfigError};
use crate::scope::Scope;
use crate::value::{ParamType, ParamValue};
use crate::StepResult;

use super::descriptor::ParameterDescriptor;
use super::reference::ResourceReference;
use super::step::StepMetadata;
use super::template::PathTemplate;

#[derive(Deserialize)]
struct Document {
    metadata: Header,
    #[serde(default)]
    spec: Spec,
}

#[derive(Deserialize)]
struct Header {
    name: String,
    #[serde(default)]
    aliases: Vec<AliasEntry>,
    #[serde(default)]
    description: String,
}

#[derive(Default, Deserialize)]
struct Spec {
    #[serde(default)]
    inputs: Inputs,
}

#[derive(Default, Deserialize)]
struct Inputs {
    #[serde(default)]
    params: Vec<ParamEntry>,
}

#[derive(Deserialize)]
struct AliasEntry {
    name: String,
    #[serde(default)]
    deprecated: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParamEntry {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    mandatory: bool,
    #[serde(default)]
    scope: Vec<String>,
    #[serde(default)]
    aliases: Vec<AliasEntry>,
    #[serde(default)]
    resource_ref: Vec<ReferenceEntry>,
    #[serde(default)]
    default: Option<JsonValue>,
    #[serde(default)]
    secret: bool,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct ReferenceEntry {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    param: String,
    #[serde(default)]
    paths: Vec<String>,
}

impl StepMetadata {
    /// Parses and validates a YAML step declaration.
    ///
    /// Unknown scope names are ignored with a warning, since a scope that
    /// cannot be named can never be allowed.
    ///
    /// # Errors
    ///
    /// Returns [`StepConfigError::Metadata`] when the document cannot be
    /// parsed, names an unsupported parameter type or reference kind, or fails
    /// the checks applied by [`StepMetadata::new`].
    pub fn from_yaml_str(yaml: &str) -> StepResult<Self> {
        let document: Document = serde_saphyr::from_str(yaml).map_err(|err| {
            Arc::new(StepConfigError::metadata(
                "<unnamed>",
                MetadataError::Parse(err.to_string()),
            ))
        })?;
        let step = document.metadata.name;
        let parameters = document
            .spec
            .inputs
            .params
            .into_iter()
            .map(|entry| descriptor_from(&step, entry))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| Arc::new(StepConfigError::metadata(step.clone(), source)))?;
        Self::new(
            step,
            document
                .metadata
                .aliases
                .into_iter()
                .map(|alias| alias.name)
                .collect(),
            document.metadata.description,
            parameters,
        )
    }
}

fn descriptor_from(step: &str, entry: ParamEntry) -> Result<ParameterDescriptor, MetadataError> {
    let param_type = ParamType::parse(&entry.type_name).ok_or_else(|| MetadataError::UnknownType {
        parameter: entry.name.clone(),
        type_name: entry.type_name.clone(),
    })?;
    let scopes: Vec<Scope> = entry
        .scope
        .iter()
        .filter_map(|name| {
            let parsed = Scope::parse(name);
            if parsed.is_none() {
                warn!(step, parameter = %entry.name, scope = %name, "ignoring unknown scope");
            }
            parsed
        })
        .collect();
    let mut descriptor = ParameterDescriptor::new(entry.name.clone(), param_type)
        .scopes(scopes)
        .description(entry.description);
    if entry.mandatory {
        descriptor = descriptor.mandatory();
    }
    if entry.secret {
        descriptor = descriptor.secret();
    }
    for alias in entry.aliases {
        descriptor = if alias.deprecated {
            descriptor.deprecated_alias(alias.name)
        } else {
            descriptor.alias(alias.name)
        };
    }
    for reference in entry.resource_ref {
        descriptor = descriptor.reference(reference_from(&entry.name, reference)?);
    }
    if let Some(raw) = entry.default {
        descriptor = descriptor.default_value(default_from(&entry.name, &raw)?);
    }
    Ok(descriptor)
}

fn reference_from(parameter: &str, entry: ReferenceEntry) -> Result<ResourceReference, MetadataError> {
    match entry.kind.as_str() {
        "secret" => {
            if entry.name.is_empty() || entry.param.is_empty() {
                return Err(MetadataError::Parse(format!(
                    "secret reference of parameter '{parameter}' needs both 'name' and 'param'"
                )));
            }
            Ok(ResourceReference::secret(entry.name, entry.param))
        }
        "vaultSecret" => Ok(ResourceReference::vault_secret(
            entry.paths.into_iter().map(PathTemplate::new),
        )),
        other => Err(MetadataError::UnknownReference {
            parameter: parameter.to_owned(),
            kind: other.to_owned(),
        }),
    }
}

fn default_from(parameter: &str, raw: &JsonValue) -> Result<ParamValue, MetadataError> {
    match raw {
        JsonValue::String(text) => Ok(ParamValue::from(text.as_str())),
        JsonValue::Bool(flag) => Ok(ParamValue::from(*flag)),
        JsonValue::Number(number) => number.as_i64().map(ParamValue::from).ok_or_else(|| {
            MetadataError::Parse(format!("default of parameter '{parameter}' is not an integer"))
        }),
        _ => Err(MetadataError::Parse(format!(
            "default of parameter '{parameter}' must be a scalar"
        ))),
    }
}
