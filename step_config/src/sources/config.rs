//! Scoped configuration sources.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use serde_json::Value as JsonValue;

use crate::scope::Scope;

/// Per-scope configuration values addressed by parameter name or alias.
///
/// Keys may be hierarchical: `cloudFoundry/org` reads the `org` entry nested
/// under `cloudFoundry`. Implementations return `None` for absent keys and
/// for explicit `null` entries.
pub trait ConfigurationSource {
    /// Returns the raw value stored under `key` in `scope`.
    fn get(&self, scope: Scope, key: &str) -> Option<JsonValue>;
}

impl<C: ConfigurationSource + ?Sized> ConfigurationSource for &C {
    fn get(&self, scope: Scope, key: &str) -> Option<JsonValue> {
        (**self).get(scope, key)
    }
}

/// A parsed pipeline configuration document.
///
/// The document is a map with optional `general`, `stages.<stage>` and
/// `steps.<step>` sections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigDocument {
    value: JsonValue,
    path: Option<Utf8PathBuf>,
}

impl ConfigDocument {
    /// Wraps an already-parsed document.
    #[must_use]
    pub const fn new(value: JsonValue) -> Self {
        Self { value, path: None }
    }

    /// Records the file the document was read from.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// File the document was loaded from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&camino::Utf8Path> {
        self.path.as_deref()
    }

    /// Raw document contents.
    #[must_use]
    pub const fn value(&self) -> &JsonValue {
        &self.value
    }

    fn section(&self, path: &[&str]) -> Option<&JsonValue> {
        path.iter()
            .try_fold(&self.value, |node, segment| node.get(*segment))
    }
}

/// Looks up a possibly `/`-separated key inside `section`.
pub(crate) fn lookup_nested(section: &JsonValue, key: &str) -> Option<JsonValue> {
    let found = key
        .split('/')
        .try_fold(section, |node, segment| node.get(segment))?;
    (!found.is_null()).then(|| found.clone())
}

/// Pipeline configuration assembled from a custom document, default
/// documents, the active stage and the step's `PARAMETERS` object.
///
/// Within one scope the custom document wins; default documents follow from
/// the last supplied to the first.
///
/// ```
/// use serde_json::json;
/// use step_config::{ConfigDocument, ConfigurationSource, PipelineConfig, Scope};
///
/// let config = PipelineConfig::builder("cloudFoundryDeleteSpace")
///     .custom(ConfigDocument::new(json!({
///         "steps": {"cloudFoundryDeleteSpace": {"cfSpace": "space1"}},
///     })))
///     .default_document(ConfigDocument::new(json!({
///         "general": {"cloudFoundry": {"org": "org1"}},
///     })))
///     .build();
///
/// assert_eq!(config.get(Scope::Steps, "cfSpace"), Some(json!("space1")));
/// assert_eq!(config.get(Scope::General, "cloudFoundry/org"), Some(json!("org1")));
/// assert_eq!(config.get(Scope::Stages, "cfSpace"), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PipelineConfig {
    documents: Vec<ConfigDocument>,
    parameters: JsonValue,
    stage: Option<String>,
    steps: Vec<String>,
}

impl PipelineConfig {
    /// Starts a configuration for the step called `step`.
    #[must_use]
    pub fn builder(step: impl Into<String>) -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            custom: None,
            defaults: Vec::new(),
            parameters: JsonValue::Null,
            stage: None,
            steps: vec![step.into()],
        }
    }

    /// Documents in lookup priority order.
    #[must_use]
    pub fn documents(&self) -> &[ConfigDocument] {
        &self.documents
    }

    /// Active stage, if one was supplied.
    #[must_use]
    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    fn scope_sections(&self, scope: Scope) -> Vec<&JsonValue> {
        match scope {
            Scope::Parameters => vec![&self.parameters],
            Scope::General => self
                .documents
                .iter()
                .filter_map(|doc| doc.section(&["general"]))
                .collect(),
            Scope::Stages => self.stage.as_deref().map_or_else(Vec::new, |stage| {
                self.documents
                    .iter()
                    .filter_map(|doc| doc.section(&["stages", stage]))
                    .collect()
            }),
            Scope::Steps => self
                .documents
                .iter()
                .flat_map(|doc| {
                    self.steps
                        .iter()
                        .filter_map(|step| doc.section(&["steps", step]))
                })
                .collect(),
        }
    }
}

impl ConfigurationSource for PipelineConfig {
    fn get(&self, scope: Scope, key: &str) -> Option<JsonValue> {
        self.scope_sections(scope)
            .into_iter()
            .find_map(|section| lookup_nested(section, key))
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Clone, Debug)]
#[must_use]
pub struct PipelineConfigBuilder {
    custom: Option<ConfigDocument>,
    defaults: Vec<ConfigDocument>,
    parameters: JsonValue,
    stage: Option<String>,
    steps: Vec<String>,
}

impl PipelineConfigBuilder {
    /// Sets the project's own configuration document.
    pub fn custom(mut self, document: ConfigDocument) -> Self {
        self.custom = Some(document);
        self
    }

    /// Appends a default document; later defaults override earlier ones.
    pub fn default_document(mut self, document: ConfigDocument) -> Self {
        self.defaults.push(document);
        self
    }

    /// Sets the active stage, enabling the `STAGES` scope.
    pub fn stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Sets the object backing the `PARAMETERS` scope.
    pub fn parameters(mut self, parameters: JsonValue) -> Self {
        self.parameters = parameters;
        self
    }

    /// Adds alternate step names whose `steps.<alias>` sections are also read.
    pub fn step_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Freezes the configuration.
    #[must_use]
    pub fn build(self) -> PipelineConfig {
        let documents = self
            .custom
            .into_iter()
            .chain(self.defaults.into_iter().rev())
            .collect();
        PipelineConfig {
            documents,
            parameters: self.parameters,
            stage: self.stage,
            steps: self.steps,
        }
    }
}

/// In-memory configuration keyed by scope, mainly for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    scopes: BTreeMap<Scope, JsonValue>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scopes: BTreeMap::new(),
        }
    }

    /// Stores `value` under the possibly hierarchical `key` in `scope`.
    #[must_use]
    pub fn with(mut self, scope: Scope, key: &str, value: impl Into<JsonValue>) -> Self {
        let nested = key.rsplit('/').fold(value.into(), |inner, segment| {
            let mut map = serde_json::Map::new();
            map.insert(segment.to_owned(), inner);
            JsonValue::Object(map)
        });
        merge(self.scopes.entry(scope).or_insert(JsonValue::Null), nested);
        self
    }
}

fn merge(target: &mut JsonValue, incoming: JsonValue) {
    match (target, incoming) {
        (JsonValue::Object(existing), JsonValue::Object(entries)) => {
            for (key, value) in entries {
                merge(existing.entry(key).or_insert(JsonValue::Null), value);
            }
        }
        (target, incoming) => *target = incoming,
    }
}

impl ConfigurationSource for MemorySource {
    fn get(&self, scope: Scope, key: &str) -> Option<JsonValue> {
        self.scopes
            .get(&scope)
            .and_then(|section| lookup_nested(section, key))
    }
}
