//! Credential store and secret vault interfaces with static implementations.

use std::collections::BTreeMap;

use camino::Utf8Path;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::file::load_required_document;
use crate::{StepConfigError, StepResult};

/// Fields of one vault entry, keyed by field name.
pub type VaultEntry = BTreeMap<String, String>;

/// Transport failure reported by a credential store or vault.
///
/// A lookup that reaches the store but finds nothing is not a failure; it is
/// reported as `Ok(None)`.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{message}")]
pub struct StoreUnavailable {
    message: String,
}

impl StoreUnavailable {
    /// Creates a failure with a human-readable reason.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Named credentials, such as the service user behind `cfCredentialsId`.
pub trait CredentialStore {
    /// Reads `field` of the credential called `credential_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreUnavailable`] when the store cannot be queried.
    fn lookup(&self, credential_id: &str, field: &str) -> Result<Option<String>, StoreUnavailable>;
}

/// Secret vault addressed by path.
pub trait SecretVault {
    /// Reads the entry stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreUnavailable`] when the vault cannot be queried.
    fn read(&self, path: &str) -> Result<Option<VaultEntry>, StoreUnavailable>;
}

/// Credential store backed by an in-memory map.
///
/// ```
/// use step_config::{CredentialStore, StaticCredentialStore};
///
/// let store = StaticCredentialStore::new().insert("cf-deploy", "username", "robot");
/// assert_eq!(store.lookup("cf-deploy", "username"), Ok(Some("robot".to_owned())));
/// assert_eq!(store.lookup("cf-deploy", "password"), Ok(None));
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticCredentialStore {
    credentials: BTreeMap<String, VaultEntry>,
}

impl StaticCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            credentials: BTreeMap::new(),
        }
    }

    /// Adds one credential field.
    #[must_use]
    pub fn insert(
        mut self,
        credential_id: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.credentials
            .entry(credential_id.into())
            .or_default()
            .insert(field.into(), value.into());
        self
    }

    /// Loads credentials from a document mapping credential ids to field maps.
    ///
    /// # Errors
    ///
    /// Returns [`StepConfigError::File`] when the file is missing, cannot be
    /// parsed, or is not a map of maps.
    pub fn from_file(path: &Utf8Path) -> StepResult<Self> {
        let document = load_required_document(path)?;
        Ok(Self {
            credentials: entries_from(path, document.value())?,
        })
    }
}

impl CredentialStore for StaticCredentialStore {
    fn lookup(&self, credential_id: &str, field: &str) -> Result<Option<String>, StoreUnavailable> {
        Ok(self
            .credentials
            .get(credential_id)
            .and_then(|fields| fields.get(field))
            .cloned())
    }
}

/// Vault backed by an in-memory map of paths to entries.
#[derive(Clone, Debug, Default)]
pub struct StaticVault {
    entries: BTreeMap<String, VaultEntry>,
}

impl StaticVault {
    /// Creates an empty vault.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds one field of the entry at `path`.
    #[must_use]
    pub fn insert(
        mut self,
        path: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.entries
            .entry(path.into())
            .or_default()
            .insert(field.into(), value.into());
        self
    }

    /// Loads entries from a document mapping vault paths to field maps.
    ///
    /// # Errors
    ///
    /// Returns [`StepConfigError::File`] when the file is missing, cannot be
    /// parsed, or is not a map of maps.
    pub fn from_file(path: &Utf8Path) -> StepResult<Self> {
        let document = load_required_document(path)?;
        Ok(Self {
            entries: entries_from(path, document.value())?,
        })
    }
}

impl SecretVault for StaticVault {
    fn read(&self, path: &str) -> Result<Option<VaultEntry>, StoreUnavailable> {
        Ok(self.entries.get(path).cloned())
    }
}

fn entries_from(path: &Utf8Path, value: &JsonValue) -> StepResult<BTreeMap<String, VaultEntry>> {
    let invalid = |detail: String| {
        std::sync::Arc::new(StepConfigError::file(
            path.as_std_path(),
            std::io::Error::new(std::io::ErrorKind::InvalidData, detail),
        ))
    };
    let JsonValue::Object(outer) = value else {
        return Err(invalid("expected a map of entries".to_owned()));
    };
    outer
        .iter()
        .map(|(id, fields)| {
            let JsonValue::Object(inner) = fields else {
                return Err(invalid(format!("entry '{id}' must be a map of fields")));
            };
            let entry = inner
                .iter()
                .filter_map(|(field, raw)| scalar_text(raw).map(|text| (field.clone(), text)))
                .collect();
            Ok((id.clone(), entry))
        })
        .collect()
}

fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(text) => Some(text.clone()),
        JsonValue::Number(number) => Some(number.to_string()),
        JsonValue::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
