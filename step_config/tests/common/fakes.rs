//! Recording credential store and vault doubles.

use std::cell::RefCell;
use std::collections::BTreeMap;

use step_config::{CredentialStore, SecretVault, StoreUnavailable, VaultEntry};

/// Credential store that records every lookup.
#[derive(Default)]
pub struct RecordingStore {
    credentials: BTreeMap<(String, String), String>,
    failure: Option<StoreUnavailable>,
    pub lookups: RefCell<Vec<String>>,
}

impl RecordingStore {
    pub fn with(mut self, id: &str, field: &str, value: &str) -> Self {
        self.credentials
            .insert((id.to_owned(), field.to_owned()), value.to_owned());
        self
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(StoreUnavailable::new(reason)),
            ..Self::default()
        }
    }
}

impl CredentialStore for RecordingStore {
    fn lookup(&self, credential_id: &str, field: &str) -> Result<Option<String>, StoreUnavailable> {
        self.lookups
            .borrow_mut()
            .push(format!("{credential_id}/{field}"));
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        Ok(self
            .credentials
            .get(&(credential_id.to_owned(), field.to_owned()))
            .cloned())
    }
}

/// Vault that records every path read.
#[derive(Default)]
pub struct RecordingVault {
    entries: BTreeMap<String, VaultEntry>,
    failure: Option<StoreUnavailable>,
    pub reads: RefCell<Vec<String>>,
}

impl RecordingVault {
    pub fn with(mut self, path: &str, field: &str, value: &str) -> Self {
        self.entries
            .entry(path.to_owned())
            .or_default()
            .insert(field.to_owned(), value.to_owned());
        self
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(StoreUnavailable::new(reason)),
            ..Self::default()
        }
    }

    pub fn read_paths(&self) -> Vec<String> {
        self.reads.borrow().clone()
    }
}

impl SecretVault for RecordingVault {
    fn read(&self, path: &str) -> Result<Option<VaultEntry>, StoreUnavailable> {
        self.reads.borrow_mut().push(path.to_owned());
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        Ok(self.entries.get(path).cloned())
    }
}
