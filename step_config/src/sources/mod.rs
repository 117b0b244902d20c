//! Collaborators the resolver reads values from.
//!
//! Each source sits behind a narrow trait so that tests can substitute
//! in-memory fakes and the binary can plug in file-backed implementations.

mod config;
mod environment;
mod stores;

pub use config::{ConfigDocument, ConfigurationSource, MemorySource, PipelineConfig, PipelineConfigBuilder};
pub use environment::{Environment, ProcessEnvironment};
pub use stores::{
    CredentialStore, SecretVault, StaticCredentialStore, StaticVault, StoreUnavailable, VaultEntry,
};
