//! Reading pipeline configuration and secret documents from disk.

mod error;
mod loader;
mod parser;
#[cfg(feature = "yaml")]
mod yaml;

pub use loader::{
    DEFAULT_CONFIG_CANDIDATES, load_document, load_required_document, locate_pipeline_config,
};
#[cfg(feature = "yaml")]
pub use yaml::SaphyrYaml;
