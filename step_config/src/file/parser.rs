//! Format-specific parsing of configuration documents.

use std::path::Path;

use figment::Figment;
use figment::providers::{Format, Json};
#[cfg(feature = "toml")]
use figment::providers::Toml;

use crate::StepResult;

use super::error::file_error;
#[cfg(feature = "yaml")]
use super::yaml::SaphyrYaml;

/// Parse configuration data according to the file extension.
///
/// `.json` files are parsed as JSON and `.toml` files as TOML; everything
/// else, including `.yml` and `.yaml`, is treated as YAML, the native pipeline
/// configuration format. The `yaml` and `toml` features must be enabled for
/// those formats to be parsed.
///
/// # Errors
///
/// Returns a [`crate::StepConfigError::File`] if the contents fail to parse or
/// the required feature is disabled.
pub(super) fn parse_config_by_format(path: &Path, data: &str) -> StepResult<Figment> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let figment = match ext.as_deref() {
        Some("json") => {
            serde_json::from_str::<serde_json::Value>(data).map_err(|e| file_error(path, e))?;
            Figment::from(Json::string(data))
        }
        Some("toml") => {
            #[cfg(feature = "toml")]
            {
                toml::from_str::<toml::Value>(data).map_err(|e| file_error(path, e))?;
                Figment::from(Toml::string(data))
            }
            #[cfg(not(feature = "toml"))]
            {
                return Err(file_error(
                    path,
                    std::io::Error::other(
                        "toml feature disabled: enable the 'toml' feature to support this file format",
                    ),
                ));
            }
        }
        _ => {
            #[cfg(feature = "yaml")]
            {
                Figment::from(SaphyrYaml::string(path.to_path_buf(), data.to_owned()))
            }
            #[cfg(not(feature = "yaml"))]
            {
                return Err(file_error(
                    path,
                    std::io::Error::other(
                        "yaml feature disabled: enable the 'yaml' feature to support this file format",
                    ),
                ));
            }
        }
    };

    Ok(figment)
}
