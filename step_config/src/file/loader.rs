//! Loading entrypoints for configuration documents.


use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::sources::ConfigDocument;
use crate::{StepResult, StepResultExt};

use super::error::{file_error, invalid_data, not_found};
use super::parser::parse_config_by_format;

/// Pipeline configuration files tried, relative to the project root, when no
/// explicit path is given.
pub const DEFAULT_CONFIG_CANDIDATES: [&str; 2] = [".pipeline/config.yml", ".pipeline/config.yaml"];

/// Load a configuration document, selecting the parser by extension.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Examples
///
/// ```rust,no_run
/// use camino::Utf8Path;
/// use step_config::file::load_document;
///
/// # fn run() -> step_config::StepResult<()> {
/// if let Some(document) = load_document(Utf8Path::new(".pipeline/config.yml"))? {
///     assert!(document.value().is_object());
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns a [`crate::StepConfigError`] if reading or parsing the file fails or the
/// document is not a map.
pub fn load_document(path: &Utf8Path) -> StepResult<Option<ConfigDocument>> {
    if !path.is_file() {
        return Ok(None);
    }
    read_document(path).map(Some)
}

/// Like [`load_document`], but a missing file is an error.
///
/// # Errors
///
/// Returns [`crate::StepConfigError::File`] when the file does not exist, in
/// addition to the failures reported by [`load_document`].
pub fn load_required_document(path: &Utf8Path) -> StepResult<ConfigDocument> {
    load_document(path)?
        .ok_or_else(|| not_found(path.as_std_path(), "configuration file does not exist"))
}

/// Finds the first existing [`DEFAULT_CONFIG_CANDIDATES`] entry below `root`.
#[must_use]
pub fn locate_pipeline_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    DEFAULT_CONFIG_CANDIDATES
        .iter()
        .map(|candidate| root.join(candidate))
        .find(|path| path.is_file())
}

fn read_document(path: &Utf8Path) -> StepResult<ConfigDocument> {
    let data = std::fs::read_to_string(path).map_err(|e| file_error(path.as_std_path(), e))?;
    let figment = parse_config_by_format(path.as_std_path(), &data)?;
    let value: JsonValue = figment.extract().into_step()?;
    if !value.is_object() {
        return Err(invalid_data(
            path.as_std_path(),
            "configuration document must be a map",
        ));
    }
    debug!(path = %path, "loaded configuration document");
    Ok(ConfigDocument::new(value).with_path(path))
}
