//! Figment provider for YAML pipeline documents, backed by `serde-saphyr`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use figment::error::Kind;
use figment::value::{Dict, Value as FigmentValue};
use figment::{Metadata, Profile, Provider};
use serde_saphyr::Options;

#[derive(Debug, Clone)]
enum Source {
    Disk,
    Text(String),
}

/// Figment provider that reads a YAML document with strict boolean parsing.
///
/// Only `true` and `false` are booleans; YAML 1.1 spellings such as `yes` or
/// `on` stay strings, so a string parameter set to `on` keeps its text.
/// An empty document yields an empty map.
#[derive(Debug, Clone)]
pub struct SaphyrYaml {
    path: PathBuf,
    source: Source,
}

impl SaphyrYaml {
    /// Provider that reads `path` each time data is requested.
    #[must_use]
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            source: Source::Disk,
        }
    }

    /// Provider over in-memory `contents`; `path` is used for diagnostics only.
    #[must_use]
    pub fn string<P, S>(path: P, contents: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            source: Source::Text(contents.into()),
        }
    }

    fn contents(&self) -> std::io::Result<String> {
        match &self.source {
            Source::Disk => std::fs::read_to_string(&self.path),
            Source::Text(text) => Ok(text.clone()),
        }
    }

    fn parse(contents: &str) -> Result<Option<FigmentValue>, serde_saphyr::Error> {
        serde_saphyr::from_str_with_options(
            contents,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
    }
}

impl Provider for SaphyrYaml {
    fn metadata(&self) -> Metadata {
        Metadata::from("YAML pipeline document", self.path.as_path())
    }

    fn data(&self) -> Result<BTreeMap<Profile, Dict>, figment::Error> {
        let contents = self.contents().map_err(|err| {
            figment::Error::from(format!("failed to read {}: {err}", self.path.display()))
        })?;
        let parsed = Self::parse(&contents).map_err(|err| {
            figment::Error::from(Kind::Message(format!(
                "failed to parse {}: {err}",
                self.path.display()
            )))
        })?;
        let dict = match parsed {
            None => Dict::new(),
            Some(value) => {
                let actual = value.to_actual();
                value
                    .into_dict()
                    .ok_or_else(|| figment::Error::from(Kind::InvalidType(actual, "map".into())))?
            }
        };
        Ok(Profile::Default.collect(dict))
    }
}
