//! Resource references: pointers to credential store and vault secrets.

use std::fmt;

use super::template::PathTemplate;

/// Kind of a [`ResourceReference`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ReferenceKind {
    /// Named credential in a credential store.
    Secret,
    /// Secret stored in a vault under a templated path.
    VaultSecret,
}

impl ReferenceKind {
    /// Name used in metadata declarations.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secret => "secret",
            Self::VaultSecret => "vaultSecret",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declarative pointer to an externally stored value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResourceReference {
    /// Reads `field` of the credential identified by `credential`.
    ///
    /// When a parameter named `credential` resolves, its value is the
    /// credential id; otherwise `credential` is used literally.
    Secret {
        /// Credential id, or the name of a parameter holding it.
        credential: String,
        /// Field to extract, such as `username` or `password`.
        field: String,
    },
    /// Reads the vault entry at the first path whose placeholders all resolve
    /// and whose entry exists.
    VaultSecret {
        /// Candidate paths in priority order.
        paths: Vec<PathTemplate>,
    },
}

impl ResourceReference {
    /// Creates a credential store reference.
    #[must_use]
    pub fn secret(credential: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Secret {
            credential: credential.into(),
            field: field.into(),
        }
    }

    /// Creates a vault reference.
    #[must_use]
    pub fn vault_secret(paths: impl IntoIterator<Item = PathTemplate>) -> Self {
        Self::VaultSecret {
            paths: paths.into_iter().collect(),
        }
    }

    /// Kind of this reference.
    #[must_use]
    pub const fn kind(&self) -> ReferenceKind {
        match self {
            Self::Secret { .. } => ReferenceKind::Secret,
            Self::VaultSecret { .. } => ReferenceKind::VaultSecret,
        }
    }

    /// Vault templates of this reference; empty for credential references.
    #[must_use]
    pub fn templates(&self) -> &[PathTemplate] {
        match self {
            Self::Secret { .. } => &[],
            Self::VaultSecret { paths } => paths,
        }
    }

    /// Names this reference needs resolved before it can be followed.
    pub(crate) fn dependencies(&self) -> Vec<&str> {
        match self {
            Self::Secret { credential, .. } => vec![credential.as_str()],
            Self::VaultSecret { paths } => {
                paths.iter().flat_map(|path| path.placeholders()).collect()
            }
        }
    }
}
