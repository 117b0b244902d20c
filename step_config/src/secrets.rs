//! Invocation-scoped registry of values that must never be printed.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Replacement text written in place of a registered secret.
pub const REDACTED: &str = "****";

/// Parameter names whose values are treated as secret by convention.
const SENSITIVE_NAMES: [&str; 6] = [
    "username",
    "password",
    "token",
    "secret",
    "apikey",
    "credential",
];

/// Returns `true` when `name` conventionally carries a secret.
///
/// Matching is by case-insensitive suffix, so `cfPassword`, `githubToken` and
/// `dockerApiKey` are all sensitive while `cfCredentialsId` is not.
#[must_use]
pub fn is_sensitive_name(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    SENSITIVE_NAMES
        .iter()
        .any(|suffix| lowered.ends_with(suffix))
}

/// Set of secret values collected during one invocation.
///
/// Clones share the same set, so the registry handed to the resolver and the
/// one held by the log writer see the same registrations. Values are only
/// ever added.
///
/// ```
/// use step_config::SecretRegistry;
///
/// let registry = SecretRegistry::new();
/// let writer_view = registry.clone();
/// registry.register("s3cret");
/// assert!(writer_view.is_registered("s3cret"));
/// assert_eq!(writer_view.redact("password=s3cret"), "password=****");
/// ```
#[derive(Clone, Default)]
pub struct SecretRegistry {
    values: Arc<RwLock<BTreeSet<String>>>,
}

impl SecretRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` as secret. Empty values are ignored.
    pub fn register(&self, value: impl Into<String>) {
        let secret = value.into();
        if secret.is_empty() {
            return;
        }
        self.values.write().insert(secret);
    }

    /// Whether `value` has been registered.
    #[must_use]
    pub fn is_registered(&self, value: &str) -> bool {
        self.values.read().contains(value)
    }

    /// Number of registered values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// Replaces every occurrence of a registered value in `text` with
    /// [`REDACTED`].
    ///
    /// Longer secrets are replaced first so that a secret containing another
    /// secret is masked as a whole.
    #[must_use]
    pub fn redact<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let guard = self.values.read();
        let mut ordered: Vec<&String> = guard
            .iter()
            .filter(|secret| text.contains(secret.as_str()))
            .collect();
        if ordered.is_empty() {
            return Cow::Borrowed(text);
        }
        ordered.sort_by(|a, b| b.len().cmp(&a.len()));
        let masked = ordered
            .into_iter()
            .fold(text.to_owned(), |acc, secret| acc.replace(secret.as_str(), REDACTED));
        Cow::Owned(masked)
    }
}

impl fmt::Debug for SecretRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretRegistry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
