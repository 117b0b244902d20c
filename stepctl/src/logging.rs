//! Subscriber set-up for `stepctl`.

use step_config::SecretRegistry;
use step_config::redact::redacting_stderr;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "STEPCTL_LOG";

/// Installs the global subscriber.
///
/// Every line is written to stderr through a redacting writer backed by
/// `registry`, so secrets registered after start-up are masked as well.
/// `STEPCTL_LOG` takes precedence over the `verbose` fallback.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already installed.
pub fn init(is_verbose: bool, registry: SecretRegistry) -> Result<(), TryInitError> {
    let fallback = if is_verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(redacting_stderr(registry))
                .with_target(false),
        )
        .try_init()
}
