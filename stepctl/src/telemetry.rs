//! Per-invocation telemetry record.
//!
//! Only the record and a log-backed sink live here; shipping records to a
//! collector is left to other [`TelemetrySink`] implementations.

use std::time::Duration;

use serde::Serialize;
use step_config::ErrorCategory;
use tracing::info;

/// Outcome of one step invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryData {
    /// Step that ran.
    pub step_name: String,
    /// `"0"` on success, `"1"` otherwise.
    pub error_code: String,
    /// Category of the failure, `undefined` on success.
    pub error_category: ErrorCategory,
    /// Wall-clock duration in milliseconds.
    pub duration: u64,
    /// Correlation id supplied on the command line, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl TelemetryData {
    /// Record for a successful run.
    #[must_use]
    pub fn success(step_name: &str, elapsed: Duration, correlation_id: Option<String>) -> Self {
        Self {
            step_name: step_name.to_owned(),
            error_code: "0".to_owned(),
            error_category: ErrorCategory::Undefined,
            duration: millis(elapsed),
            correlation_id,
        }
    }

    /// Record for a failed run.
    #[must_use]
    pub fn failure(
        step_name: &str,
        category: ErrorCategory,
        elapsed: Duration,
        correlation_id: Option<String>,
    ) -> Self {
        Self {
            step_name: step_name.to_owned(),
            error_code: "1".to_owned(),
            error_category: category,
            duration: millis(elapsed),
            correlation_id,
        }
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Destination for telemetry records.
pub trait TelemetrySink {
    /// Delivers one record.
    fn send(&self, data: &TelemetryData);
}

/// Emits records as an `info` event through the redacting log writer.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn send(&self, data: &TelemetryData) {
        match serde_json::to_string(data) {
            Ok(payload) => info!(telemetry = %payload, "telemetry"),
            Err(err) => info!(error = %err, "telemetry record could not be encoded"),
        }
    }
}

/// Discards every record; used under `--no-telemetry`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Disabled;

impl TelemetrySink for Disabled {
    fn send(&self, _data: &TelemetryData) {}
}
