//! Pipeline step runner.
//!
//! `stepctl <step> [flags]` resolves the step's parameters from the command
//! line, pipeline configuration, `PIPER_*` environment variables and the
//! file-backed credential store and vault, then runs the step body. Log
//! output passes through a redacting writer so resolved secrets never appear
//! verbatim, and a successful run ends with a `SUCCESS` line.

pub mod cli;
pub mod error;
pub mod logging;
pub mod run;
pub mod steps;
pub mod telemetry;

pub use error::StepctlError;
pub use run::run;
