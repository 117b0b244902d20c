//! CLI entrypoint for `stepctl`.

use std::process::ExitCode;

fn main() -> ExitCode {
    stepctl::run(std::env::args_os())
}
