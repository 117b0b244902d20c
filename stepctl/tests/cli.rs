//! End-to-end tests running the `stepctl` binary.

use std::fs;
use std::process::Output;

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const PIPELINE_CONFIG: &str = "\
general:
  cloudFoundry:
    org: org1
    space: space1
  vaultPath: team
stages:
  Release:
    includeAddon: false
steps:
  abapEnvironmentCreateSystem:
    abapSystemSizeOfRuntime: 4
";

const CREDENTIALS: &str = "\
cfCredentialsId:
  username: robot-user
";

const VAULT: &str = r#"{
  "team/cloudfoundry-org1-space1": {"username": "vault-user", "password": "vault-pass"}
}"#;

/// A project directory with pipeline configuration, credentials and vault.
#[fixture]
fn project() -> TempDir {
    let dir = tempfile::tempdir().expect("create project directory");
    fs::create_dir_all(dir.path().join(".pipeline")).expect("create .pipeline");
    fs::write(dir.path().join(".pipeline/config.yml"), PIPELINE_CONFIG).expect("write config");
    fs::write(dir.path().join("credentials.yml"), CREDENTIALS).expect("write credentials");
    fs::write(dir.path().join("vault.json"), VAULT).expect("write vault");
    dir
}

fn stepctl(dir: &TempDir, args: &[&str]) -> Result<Output> {
    #[expect(deprecated, reason = "cargo_bin is the standard assert_cmd API")]
    let mut cmd = Command::cargo_bin("stepctl").context("locate stepctl binary")?;
    cmd.current_dir(dir.path())
        .env_remove("STEPCTL_LOG")
        .env_remove("PIPER_stageName")
        .args(args);
    cmd.output().context("run stepctl")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[rstest]
fn successful_run_logs_success(project: TempDir) -> Result<()> {
    let output = stepctl(
        &project,
        &[
            "abapEnvironmentCreateSystem",
            "--credentials-file",
            "credentials.yml",
            "--vault-file",
            "vault.json",
        ],
    )?;
    let log = stderr(&output);
    ensure!(output.status.success(), "stepctl failed: {log}");
    ensure!(log.contains("SUCCESS"), "missing SUCCESS marker: {log}");
    Ok(())
}

#[rstest]
fn secrets_are_masked_in_verbose_output(project: TempDir) -> Result<()> {
    let output = stepctl(
        &project,
        &[
            "--verbose",
            "abapEnvironmentCreateSystem",
            "--credentials-file",
            "credentials.yml",
            "--vault-file",
            "vault.json",
        ],
    )?;
    let log = stderr(&output);
    ensure!(output.status.success(), "stepctl failed: {log}");
    ensure!(log.contains("DEBUG"), "verbose output expected: {log}");
    ensure!(log.contains("****"), "redaction marker expected: {log}");
    ensure!(!log.contains("robot-user"), "username leaked: {log}");
    ensure!(!log.contains("vault-pass"), "password leaked: {log}");
    Ok(())
}

#[rstest]
fn missing_mandatory_parameters_exit_with_usage_status(project: TempDir) -> Result<()> {
    let output = stepctl(&project, &["cloudFoundryDeleteSpace"])?;
    let log = stderr(&output);
    ensure!(output.status.code() == Some(2), "unexpected status: {log}");
    ensure!(log.contains("username"), "missing parameter not named: {log}");
    ensure!(!log.contains("SUCCESS"), "failure reported success: {log}");
    ensure!(log.contains("configuration"), "error category missing: {log}");
    Ok(())
}

#[rstest]
fn command_line_values_satisfy_mandatory_parameters(project: TempDir) -> Result<()> {
    let output = stepctl(
        &project,
        &[
            "cloudFoundryDeleteSpace",
            "--username",
            "cli-user",
            "--password",
            "cli-pass",
            "--cfSpace",
            "doomed",
        ],
    )?;
    let log = stderr(&output);
    ensure!(output.status.success(), "stepctl failed: {log}");
    ensure!(log.contains("doomed"), "space not logged: {log}");
    ensure!(!log.contains("cli-pass"), "password leaked: {log}");
    Ok(())
}

#[rstest]
fn malformed_parameters_json_fails(project: TempDir) -> Result<()> {
    let output = stepctl(
        &project,
        &["cloudFoundryDeleteSpace", "--parameters-json", "[1]"],
    )?;
    ensure!(output.status.code() == Some(1), "unexpected status");
    ensure!(stderr(&output).contains("--parameters-json"));
    Ok(())
}

#[rstest]
fn unknown_flags_are_usage_errors(project: TempDir) -> Result<()> {
    let output = stepctl(&project, &["cloudFoundryDeleteSpace", "--cfRegion", "eu"])?;
    ensure!(output.status.code() == Some(2), "unexpected status");
    Ok(())
}

#[rstest]
fn telemetry_can_be_disabled(project: TempDir) -> Result<()> {
    let args = [
        "abapEnvironmentCreateSystem",
        "--credentials-file",
        "credentials.yml",
        "--vault-file",
        "vault.json",
    ];
    let with = stderr(&stepctl(&project, &args)?);
    ensure!(with.contains("telemetry"), "telemetry record expected: {with}");

    let mut silenced = vec!["--no-telemetry"];
    silenced.extend(args);
    let without = stderr(&stepctl(&project, &silenced)?);
    ensure!(!without.contains("errorCategory"), "telemetry emitted: {without}");
    Ok(())
}
