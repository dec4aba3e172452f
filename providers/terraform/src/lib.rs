//! Drives the `terraform` CLI for a single working directory.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    process::Output,
};

use common::command::{command, find_in_path};
use tracing::debug;

mod error;
mod output;

pub use error::{TerraformError, TerraformResult};
pub use output::{extract_string_output, parse_outputs, OutputMeta, Outputs};

pub const TERRAFORM_BIN: &str = "terraform";

const INIT_ARGS: &[&str] = &["init", "-no-color", "-input=false", "-upgrade=false"];
const OUTPUT_ARGS: &[&str] = &["output", "-no-color", "-json"];

/// Variables always handed to terraform so it behaves non-interactively.
const AUTOMATION_ENV: &[(&str, &str)] = &[
    ("TF_IN_AUTOMATION", "1"),
    ("CHECKPOINT_DISABLE", "1"),
];

/// Looks up the terraform binary on `PATH`.
pub fn find_terraform() -> TerraformResult<PathBuf> {
    find_in_path(TERRAFORM_BIN).ok_or(TerraformError::NotInstalled)
}

/// Anything that can report the state outputs of a deployment.
#[async_trait::async_trait]
pub trait OutputSource {
    async fn output(&self) -> TerraformResult<Outputs>;
}

/// A terraform session bound to a working directory.
#[derive(Debug, Clone)]
pub struct Terraform {
    exec_path: PathBuf,
    working_dir: PathBuf,
    env: HashMap<String, String>,
    spinner: bool,
}

impl Terraform {
    pub fn new(
        working_dir: impl Into<PathBuf>,
        exec_path: impl Into<PathBuf>,
    ) -> TerraformResult<Self> {
        let working_dir = working_dir.into();
        if !working_dir.is_dir() {
            return Err(TerraformError::WorkingDirNotFound(working_dir));
        }

        let env = AUTOMATION_ENV
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Ok(Self {
            exec_path: exec_path.into(),
            working_dir,
            env,
            spinner: false,
        })
    }

    /// Adds `env` on top of the inherited environment of every invocation.
    pub fn set_env(&mut self, env: HashMap<String, String>) {
        self.env.extend(env);
    }

    /// Shows a spinner while long running commands execute.
    pub fn with_spinner(mut self, spinner: bool) -> Self {
        self.spinner = spinner;
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    /// Runs `terraform init` without upgrading providers or modules.
    pub async fn init(&self) -> TerraformResult<()> {
        let spinner = self.spinner.then_some("Initializing Terraform");
        let output = self.run(INIT_ARGS, spinner).await?;
        if !output.status.success() {
            return Err(TerraformError::InitFailed(failure_message(&output)));
        }
        Ok(())
    }

    async fn run(&self, args: &[&str], spinner: Option<&str>) -> TerraformResult<Output> {
        debug!("terraform {args:?}");
        let env = &self.env;
        let pending = command(&self.exec_path, args, &self.working_dir, env, spinner);
        Ok(pending.await?)
    }
}

#[async_trait::async_trait]
impl OutputSource for Terraform {
    /// Runs `terraform output -json` and parses every output.
    async fn output(&self) -> TerraformResult<Outputs> {
        let output = self.run(OUTPUT_ARGS, None).await?;
        if !output.status.success() {
            return Err(TerraformError::OutputFailed(failure_message(&output)));
        }

        let json = String::from_utf8_lossy(&output.stdout);
        let outputs = parse_outputs(&json)?;
        debug!("terraform reported {} outputs", outputs.len());
        Ok(outputs)
    }
}

/// Picks the most useful text from a failed invocation.
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_owned();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_owned();
    }

    format!("terraform exited with {}", output.status)
}

#[cfg(test)]
mod tests {
    use std::{os::unix::process::ExitStatusExt, process::ExitStatus};

    use super::*;

    fn failed(stdout: &str, stderr: &str) -> Output {
        Output {
            status: ExitStatus::from_raw(1 << 8),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn failure_message_prefers_stderr() {
        let from_stderr = failed("plan", "\nError: boom\n");
        assert_eq!(failure_message(&from_stderr), "Error: boom");

        let from_stdout = failed("Error: on stdout\n", "  ");
        assert_eq!(failure_message(&from_stdout), "Error: on stdout");

        let silent = failure_message(&failed("", ""));
        assert!(silent.starts_with("terraform exited with"), "{silent}");
    }

    #[test]
    fn new_requires_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = Terraform::new(&missing, "/usr/bin/terraform").unwrap_err();
        match err {
            TerraformError::WorkingDirNotFound(p) => assert_eq!(p, missing),
            other => panic!("unexpected error: {other}"),
        }
        assert!(Terraform::new(dir.path(), "/usr/bin/terraform").is_ok());
    }

    #[test]
    fn set_env_merges_over_automation_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut tf = Terraform::new(dir.path(), "/usr/bin/terraform").unwrap();
        tf.set_env(HashMap::from([
            ("AWS_ACCESS_KEY_ID".to_owned(), "AKIA".to_owned()),
            ("CHECKPOINT_DISABLE".to_owned(), "0".to_owned()),
        ]));

        assert_eq!(tf.env()["AWS_ACCESS_KEY_ID"], "AKIA");
        assert_eq!(tf.env()["TF_IN_AUTOMATION"], "1");
        assert_eq!(tf.env()["CHECKPOINT_DISABLE"], "0");
        assert_eq!(tf.working_dir(), dir.path());
    }
}
