//! Tool runners
//!
//! `ToolRunner` is the seam between the conversion pipeline and the operating
//! system. `ProcessRunner` spawns real processes; tests substitute a scripted
//! runner.

use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::types::{ToolError, ToolInvocation};

/// Runs an external program to completion
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run `program` with `args`, capturing exit status and both output streams.
    ///
    /// Returns `Err` only when the program could not be run; a non-zero exit
    /// code is reported through [`ToolInvocation::exit_code`].
    async fn run(&self, program: &str, args: &[OsString]) -> Result<ToolInvocation, ToolError>;
}

/// Spawns tools as child processes
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[OsString]) -> Result<ToolInvocation, ToolError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Without a timeout a started tool always runs to completion, even if
        // the request that started it has gone away.
        if self.timeout.is_some() {
            cmd.kill_on_drop(true);
        }

        let started = std::time::Instant::now();

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| ToolError::TimedOut {
                    program: program.to_string(),
                    secs: limit.as_secs(),
                })?,
            None => cmd.output().await,
        }
        .map_err(|e| ToolError::from_io(program, e))?;

        let invocation = ToolInvocation {
            program: program.to_string(),
            args: args.to_vec(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        tracing::debug!(
            command = %invocation.command_line(),
            exit_code = ?invocation.exit_code,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Tool finished"
        );

        Ok(invocation)
    }
}

/// Lightweight availability check: `<program> --version`.
///
/// Returns the first line of the version output, or `None` if the program
/// cannot be started or exits non-zero.
pub async fn probe(runner: &dyn ToolRunner, program: &str) -> Option<String> {
    match runner.run(program, &[OsString::from("--version")]).await {
        Ok(invocation) if invocation.success() => Some(
            invocation
                .stdout
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or_default()
                .to_string(),
        ),
        Ok(invocation) => {
            tracing::debug!(
                program,
                exit_code = ?invocation.exit_code,
                "Version check exited non-zero"
            );
            None
        }
        Err(e) => {
            tracing::debug!(program, error = %e, "Version check failed");
            None
        }
    }
}
