//! Tool invocation types

use std::ffi::OsString;

/// One completed run of an external tool
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    /// Program that was executed
    pub program: String,
    /// Arguments, in the order they were passed
    pub args: Vec<OsString>,
    /// Exit code; `None` if the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// Captured standard output (lossy UTF-8)
    pub stdout: String,
    /// Captured standard error (lossy UTF-8)
    pub stderr: String,
}

impl ToolInvocation {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Arguments joined for log output
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Failure to run a tool at all
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{program} not found: {source}")]
    NotFound {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {secs} seconds")]
    TimedOut { program: String, secs: u64 },
}

impl ToolError {
    pub fn from_io(program: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ToolError::NotFound {
                program: program.to_string(),
                source,
            }
        } else {
            ToolError::Spawn {
                program: program.to_string(),
                source,
            }
        }
    }
}
