//! Scripted tool runner for tests

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ToolError, ToolInvocation, ToolRunner};

type Script = dyn Fn(&str, &[OsString]) -> Result<ToolInvocation, ToolError> + Send + Sync;

/// Records every call and answers with a caller-supplied script
pub struct MockRunner {
    script: Box<Script>,
    calls: Mutex<Vec<(String, Vec<OsString>)>>,
}

impl MockRunner {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&str, &[OsString]) -> Result<ToolInvocation, ToolError> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<OsString>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ToolRunner for MockRunner {
    async fn run(&self, program: &str, args: &[OsString]) -> Result<ToolInvocation, ToolError> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        (self.script)(program, args)
    }
}

/// Build a completed invocation
pub fn exited(program: &str, args: &[OsString], code: i32, stdout: &str, stderr: &str) -> ToolInvocation {
    ToolInvocation {
        program: program.to_string(),
        args: args.to_vec(),
        exit_code: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

/// Build the error a missing executable produces
pub fn not_found(program: &str) -> ToolError {
    ToolError::from_io(
        program,
        std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
    )
}

/// Pull the Ghostscript output path out of an argument vector
pub fn output_path(args: &[OsString]) -> Option<PathBuf> {
    args.iter().find_map(|arg| {
        arg.to_str()
            .and_then(|s| s.strip_prefix("-sOutputFile="))
            .map(PathBuf::from)
    })
}

/// True for `--version` availability checks
pub fn is_version_check(args: &[OsString]) -> bool {
    args.len() == 1 && args[0] == "--version"
}
