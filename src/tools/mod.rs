//! External Tool Module
//!
//! Runs command-line tools (Ghostscript, veraPDF) and captures their results.
//! A tool that runs and exits non-zero is a normal result; only a tool that
//! cannot be started is an error.

mod runner;
mod types;

pub use runner::{probe, ProcessRunner, ToolRunner};
pub use types::{ToolError, ToolInvocation};

#[cfg(test)]
pub mod mock;
