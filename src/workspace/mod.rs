//! Scratch Workspace
//!
//! Per-request scratch files for the conversion pipeline:
//! - Unique, never-reused paths (UUID v4 names)
//! - Release exactly once, either explicitly or when the handle is dropped
//! - A response body stream that releases its file when the transfer ends

mod scratch;
mod stream;

pub use scratch::{ScratchFile, ScratchWorkspace, PDF_SUFFIX};
pub use stream::ScratchFileStream;
