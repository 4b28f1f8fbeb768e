//! PDF/UA Server Library
//!
//! Accepts PDF uploads and returns PDF/UA-flagged copies produced by
//! Ghostscript, optionally checked with veraPDF. The server binary is in
//! main.rs; everything it wires together lives here so tests can build the
//! same router.
//!
//! # Modules
//!
//! - `workspace`: Per-request scratch files with guaranteed cleanup
//! - `tools`: External process invocation
//! - `conversion`: Ghostscript/veraPDF orchestration
//! - `routes`: HTTP surface

pub mod config;
pub mod conversion;
pub mod error;
pub mod routes;
pub mod state;
pub mod tools;
pub mod workspace;

pub use config::Config;
pub use state::AppState;
