//! PDF/UA Conversion Module
//!
//! Converts an uploaded PDF into a PDF/UA-flagged PDF using Ghostscript, then
//! optionally checks the result with veraPDF.
//!
//! ## Requirements
//!
//! - `gs` (Ghostscript) must be installed and available in PATH
//! - `verapdf` is optional; without it conversions succeed unvalidated
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pdfua_server::conversion::Converter;
//!
//! let converter = Converter::new(runner, config.tools.clone());
//! match converter.convert(input.path(), output.path()).await {
//!     ConversionOutcome::Succeeded { validation, .. } => { /* stream output */ }
//!     ConversionOutcome::Failed(failure) => { /* report failure */ }
//! }
//! ```

mod converter;
pub mod ghostscript;
mod types;
pub mod verapdf;

pub use converter::{Converter, ToolStatus};
pub use types::{ConversionFailure, ConversionOutcome, Validation};
