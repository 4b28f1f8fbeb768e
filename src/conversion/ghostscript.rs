//! Ghostscript argument contract and diagnostics

use std::ffi::OsString;
use std::path::Path;

/// Fallback when Ghostscript fails without writing anything to stderr
pub const UNKNOWN_ERROR: &str = "Unknown Ghostscript error";

/// Flags for PDF/A + PDF/UA output through the pdfwrite device.
///
/// Order and spelling are part of the contract with Ghostscript.
const PDFUA_FLAGS: &[&str] = &[
    "-dPDFA",
    "-dPDFUA",
    "-dNOPAUSE",
    "-dBATCH",
    "-sColorConversionStrategy=UseDeviceIndependentColor",
    "-sDEVICE=pdfwrite",
    "-dPDFACompatibilityPolicy=2",
    "-dCompatibilityLevel=1.7",
    "-dDetectDuplicateImages=true",
    "-dCompressPages=true",
    "-dCompressFonts=true",
];

/// Full argument vector for converting `input` into `output`
pub fn pdfua_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = PDFUA_FLAGS.iter().map(OsString::from).collect();

    let mut output_flag = OsString::from("-sOutputFile=");
    output_flag.push(output);
    args.push(output_flag);

    args.push(input.as_os_str().to_os_string());
    args
}

/// Reduce Ghostscript's stderr to the line worth showing a user.
///
/// Picks the first non-blank line mentioning "error" (any case). Without
/// one, the whole stream is returned; an empty stream becomes
/// [`UNKNOWN_ERROR`].
pub fn error_detail(stderr: &str) -> String {
    if stderr.is_empty() {
        return UNKNOWN_ERROR.to_string();
    }

    stderr
        .lines()
        .find(|line| !line.trim().is_empty() && line.to_lowercase().contains("error"))
        .map(|line| line.trim_end().to_string())
        .unwrap_or_else(|| stderr.to_string())
}
