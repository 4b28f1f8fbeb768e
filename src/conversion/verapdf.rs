//! veraPDF argument contract

use std::ffi::OsString;
use std::path::Path;

/// Validation profile: PDF/UA-1
pub const UA1_FLAVOUR: &str = "ua1";

/// Arguments validating `document` against PDF/UA-1
pub fn ua1_args(document: &Path) -> Vec<OsString> {
    vec![
        OsString::from("--flavour"),
        OsString::from(UA1_FLAVOUR),
        document.as_os_str().to_os_string(),
    ]
}
