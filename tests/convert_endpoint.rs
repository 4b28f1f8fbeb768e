//! End-to-end tests for `POST /convert` with stand-in tool executables.
//!
//! Each test writes small shell scripts that mimic Ghostscript and veraPDF
//! closely enough to exercise the real process runner.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use pdfua_server::{routes, AppState, Config};

const BOUNDARY: &str = "pdfua-e2e-boundary";

/// Ghostscript stand-in: checks the leading flags, writes 8KB to the output
const GS_OK: &str = r#"#!/bin/sh
[ "$1" = "-dPDFA" ] && [ "$2" = "-dPDFUA" ] || { echo "Error: unexpected arguments" >&2; exit 2; }
for arg in "$@"; do
  case "$arg" in
    -sOutputFile=*) out="${arg#-sOutputFile=}" ;;
  esac
done
dd if=/dev/zero of="$out" bs=1024 count=8 2>/dev/null
"#;

/// Ghostscript stand-in that only creates its output after a delay
const GS_SLOW: &str = r#"#!/bin/sh
sleep 1
for arg in "$@"; do
  case "$arg" in
    -sOutputFile=*) out="${arg#-sOutputFile=}" ;;
  esac
done
dd if=/dev/zero of="$out" bs=1024 count=8 2>/dev/null
"#;

const GS_FAIL: &str = r#"#!/bin/sh
echo "GPL Ghostscript 10.02.1" >&2
echo "Error: malformed xref" >&2
exit 1
"#;

const GS_SILENT: &str = "#!/bin/sh\nexit 0\n";

const VERAPDF_COMPLIANT: &str = r#"#!/bin/sh
case "$1" in
  --version) echo "veraPDF 1.26.2"; exit 0 ;;
  --flavour) [ "$2" = "ua1" ] && [ -s "$3" ] && exit 0 ;;
esac
exit 1
"#;

struct Env {
    _tools: tempfile::TempDir,
    scratch: tempfile::TempDir,
    state: AppState,
}

fn install(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn env(gs: Option<&str>, verapdf: Option<&str>) -> Env {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.workspace.scratch_dir = Some(scratch.path().to_path_buf());
    config.tools.converter = match gs {
        Some(script) => install(tools.path(), "gs", script).display().to_string(),
        None => tools.path().join("missing-gs").display().to_string(),
    };
    config.tools.validator = match verapdf {
        Some(script) => install(tools.path(), "verapdf", script).display().to_string(),
        None => tools.path().join("missing-verapdf").display().to_string(),
    };

    Env {
        _tools: tools,
        scratch,
        state: AppState::new(config),
    }
}

impl Env {
    fn upload_request(filename: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"pdf_file\"; filename=\"{f}\"\r\n\
                 Content-Type: application/pdf\r\n\r\n",
                b = BOUNDARY,
                f = filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/convert")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap()
    }

    async fn upload(&self, filename: &str, data: &[u8]) -> axum::response::Response {
        routes::router(self.state.clone())
            .oneshot(Self::upload_request(filename, data))
            .await
            .unwrap()
    }

    fn assert_clean(&self) {
        assert_eq!(self.state.workspace().in_use(), 0);
        assert_eq!(std::fs::read_dir(self.scratch.path()).unwrap().count(), 0);
    }
}

async fn error_message(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    body["error"].as_str().unwrap().to_string()
}

fn sample_pdf() -> Vec<u8> {
    let mut data = b"%PDF-1.4\n".to_vec();
    data.resize(10 * 1024, b' ');
    data
}

#[tokio::test]
async fn converts_and_validates_upload() {
    let env = env(Some(GS_OK), Some(VERAPDF_COMPLIANT));

    let response = env.upload("sample.pdf", &sample_pdf()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-pdfua-validation"], "compliant");
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("filename=\"pdfua_sample.pdf\""));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(body.len(), 8 * 1024);
    env.assert_clean();
}

#[tokio::test]
async fn reports_converter_error_line() {
    let env = env(Some(GS_FAIL), Some(VERAPDF_COMPLIANT));

    let response = env.upload("sample.pdf", &sample_pdf()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error_message(response).await,
        "Conversion failed: Error: malformed xref"
    );
    env.assert_clean();
}

#[tokio::test]
async fn skips_validation_without_validator() {
    let env = env(Some(GS_OK), None);

    let response = env.upload("sample.pdf", &sample_pdf()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-pdfua-validation"], "skipped");
    drop(response);
    env.assert_clean();
}

#[tokio::test]
async fn empty_output_is_not_success() {
    let env = env(Some(GS_SILENT), Some(VERAPDF_COMPLIANT));

    let response = env.upload("sample.pdf", &sample_pdf()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error_message(response).await,
        "Conversion completed but output file is empty"
    );
    env.assert_clean();
}

#[tokio::test]
async fn missing_converter_is_reported() {
    let env = env(None, Some(VERAPDF_COMPLIANT));

    let response = env.upload("sample.pdf", &sample_pdf()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(response).await.starts_with("Conversion error:"));
    env.assert_clean();
}

#[tokio::test]
async fn disconnect_during_conversion_leaves_nothing_behind() {
    let env = env(Some(GS_SLOW), None);

    let request = Env::upload_request("sample.pdf", &sample_pdf());
    let pending = tokio::spawn(routes::router(env.state.clone()).oneshot(request));

    tokio::time::sleep(Duration::from_millis(300)).await;
    pending.abort();
    assert!(pending.await.unwrap_err().is_cancelled());

    // The converter is still running and its files are still accounted for
    assert_eq!(env.state.workspace().in_use(), 2);

    let deadline = Instant::now() + Duration::from_secs(10);
    while env.state.workspace().in_use() > 0 && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    env.assert_clean();
}
