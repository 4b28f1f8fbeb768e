//! Conversion Route
//!
//! `POST /convert` accepts a multipart upload in the `pdf_file` field and
//! answers with the PDF/UA-flagged PDF as an attachment, or a JSON error.
//!
//! Scratch file ownership stays in this module: the input file is released
//! as soon as conversion finishes, the output file either on failure or once
//! its response stream ends. A conversion that has started always runs to
//! completion, even when the client has gone away.

use axum::{
    body::Body,
    extract::{multipart::Field, multipart::MultipartError, DefaultBodyLimit, Multipart, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tokio::io::AsyncWriteExt;

use crate::conversion::{ConversionOutcome, Validation};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::workspace::{ScratchFile, ScratchFileStream, PDF_SUFFIX};

/// Multipart field carrying the PDF
pub const UPLOAD_FIELD: &str = "pdf_file";

/// Prefix for the converted file's download name
pub const DOWNLOAD_PREFIX: &str = "pdfua_";

/// Response header reporting the validator's verdict
pub const VALIDATION_HEADER: &str = "x-pdfua-validation";

/// Create the conversion router
pub fn router(state: AppState) -> Router<AppState> {
    let max_bytes = state.config().upload.max_bytes;

    Router::new()
        .route("/convert", post(convert_pdf))
        .route_layer(middleware::from_fn_with_state(state, reject_oversized))
        .layer(DefaultBodyLimit::max(max_bytes))
}

// ============================================================================
// Middleware
// ============================================================================

/// Refuse bodies whose declared length exceeds the ceiling before any
/// handler logic runs. Bodies without a Content-Length are caught by the
/// body limit while streaming.
async fn reject_oversized(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let upload = &state.config().upload;

    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    if let Some(length) = declared {
        if length > upload.max_bytes as u64 {
            tracing::warn!(
                content_length = length,
                max_bytes = upload.max_bytes,
                "Rejecting oversized upload"
            );
            return AppError::PayloadTooLarge {
                max_megabytes: upload.max_megabytes(),
            }
            .into_response();
        }
    }

    next.run(request).await
}

// ============================================================================
// Handler
// ============================================================================

/// POST /convert
async fn convert_pdf(State(state): State<AppState>, mut multipart: Multipart) -> Result<Response> {
    let max_megabytes = state.config().upload.max_megabytes();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| read_error(e, max_megabytes))?
    {
        // Browsers send an empty filename for an empty file input; a field
        // with no filename at all is a plain form value, not a file.
        if field.name() == Some(UPLOAD_FIELD) && field.file_name().is_some() {
            return handle_upload(&state, field).await;
        }
    }

    Err(AppError::InvalidUpload("No file uploaded".to_string()))
}

async fn handle_upload(state: &AppState, mut field: Field<'_>) -> Result<Response> {
    let filename = field.file_name().unwrap_or_default().to_string();
    validate_filename(&filename)?;

    let workspace = state.workspace();
    let input = workspace.allocate(PDF_SUFFIX).await.map_err(processing)?;
    let output = workspace.allocate(PDF_SUFFIX).await.map_err(processing)?;

    let max_megabytes = state.config().upload.max_megabytes();
    let size = save_upload(&mut field, &input, max_megabytes).await?;

    tracing::info!(filename = %filename, size, "Upload received");

    // The task owns both scratch files. If the client disconnects, the
    // handler future is dropped but the tool still runs to completion and
    // the files are released only after it exits.
    let converter = state.converter().clone();
    let (outcome, output) = tokio::spawn(async move {
        let outcome = converter.convert(input.path(), output.path()).await;
        input.release().await;
        (outcome, output)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Conversion task failed: {}", e)))?;

    match outcome {
        ConversionOutcome::Succeeded { validation, .. } => {
            tracing::info!(filename = %filename, "{}", validation.message());
            stream_download(output, &download_name(&filename), &validation).await
        }
        ConversionOutcome::Failed(failure) => {
            output.release().await;
            Err(failure.into())
        }
    }
}

/// Stream the upload into `target`, returning the number of bytes written
async fn save_upload(field: &mut Field<'_>, target: &ScratchFile, max_megabytes: usize) -> Result<u64> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(target.path())
        .await
        .map_err(processing)?;

    let mut written = 0u64;
    while let Some(chunk) = field.chunk().await.map_err(|e| {
        if is_too_large(&e) {
            AppError::PayloadTooLarge { max_megabytes }
        } else {
            AppError::Processing(e.to_string())
        }
    })? {
        file.write_all(&chunk).await.map_err(processing)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(processing)?;
    Ok(written)
}

/// Build the attachment response; `output` is released when the body ends
async fn stream_download(output: ScratchFile, filename: &str, validation: &Validation) -> Result<Response> {
    let size = tokio::fs::metadata(output.path())
        .await
        .map_err(processing)?
        .len();

    let stream = ScratchFileStream::open(output).await.map_err(processing)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_LENGTH, size)
        .header(header::CONTENT_DISPOSITION, content_disposition(filename))
        .header(VALIDATION_HEADER, validation.label())
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(e.to_string()))
}

// ============================================================================
// Helpers
// ============================================================================

fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(AppError::InvalidUpload("No file selected".to_string()));
    }
    if !is_pdf_filename(filename) {
        return Err(AppError::InvalidUpload("File must be a PDF".to_string()));
    }
    Ok(())
}

/// Check if the filename has a `.pdf` extension (any case)
pub fn is_pdf_filename(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}

/// Download name for a converted upload: directory components stripped,
/// quotes and control characters replaced.
pub fn download_name(original: &str) -> String {
    let base = original
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(original);

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_control() || c == '"' { '_' } else { c })
        .collect();

    format!("{}{}", DOWNLOAD_PREFIX, cleaned)
}

fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(filename)
    )
}

fn is_too_large(err: &MultipartError) -> bool {
    err.status() == StatusCode::PAYLOAD_TOO_LARGE
}

fn read_error(err: MultipartError, max_megabytes: usize) -> AppError {
    if is_too_large(&err) {
        AppError::PayloadTooLarge { max_megabytes }
    } else {
        tracing::warn!("Failed to read multipart upload: {}", err);
        AppError::InvalidUpload(format!("Failed to read upload: {}", err.body_text()))
    }
}

fn processing(err: impl std::fmt::Display) -> AppError {
    AppError::Processing(err.to_string())
}
