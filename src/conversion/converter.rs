//! Conversion orchestrator
//!
//! Drives Ghostscript and veraPDF for a single request:
//!
//! ```text
//! Converting ──► ConversionFailed
//!     │
//!     ▼
//! Converted ──► ValidationSkipped
//!     │
//!     ▼
//! ValidationChecked (Compliant | Unconfirmed)
//! ```
//!
//! The orchestrator reads and writes the paths it is given but never deletes
//! them; the caller owns the scratch files.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::ToolsConfig;
use crate::tools::{probe, ToolError, ToolRunner};

use super::types::{ConversionFailure, ConversionOutcome, Validation};
use super::{ghostscript, verapdf};

/// Unexpected faults that collapse into [`ConversionFailure::Fault`]
#[derive(Debug, thiserror::Error)]
enum Fault {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Failed to inspect output file: {0}")]
    Io(#[from] std::io::Error),
}

/// Installed tool versions, `None` when a tool is unavailable
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    pub converter: Option<String>,
    pub validator: Option<String>,
}

/// Runs the convert/validate pipeline
#[derive(Clone)]
pub struct Converter {
    runner: Arc<dyn ToolRunner>,
    tools: ToolsConfig,
}

impl Converter {
    pub fn new(runner: Arc<dyn ToolRunner>, tools: ToolsConfig) -> Self {
        Self { runner, tools }
    }

    /// Convert `input` into a PDF/UA-flagged PDF at `output`.
    ///
    /// Never returns an error: every failure mode is folded into
    /// [`ConversionOutcome::Failed`].
    pub async fn convert(&self, input: &Path, output: &Path) -> ConversionOutcome {
        match self.try_convert(input, output).await {
            Ok(outcome) => outcome,
            Err(fault) => {
                tracing::error!(error = %fault, "Conversion aborted");
                ConversionOutcome::Failed(ConversionFailure::Fault(fault.to_string()))
            }
        }
    }

    async fn try_convert(&self, input: &Path, output: &Path) -> Result<ConversionOutcome, Fault> {
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            "Converting to PDF/UA"
        );

        let invocation = self
            .runner
            .run(&self.tools.converter, &ghostscript::pdfua_args(input, output))
            .await?;

        if !invocation.success() {
            let detail = ghostscript::error_detail(&invocation.stderr);
            tracing::warn!(
                exit_code = ?invocation.exit_code,
                detail = %detail,
                "Ghostscript reported a failure"
            );
            return Ok(ConversionOutcome::Failed(ConversionFailure::ToolFailed {
                exit_code: invocation.exit_code,
                detail,
            }));
        }

        // A zero exit code alone does not prove Ghostscript wrote anything
        let size = match tokio::fs::metadata(output).await {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };

        if size == 0 {
            tracing::warn!(output = %output.display(), "Ghostscript exited cleanly but output is empty");
            return Ok(ConversionOutcome::Failed(ConversionFailure::EmptyOutput));
        }

        tracing::info!(size, "Converted");

        let validation = self.validate(output).await;
        tracing::info!(validation = validation.label(), "Conversion complete");

        Ok(ConversionOutcome::Succeeded {
            output: output.to_path_buf(),
            validation,
        })
    }

    async fn validate(&self, document: &Path) -> Validation {
        if !self.tools.validate_output {
            return Validation::Skipped {
                reason: "validation disabled".to_string(),
            };
        }

        let validator = &self.tools.validator;

        if probe(self.runner.as_ref(), validator).await.is_none() {
            tracing::info!(validator = %validator, "Validator unavailable, skipping validation");
            return Validation::Skipped {
                reason: format!("{} not available", validator),
            };
        }

        match self.runner.run(validator, &verapdf::ua1_args(document)).await {
            Ok(invocation) if invocation.exit_code == Some(self.tools.compliant_exit_code) => {
                Validation::Compliant
            }
            Ok(invocation) => {
                tracing::info!(
                    exit_code = ?invocation.exit_code,
                    "Validator did not confirm PDF/UA-1 compliance"
                );
                Validation::Unconfirmed {
                    exit_code: invocation.exit_code,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Validator failed to run");
                Validation::Skipped {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Probe both tools' `--version` output
    pub async fn tool_status(&self) -> ToolStatus {
        let (converter, validator) = tokio::join!(
            probe(self.runner.as_ref(), &self.tools.converter),
            probe(self.runner.as_ref(), &self.tools.validator),
        );
        ToolStatus { converter, validator }
    }
}
