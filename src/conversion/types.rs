//! Conversion outcome types

use std::fmt;
use std::path::PathBuf;

/// Result of one conversion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Ghostscript produced a non-empty PDF at `output`
    Succeeded {
        output: PathBuf,
        validation: Validation,
    },
    /// No usable output
    Failed(ConversionFailure),
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Succeeded { .. })
    }

    /// User-facing summary
    pub fn message(&self) -> String {
        match self {
            ConversionOutcome::Succeeded { validation, .. } => validation.message(),
            ConversionOutcome::Failed(failure) => failure.to_string(),
        }
    }
}

/// What the validator said about a converted document.
///
/// Advisory only: every variant belongs to a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Validator disabled, not installed, or could not be run
    Skipped { reason: String },
    /// Validator confirmed PDF/UA-1 compliance
    Compliant,
    /// Validator ran but did not confirm compliance
    Unconfirmed { exit_code: Option<i32> },
}

impl Validation {
    /// Short label, used for the response header
    pub fn label(&self) -> &'static str {
        match self {
            Validation::Skipped { .. } => "skipped",
            Validation::Compliant => "compliant",
            Validation::Unconfirmed { .. } => "unconfirmed",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Validation::Skipped { reason } => format!(
                "PDF successfully converted with PDF/UA flags (validation skipped: {})",
                reason
            ),
            Validation::Compliant => {
                "PDF successfully converted with PDF/UA flags and validated as PDF/UA-1 compliant"
                    .to_string()
            }
            Validation::Unconfirmed { .. } => {
                "PDF converted with PDF/UA flags, but PDF/UA-1 compliance could not be confirmed"
                    .to_string()
            }
        }
    }
}

/// Why a conversion produced nothing usable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionFailure {
    /// Ghostscript exited non-zero; carries the extracted diagnostic line
    #[error("Conversion failed: {detail}")]
    ToolFailed { exit_code: Option<i32>, detail: String },

    /// Ghostscript exited zero but left no output behind
    #[error("Conversion completed but output file is empty")]
    EmptyOutput,

    /// Anything unexpected (tool missing, I/O error)
    #[error("Conversion error: {0}")]
    Fault(String),
}

impl fmt::Display for ConversionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages() {
        let failure = ConversionFailure::ToolFailed {
            exit_code: Some(1),
            detail: "Error: malformed xref".to_string(),
        };
        assert_eq!(failure.to_string(), "Conversion failed: Error: malformed xref");
        assert_eq!(
            ConversionFailure::EmptyOutput.to_string(),
            "Conversion completed but output file is empty"
        );
        assert_eq!(
            ConversionFailure::Fault("gs not found".to_string()).to_string(),
            "Conversion error: gs not found"
        );
    }

    #[test]
    fn test_success_messages_mention_validation() {
        let skipped = Validation::Skipped {
            reason: "verapdf not available".to_string(),
        };
        assert!(skipped.message().contains("validation skipped"));
        assert_eq!(skipped.label(), "skipped");

        assert!(Validation::Compliant.message().contains("compliant"));
        assert!(Validation::Unconfirmed { exit_code: Some(1) }
            .message()
            .contains("could not be confirmed"));
    }

    #[test]
    fn test_outcome_message() {
        let outcome = ConversionOutcome::Succeeded {
            output: PathBuf::from("/tmp/out.pdf"),
            validation: Validation::Compliant,
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.message(), Validation::Compliant.message());

        let outcome = ConversionOutcome::Failed(ConversionFailure::EmptyOutput);
        assert!(!outcome.is_success());
        assert_eq!(outcome.to_string(), "Conversion completed but output file is empty");
    }
}
