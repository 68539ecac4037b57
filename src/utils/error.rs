use thiserror::Error;

/// Structural failures of the passport text engine.
///
/// All variants are recoverable; the caller decides whether to re-scan,
/// reject or route to manual review. Check-digit mismatches are not
/// errors: they ride inside a successful parse as data-quality flags.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PassportError {
    #[error("no machine-readable zone detected in input text")]
    NoMrzDetected,

    #[error("malformed MRZ line: {0}")]
    MalformedMrzLine(String),

    #[error("unsupported document format: {0}")]
    UnsupportedDocumentFormat(String),

    #[error("invalid date format: {0}")]
    InvalidDateFormat(String),
}
