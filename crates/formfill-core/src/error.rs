use thiserror::Error;

/// Whole-document failures. These are the only errors that escape the
/// extractor and the writer.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Failed to extract form fields: {0}")]
    Extraction(String),

    #[error("Failed to fill form: {0}")]
    Write(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Per-field failures. Absorbed by the extractor and the writer and only
/// surfaced through diagnostics and [`crate::FillReport`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Field not found: {0}")]
    NotFound(String),

    #[error("Field {name} is a {found} field, expected {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Field {name} has no option {option:?}")]
    InvalidOption { name: String, option: String },

    #[error("Value for field {name} exceeds MaxLen {max_len}")]
    TooLong { name: String, max_len: usize },

    #[error("Malformed field {name}: {reason}")]
    Malformed { name: String, reason: String },
}
