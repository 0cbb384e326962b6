//! PDF AcroForm field normalizer and round-trip filler
//!
//! This crate reads the interactive form fields of a PDF using lopdf and
//! exposes them as uniform [`FieldDescriptor`]s, then writes edited
//! descriptors back into the original document.
//!
//! Native text fields are ambiguous: authoring tools use them for free text,
//! dates and tick boxes alike. The [`classify`] heuristics recover that intent
//! from the field name, value and widget size. By default every text field is
//! offered both ways, as `<name>_text` and `<name>_choice`; see [`naming`].
//!
//! - [`FieldExtractor`]: bytes to descriptors
//! - [`FormWriter`]: bytes plus descriptors to filled bytes

pub mod acroform;
pub mod classify;
pub mod config;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod fill;
pub mod geometry;
pub mod naming;

pub use classify::{is_checkbox_like, is_date, Classification, Classifier, WidgetSize};
pub use config::{ClassifierConfig, ExtractionStrategy, FormfillConfig};
pub use descriptor::{FieldBounds, FieldDescriptor, FieldKind};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticLevel, DiagnosticSink, TracingSink};
pub use error::{FieldError, FormError};
pub use extract::FieldExtractor;
pub use fill::{FailedField, FillReport, FormWriter};

/// Extract descriptors with the default configuration
pub fn extract_fields(bytes: &[u8]) -> Result<Vec<FieldDescriptor>, FormError> {
    FieldExtractor::default().extract(bytes)
}

/// Fill a document with the default writer
pub fn fill_form(bytes: &[u8], descriptors: &[FieldDescriptor]) -> Result<Vec<u8>, FormError> {
    FormWriter::new().fill(bytes, descriptors)
}
