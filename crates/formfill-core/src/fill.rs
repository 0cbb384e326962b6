//! Apply descriptors back onto a document
//!
//! The writer always starts from a freshly loaded copy of the original bytes.
//! Each descriptor is applied on its own: a descriptor that names a missing
//! field, offers an unknown option or targets the wrong kind of field is
//! reported and skipped, and the remaining descriptors still apply. Only a
//! document that cannot be loaded or saved fails the call.

use crate::acroform::{FormDocument, NativeField, NativeKind};
use crate::config::ExtractionStrategy;
use crate::descriptor::{FieldDescriptor, FieldKind};
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::{FieldError, FormError};
use crate::naming::{self, SplitHalf};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Per-descriptor outcome of a fill
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FillReport {
    /// Descriptors written into the document
    pub applied: Vec<String>,
    /// Descriptors that were deliberately left unapplied
    pub skipped: Vec<String>,
    /// Descriptors that failed to apply
    pub failed: Vec<FailedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedField {
    pub name: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: FieldError,
}

fn serialize_display<S: Serializer>(error: &FieldError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

enum Outcome {
    Applied,
    Skipped(&'static str),
}

pub struct FormWriter {
    strategy: ExtractionStrategy,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for FormWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FormWriter {
    /// Create a writer for split descriptors, reporting through `tracing`
    pub fn new() -> Self {
        Self {
            strategy: ExtractionStrategy::Split,
            sink: Arc::new(TracingSink),
        }
    }

    /// Set the strategy the descriptors were extracted with
    ///
    /// Only split descriptors carry `_text`/`_choice` suffixes; classified
    /// descriptors are addressed by their literal name.
    pub fn with_strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> ExtractionStrategy {
        self.strategy
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Fill the document and return the serialized result
    pub fn fill(&self, bytes: &[u8], descriptors: &[FieldDescriptor]) -> Result<Vec<u8>, FormError> {
        self.fill_with_report(bytes, descriptors)
            .map(|(output, _)| output)
    }

    /// Fill the document and report what happened to each descriptor
    pub fn fill_with_report(
        &self,
        bytes: &[u8],
        descriptors: &[FieldDescriptor],
    ) -> Result<(Vec<u8>, FillReport), FormError> {
        let mut form = FormDocument::load(bytes).map_err(FormError::Write)?;
        let index = form.field_index();
        let mut report = FillReport::default();

        for descriptor in descriptors {
            match apply(&mut form, &index, self.strategy, descriptor) {
                Ok(Outcome::Applied) => report.applied.push(descriptor.name.clone()),
                Ok(Outcome::Skipped(reason)) => {
                    self.sink
                        .emit(Diagnostic::debug(Some(descriptor.name.as_str()), reason));
                    report.skipped.push(descriptor.name.clone());
                }
                Err(error) => {
                    self.sink.emit(Diagnostic::warn(
                        Some(descriptor.name.as_str()),
                        format!("Could not fill field: {}", error),
                    ));
                    report.failed.push(FailedField {
                        name: descriptor.name.clone(),
                        error,
                    });
                }
            }
        }

        let output = form.save().map_err(FormError::Write)?;
        self.sink.emit(Diagnostic::debug(
            None,
            format!(
                "Filled form: {} applied, {} skipped, {} failed",
                report.applied.len(),
                report.skipped.len(),
                report.failed.len()
            ),
        ));
        Ok((output, report))
    }

    /// Read the whole document from `reader`, then fill
    pub async fn fill_from_reader<R>(
        &self,
        reader: &mut R,
        descriptors: &[FieldDescriptor],
    ) -> Result<Vec<u8>, FormError>
    where
        R: AsyncRead + Unpin,
    {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| FormError::Write(format!("Failed to read document: {}", e)))?;
        self.fill(&bytes, descriptors)
    }
}

/// Find the native field a descriptor addresses
///
/// For split descriptors a `_text`/`_choice` suffix is stripped first; when
/// no native field carries the stripped name, the literal descriptor name is
/// tried. Classified descriptors always use the literal name.
fn resolve_target<'a>(
    index: &'a HashMap<String, NativeField>,
    strategy: ExtractionStrategy,
    descriptor_name: &str,
) -> Result<(&'a NativeField, Option<SplitHalf>), FieldError> {
    if strategy == ExtractionStrategy::Split {
        let (native, half) = naming::split_name(descriptor_name);
        if half.is_some() {
            if let Some(field) = index.get(native) {
                return Ok((field, half));
            }
        }
    }
    index
        .get(descriptor_name)
        .map(|field| (field, None))
        .ok_or_else(|| FieldError::NotFound(descriptor_name.to_string()))
}

fn apply(
    form: &mut FormDocument,
    index: &HashMap<String, NativeField>,
    strategy: ExtractionStrategy,
    descriptor: &FieldDescriptor,
) -> Result<Outcome, FieldError> {
    let (field, half) = resolve_target(index, strategy, &descriptor.name)?;

    match descriptor.kind {
        FieldKind::Text | FieldKind::Date => {
            form.set_text(field, &descriptor.value)?;
        }
        FieldKind::Checkbox => {
            form.set_checked(field, descriptor.is_checked())?;
        }
        FieldKind::Radio => {
            if descriptor.value.is_empty() {
                return Ok(Outcome::Skipped("empty value leaves the selection unchanged"));
            }
            match (field.kind(), half) {
                (NativeKind::Text, Some(SplitHalf::Choice)) => {
                    return Ok(Outcome::Skipped("choice half has no native counterpart"));
                }
                // A text field classified in place as a choice
                (NativeKind::Text, _) => form.set_text(field, &descriptor.value)?,
                _ => form.select_radio(field, &descriptor.value)?,
            }
        }
        FieldKind::Select => {
            if descriptor.value.is_empty() {
                return Ok(Outcome::Skipped("empty value leaves the selection unchanged"));
            }
            form.select_choice(field, &descriptor.value)?;
        }
    }
    Ok(Outcome::Applied)
}
