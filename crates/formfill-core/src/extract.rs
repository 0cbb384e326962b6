//! Field extraction
//!
//! Walks the document's fields in native order and turns each one into
//! descriptors:
//! 1. Text fields are classified, then emitted per the configured strategy
//!    (a `_text`/`_choice` pair, or one classified descriptor)
//! 2. Checkboxes, radio groups and choice fields map one to one
//! 3. Any other kind is read as text if possible, otherwise dropped
//!
//! A field that cannot be read is skipped with a diagnostic; only a document
//! that cannot be parsed at all fails the call.

use crate::acroform::{FormDocument, NativeField, NativeKind};
use crate::classify::{Classifier, WidgetSize};
use crate::config::{ExtractionStrategy, FormfillConfig};
use crate::descriptor::FieldDescriptor;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::{FieldError, FormError};
use crate::geometry;
use crate::naming;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};

pub struct FieldExtractor {
    config: FormfillConfig,
    classifier: Classifier,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        let config = FormfillConfig::default();
        Self {
            classifier: Classifier::new(config.classifier.clone()),
            config,
            sink: Arc::new(TracingSink),
        }
    }
}

impl FieldExtractor {
    /// Create an extractor reporting diagnostics through `tracing`
    pub fn new(config: FormfillConfig) -> Result<Self, FormError> {
        config.validate()?;
        Ok(Self {
            classifier: Classifier::new(config.classifier.clone()),
            config,
            sink: Arc::new(TracingSink),
        })
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &FormfillConfig {
        &self.config
    }

    /// Extract descriptors for every readable field of the document
    pub fn extract(&self, bytes: &[u8]) -> Result<Vec<FieldDescriptor>, FormError> {
        let form = FormDocument::load(bytes).map_err(FormError::Extraction)?;

        let mut descriptors = Vec::new();
        let mut seen = HashSet::new();

        for entry in form.fields() {
            let field = match entry {
                Ok(field) => field,
                Err(e) => {
                    self.sink
                        .emit(Diagnostic::warn(None, format!("Skipping unreadable field: {}", e)));
                    continue;
                }
            };

            let produced = match self.describe(&form, &field) {
                Ok(produced) => produced,
                Err(e) => {
                    self.sink.emit(Diagnostic::warn(
                        Some(field.name()),
                        format!("Skipping field: {}", e),
                    ));
                    continue;
                }
            };

            // Keep names unique; a split pair is kept or dropped as a whole
            if let Some(duplicate) = produced.iter().find(|d| seen.contains(&d.name)) {
                self.sink.emit(Diagnostic::warn(
                    Some(field.name()),
                    format!("Skipping field: descriptor name {} already in use", duplicate.name),
                ));
                continue;
            }
            seen.extend(produced.iter().map(|d| d.name.clone()));
            descriptors.extend(produced);
        }

        self.sink.emit(Diagnostic::debug(
            None,
            format!("Extracted {} descriptors", descriptors.len()),
        ));
        Ok(descriptors)
    }

    /// Read the whole document from `reader`, then extract
    pub async fn extract_from_reader<R>(&self, reader: &mut R) -> Result<Vec<FieldDescriptor>, FormError>
    where
        R: AsyncRead + Unpin,
    {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| FormError::Extraction(format!("Failed to read document: {}", e)))?;
        self.extract(&bytes)
    }

    fn describe(
        &self,
        form: &FormDocument,
        field: &NativeField,
    ) -> Result<Vec<FieldDescriptor>, FieldError> {
        let name = field.name();
        match field.kind() {
            NativeKind::Text => self.describe_text(form, field),
            NativeKind::Checkbox => {
                let checked = form.is_checked(field)?;
                Ok(vec![FieldDescriptor::checkbox(name, checked)
                    .with_bounds(geometry::resolve(form, field))])
            }
            NativeKind::RadioGroup => {
                let options = form.radio_options(field)?;
                if options.is_empty() {
                    return Err(no_options(field));
                }
                let value = form.radio_selected(field)?.unwrap_or_default();
                Ok(vec![FieldDescriptor::radio(name, value, options)
                    .with_bounds(geometry::resolve(form, field))])
            }
            NativeKind::Dropdown | NativeKind::ListBox => {
                let options = form.choice_options(field)?;
                if options.is_empty() {
                    return Err(no_options(field));
                }
                let value = form
                    .choice_selected(field)?
                    .into_iter()
                    .next()
                    .unwrap_or_default();
                Ok(vec![FieldDescriptor::select(name, value, options)
                    .with_bounds(geometry::resolve(form, field))])
            }
            NativeKind::PushButton | NativeKind::Signature | NativeKind::Unknown => {
                match form.text(field) {
                    Ok(value) => {
                        self.sink.emit(Diagnostic::debug(
                            Some(name),
                            format!("Treating {} field as text", field.kind().as_str()),
                        ));
                        Ok(vec![FieldDescriptor::text(name, value)
                            .with_bounds(geometry::resolve(form, field))])
                    }
                    Err(e) => {
                        self.sink.emit(Diagnostic::debug(
                            Some(name),
                            format!("Dropping {} field: {}", field.kind().as_str(), e),
                        ));
                        Ok(Vec::new())
                    }
                }
            }
        }
    }

    fn describe_text(
        &self,
        form: &FormDocument,
        field: &NativeField,
    ) -> Result<Vec<FieldDescriptor>, FieldError> {
        let name = field.name();
        let value = form.text(field)?;
        let bounds = geometry::resolve(form, field);
        let size = bounds
            .map(|b| WidgetSize::new(b.width, b.height))
            .or_else(|| geometry::widget_size(form, field));

        let classification = self.classifier.classify(name, &value, size);
        self.sink.emit(Diagnostic::debug(
            Some(name),
            format!(
                "Classified text field: date={}, checkbox_like={}",
                classification.is_date, classification.is_checkbox_like
            ),
        ));

        let options = self.config.choice_options.clone();
        let descriptors = match self.config.strategy {
            ExtractionStrategy::Split => vec![
                FieldDescriptor::text(naming::text_name(name), value),
                FieldDescriptor::radio(naming::choice_name(name), "", options),
            ],
            ExtractionStrategy::Classify if classification.is_date => {
                vec![FieldDescriptor::date(name, value)]
            }
            ExtractionStrategy::Classify if classification.is_checkbox_like => {
                let needle = value.trim().to_lowercase();
                let selected = options
                    .iter()
                    .find(|option| option.to_lowercase() == needle)
                    .cloned()
                    .unwrap_or_default();
                vec![FieldDescriptor::radio(name, selected, options)]
            }
            ExtractionStrategy::Classify => vec![FieldDescriptor::text(name, value)],
        };

        Ok(descriptors
            .into_iter()
            .map(|d| d.with_bounds(bounds))
            .collect())
    }
}

fn no_options(field: &NativeField) -> FieldError {
    FieldError::Malformed {
        name: field.name().to_string(),
        reason: format!("{} declares no options", field.kind().as_str()),
    }
}
