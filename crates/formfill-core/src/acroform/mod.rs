//! Typed access to the AcroForm field tree of a lopdf document
//!
//! lopdf parses and serializes the document but knows nothing about
//! interactive forms. This module provides the field-level API the
//! extractor and the writer work against:
//! - enumeration of terminal fields with fully qualified names
//! - kind-checked getters and setters per native field kind
//! - widget lookup for geometry

mod field;
mod strings;

pub use field::{NativeField, NativeKind};

use crate::error::FieldError;
use field::FF_EDIT;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{BTreeSet, HashMap};

use strings::{decode_name, decode_text_string, encode_text_string};

pub(crate) use strings::object_to_f64;

/// Bound on `/Parent` chains followed for inheritable entries
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Inheritable entries carried down the field tree during enumeration
#[derive(Debug, Clone, Default)]
struct Inherited {
    field_type: Option<Vec<u8>>,
    flags: i64,
}

impl Inherited {
    fn merge(&self, dict: &Dictionary) -> Self {
        let field_type = match dict.get(b"FT") {
            Ok(Object::Name(name)) => Some(name.clone()),
            _ => self.field_type.clone(),
        };
        let flags = match dict.get(b"Ff") {
            Ok(Object::Integer(flags)) => *flags,
            _ => self.flags,
        };
        Self { field_type, flags }
    }
}

/// A parsed PDF document with form access
pub struct FormDocument {
    doc: Document,
    dirty: bool,
}

impl FormDocument {
    /// Load a PDF from raw bytes
    pub fn load(bytes: &[u8]) -> Result<Self, String> {
        let doc = Document::load_mem(bytes).map_err(|e| format!("PDF parse error: {}", e))?;
        Ok(Self { doc, dirty: false })
    }

    pub(crate) fn document(&self) -> &Document {
        &self.doc
    }

    /// Save the document to bytes
    ///
    /// When any field value was changed, `/NeedAppearances` is set so viewers
    /// regenerate widget appearances from the new values.
    pub fn save(&mut self) -> Result<Vec<u8>, String> {
        if self.dirty {
            self.set_need_appearances()?;
        }
        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| format!("Failed to save PDF: {}", e))?;
        Ok(buffer)
    }

    /// Enumerate terminal fields in declaration order
    ///
    /// Entries that cannot be resolved are yielded as errors so callers can
    /// skip them individually.
    pub fn fields(&self) -> Vec<Result<NativeField, FieldError>> {
        let mut out = Vec::new();
        let roots = match self.acroform().and_then(|form| form.get(b"Fields").ok()) {
            Some(fields) => match self.resolve(fields).and_then(|o| o.as_array().ok()) {
                Some(arr) => arr.clone(),
                None => return out,
            },
            None => return out,
        };

        let mut visited = BTreeSet::new();
        for entry in &roots {
            self.walk(entry, None, &Inherited::default(), &mut visited, &mut out);
        }
        out
    }

    /// Index terminal fields by fully qualified name
    ///
    /// The first field wins when a malformed tree repeats a name.
    pub fn field_index(&self) -> HashMap<String, NativeField> {
        let mut index = HashMap::new();
        for field in self.fields().into_iter().flatten() {
            index.entry(field.name.clone()).or_insert(field);
        }
        index
    }

    /// Look up a single field by fully qualified name
    pub fn field(&self, name: &str) -> Result<NativeField, FieldError> {
        self.fields()
            .into_iter()
            .flatten()
            .find(|f| f.name == name)
            .ok_or_else(|| FieldError::NotFound(name.to_string()))
    }

    fn walk(
        &self,
        entry: &Object,
        parent_name: Option<&str>,
        inherited: &Inherited,
        visited: &mut BTreeSet<ObjectId>,
        out: &mut Vec<Result<NativeField, FieldError>>,
    ) {
        let id = match entry.as_reference() {
            Ok(id) => id,
            Err(_) => {
                out.push(Err(FieldError::Malformed {
                    name: parent_name.unwrap_or("<root>").to_string(),
                    reason: "field entry is not an indirect object".to_string(),
                }));
                return;
            }
        };
        // Cut reference cycles in broken field trees
        if !visited.insert(id) {
            return;
        }

        let dict = match self.doc.get_object(id).and_then(|o| o.as_dict()) {
            Ok(dict) => dict,
            Err(e) => {
                out.push(Err(FieldError::Malformed {
                    name: format!("{} {} R", id.0, id.1),
                    reason: e.to_string(),
                }));
                return;
            }
        };

        let partial = dict.get(b"T").ok().and_then(|t| self.string_value(t));
        let name = match (parent_name, partial) {
            (Some(parent), Some(partial)) => format!("{}.{}", parent, partial),
            (None, Some(partial)) => partial,
            (Some(parent), None) => parent.to_string(),
            (None, None) => String::new(),
        };
        let inherited = inherited.merge(dict);

        let child_fields: Vec<Object> = match dict.get(b"Kids") {
            Ok(kids) => self
                .resolve(kids)
                .and_then(|o| o.as_array().ok())
                .map(|kids| {
                    kids.iter()
                        .filter(|kid| self.is_field_node(kid))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        };

        if !child_fields.is_empty() {
            for kid in &child_fields {
                self.walk(kid, Some(&name), &inherited, visited, out);
            }
            return;
        }

        if name.is_empty() {
            out.push(Err(FieldError::Malformed {
                name: format!("{} {} R", id.0, id.1),
                reason: "terminal field has no name".to_string(),
            }));
            return;
        }

        out.push(Ok(NativeField {
            id,
            name,
            kind: NativeKind::from_entries(inherited.field_type.as_deref(), inherited.flags),
            flags: inherited.flags,
        }));
    }

    /// Kids carrying a partial name are fields; the rest are widgets
    fn is_field_node(&self, kid: &Object) -> bool {
        self.resolve(kid)
            .and_then(|o| o.as_dict().ok())
            .map(|d| d.has(b"T"))
            .unwrap_or(false)
    }

    /// Widget annotation ids of a terminal field, in `/Kids` order
    ///
    /// A field merged with its single widget is its own widget.
    pub fn widget_ids(&self, field: &NativeField) -> Result<Vec<ObjectId>, FieldError> {
        let dict = self.field_dict(field)?;
        match dict.get(b"Kids") {
            Ok(kids) => {
                let kids = self
                    .resolve(kids)
                    .and_then(|o| o.as_array().ok())
                    .ok_or_else(|| malformed(field, "/Kids is not an array"))?;
                Ok(kids
                    .iter()
                    .filter_map(|kid| kid.as_reference().ok())
                    .filter(|id| {
                        self.doc
                            .get_object(*id)
                            .and_then(|o| o.as_dict())
                            .map(|d| !d.has(b"T"))
                            .unwrap_or(false)
                    })
                    .collect())
            }
            Err(_) if is_widget(dict) => Ok(vec![field.id]),
            Err(_) => Ok(Vec::new()),
        }
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Current text of a text field
    ///
    /// Fields without a declared type are read the same way when their value
    /// is a string; that is the fallback for unrecognized kinds.
    pub fn text(&self, field: &NativeField) -> Result<String, FieldError> {
        match field.kind {
            NativeKind::Text => match self.inherited_value(field, b"V")? {
                None => Ok(String::new()),
                Some(value) => self.text_of_value(field, value),
            },
            NativeKind::Unknown => match self.inherited_value(field, b"V")? {
                Some(value) => self.text_of_value(field, value),
                None => Err(malformed(field, "no field type and no text value")),
            },
            other => Err(kind_mismatch(field, "text", other)),
        }
    }

    fn text_of_value(&self, field: &NativeField, value: &Object) -> Result<String, FieldError> {
        match value {
            Object::String(bytes, _) => Ok(decode_text_string(bytes)),
            // Rich text values may be stored as a stream
            Object::Stream(stream) => {
                let content = stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone());
                Ok(decode_text_string(&content))
            }
            Object::Null => Ok(String::new()),
            _ => Err(malformed(field, "/V is not a text string")),
        }
    }

    /// Set the text of a text field, honouring `/MaxLen`
    ///
    /// Fields without a declared type accept text too, mirroring [`Self::text`].
    pub fn set_text(&mut self, field: &NativeField, value: &str) -> Result<(), FieldError> {
        if !matches!(field.kind, NativeKind::Text | NativeKind::Unknown) {
            return Err(kind_mismatch(field, "text", field.kind));
        }
        if let Some(Object::Integer(max_len)) = self.inherited_value(field, b"MaxLen")? {
            let max_len = (*max_len).max(0) as usize;
            if value.chars().count() > max_len {
                return Err(FieldError::TooLong {
                    name: field.name.clone(),
                    max_len,
                });
            }
        }
        self.field_dict_mut(field)?
            .set("V", encode_text_string(value));
        self.dirty = true;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Checkbox
    // ------------------------------------------------------------------

    pub fn is_checked(&self, field: &NativeField) -> Result<bool, FieldError> {
        if field.kind != NativeKind::Checkbox {
            return Err(kind_mismatch(field, "checkbox", field.kind));
        }
        match self.inherited_value(field, b"V")? {
            Some(Object::Name(state)) => Ok(state.as_slice() != b"Off"),
            Some(_) => Err(malformed(field, "/V is not a name")),
            None => {
                // No value: fall back to the first widget's appearance state
                let widgets = self.widget_ids(field)?;
                Ok(widgets
                    .first()
                    .and_then(|id| self.doc.get_object(*id).and_then(|o| o.as_dict()).ok())
                    .and_then(|w| w.get(b"AS").ok())
                    .map(|state| match state {
                        Object::Name(state) => state.as_slice() != b"Off",
                        _ => false,
                    })
                    .unwrap_or(false))
            }
        }
    }

    pub fn set_checked(&mut self, field: &NativeField, checked: bool) -> Result<(), FieldError> {
        if field.kind != NativeKind::Checkbox {
            return Err(kind_mismatch(field, "checkbox", field.kind));
        }
        let widgets = self.widget_ids(field)?;
        let on_state = widgets
            .iter()
            .find_map(|id| self.on_state(*id))
            .unwrap_or_else(|| b"Yes".to_vec());

        let state = if checked { on_state } else { b"Off".to_vec() };
        self.set_button_state(field, &widgets, &state)
    }

    // ------------------------------------------------------------------
    // Radio group
    // ------------------------------------------------------------------

    /// Declared options of a radio group, in declaration order
    ///
    /// `/Opt` export values win over widget appearance state names.
    pub fn radio_options(&self, field: &NativeField) -> Result<Vec<String>, FieldError> {
        if field.kind != NativeKind::RadioGroup {
            return Err(kind_mismatch(field, "radio group", field.kind));
        }
        let raw = match self.export_values(field)? {
            Some(values) => values,
            None => self
                .widget_ids(field)?
                .into_iter()
                .filter_map(|id| self.on_state(id))
                .map(|state| decode_name(&state))
                .collect(),
        };
        Ok(dedup_preserving_order(raw))
    }

    /// Currently selected option of a radio group
    pub fn radio_selected(&self, field: &NativeField) -> Result<Option<String>, FieldError> {
        if field.kind != NativeKind::RadioGroup {
            return Err(kind_mismatch(field, "radio group", field.kind));
        }
        let state = match self.inherited_value(field, b"V")? {
            Some(Object::Name(state)) if state.as_slice() != b"Off" => state.clone(),
            Some(Object::Name(_)) | None => return Ok(None),
            Some(_) => return Err(malformed(field, "/V is not a name")),
        };

        if let Some(export_values) = self.export_values(field)? {
            // With /Opt, appearance states are widget indices into /Opt
            let widgets = self.widget_ids(field)?;
            if let Some(index) = widgets
                .iter()
                .position(|id| self.on_state(*id).as_deref() == Some(state.as_slice()))
            {
                if let Some(value) = export_values.get(index) {
                    return Ok(Some(value.clone()));
                }
            }
        }
        Ok(Some(decode_name(&state)))
    }

    pub fn select_radio(&mut self, field: &NativeField, option: &str) -> Result<(), FieldError> {
        if field.kind != NativeKind::RadioGroup {
            return Err(kind_mismatch(field, "radio group", field.kind));
        }
        let widgets = self.widget_ids(field)?;
        let state = match self.export_values(field)? {
            Some(export_values) => {
                let index = export_values
                    .iter()
                    .position(|v| v == option)
                    .ok_or_else(|| invalid_option(field, option))?;
                widgets
                    .get(index)
                    .and_then(|id| self.on_state(*id))
                    .unwrap_or_else(|| index.to_string().into_bytes())
            }
            // Compare decoded states, write the widget's raw bytes back
            None => widgets
                .iter()
                .filter_map(|id| self.on_state(*id))
                .find(|state| decode_name(state) == option)
                .ok_or_else(|| invalid_option(field, option))?,
        };
        self.set_button_state(field, &widgets, &state)
    }

    fn export_values(&self, field: &NativeField) -> Result<Option<Vec<String>>, FieldError> {
        match self.inherited_value(field, b"Opt")? {
            Some(Object::Array(entries)) => Ok(Some(
                entries
                    .iter()
                    .filter_map(|e| self.string_value(e))
                    .collect(),
            )),
            Some(_) => Err(malformed(field, "/Opt is not an array")),
            None => Ok(None),
        }
    }

    /// Write `/V` and sync each widget's `/AS` to the new state
    fn set_button_state(
        &mut self,
        field: &NativeField,
        widgets: &[ObjectId],
        state: &[u8],
    ) -> Result<(), FieldError> {
        let widget_states: Vec<(ObjectId, bool)> = widgets
            .iter()
            .map(|id| {
                let matches = match self.on_state(*id) {
                    Some(on) => on.as_slice() == state,
                    // Widgets without appearances follow the field
                    None => state != b"Off",
                };
                (*id, matches)
            })
            .collect();

        self.field_dict_mut(field)?
            .set("V", Object::Name(state.to_vec()));
        for (id, matches) in widget_states {
            let appearance = if matches { state.to_vec() } else { b"Off".to_vec() };
            if let Ok(widget) = self.doc.get_object_mut(id).and_then(|o| o.as_dict_mut()) {
                widget.set("AS", Object::Name(appearance));
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// The non-Off appearance state of a widget, from `/AP /N` (or `/D`)
    fn on_state(&self, widget_id: ObjectId) -> Option<Vec<u8>> {
        let widget = self.doc.get_object(widget_id).and_then(|o| o.as_dict()).ok()?;
        let appearances = self.resolve(widget.get(b"AP").ok()?)?.as_dict().ok()?;
        for key in [b"N".as_slice(), b"D".as_slice()] {
            let Some(states) = appearances
                .get(key)
                .ok()
                .and_then(|o| self.resolve(o))
                .and_then(|o| o.as_dict().ok())
            else {
                continue;
            };
            if let Some((name, _)) = states.iter().find(|(name, _)| name.as_slice() != b"Off") {
                return Some(name.clone());
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Dropdown / list box
    // ------------------------------------------------------------------

    /// Display texts of a choice field, in declaration order
    pub fn choice_options(&self, field: &NativeField) -> Result<Vec<String>, FieldError> {
        Ok(self
            .choice_entries(field)?
            .into_iter()
            .map(|(_, display)| display)
            .collect())
    }

    /// Currently selected options of a choice field, as display texts
    pub fn choice_selected(&self, field: &NativeField) -> Result<Vec<String>, FieldError> {
        let entries = self.choice_entries(field)?;
        let selected: Vec<String> = match self.inherited_value(field, b"V")? {
            None | Some(Object::Null) => Vec::new(),
            Some(Object::Array(values)) => {
                values.iter().filter_map(|v| self.string_value(v)).collect()
            }
            Some(value) => match self.string_value(value) {
                Some(value) => vec![value],
                None => return Err(malformed(field, "/V is not a text string")),
            },
        };
        Ok(selected
            .into_iter()
            .map(|value| {
                entries
                    .iter()
                    .find(|(export, _)| *export == value)
                    .map(|(_, display)| display.clone())
                    .unwrap_or(value)
            })
            .collect())
    }

    /// Select one option of a choice field by display text or export value
    ///
    /// Values outside the option list are only accepted by editable combo
    /// boxes.
    pub fn select_choice(&mut self, field: &NativeField, option: &str) -> Result<(), FieldError> {
        let entries = self.choice_entries(field)?;
        let export = match entries
            .iter()
            .find(|(export, display)| display == option || export == option)
        {
            Some((export, _)) => export.clone(),
            None if field.kind == NativeKind::Dropdown && field.has_flag(FF_EDIT) => {
                option.to_string()
            }
            None => return Err(invalid_option(field, option)),
        };

        let dict = self.field_dict_mut(field)?;
        dict.set("V", encode_text_string(&export));
        // Stale selection indices would override /V in some viewers
        dict.remove(b"I");
        self.dirty = true;
        Ok(())
    }

    /// (export value, display text) pairs from `/Opt`
    fn choice_entries(&self, field: &NativeField) -> Result<Vec<(String, String)>, FieldError> {
        if !matches!(field.kind, NativeKind::Dropdown | NativeKind::ListBox) {
            return Err(kind_mismatch(field, "choice", field.kind));
        }
        let entries = match self.inherited_value(field, b"Opt")? {
            Some(Object::Array(entries)) => entries,
            Some(_) => return Err(malformed(field, "/Opt is not an array")),
            None => return Ok(Vec::new()),
        };
        Ok(entries
            .iter()
            .filter_map(|entry| match self.resolve(entry)? {
                Object::Array(pair) if pair.len() == 2 => {
                    let export = self.string_value(&pair[0])?;
                    let display = self.string_value(&pair[1])?;
                    Some((export, display))
                }
                other => self.string_value(other).map(|s| (s.clone(), s)),
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Dictionary plumbing
    // ------------------------------------------------------------------

    fn acroform(&self) -> Option<&Dictionary> {
        let root = self.doc.trailer.get(b"Root").ok()?;
        let catalog = self.resolve(root)?.as_dict().ok()?;
        self.resolve(catalog.get(b"AcroForm").ok()?)?.as_dict().ok()
    }

    fn set_need_appearances(&mut self) -> Result<(), String> {
        let root_id = self
            .doc
            .trailer
            .get(b"Root")
            .and_then(|o| o.as_reference())
            .map_err(|e| format!("Missing document catalog: {}", e))?;
        let acroform = self
            .doc
            .get_object(root_id)
            .and_then(|o| o.as_dict())
            .and_then(|catalog| catalog.get(b"AcroForm"))
            .map_err(|e| format!("Missing AcroForm dictionary: {}", e))?
            .clone();

        let form = match acroform {
            Object::Reference(id) => self.doc.get_object_mut(id).and_then(|o| o.as_dict_mut()),
            _ => self
                .doc
                .get_object_mut(root_id)
                .and_then(|o| o.as_dict_mut())
                .and_then(|catalog| catalog.get_mut(b"AcroForm"))
                .and_then(|o| o.as_dict_mut()),
        }
        .map_err(|e| format!("AcroForm is not a dictionary: {}", e))?;
        form.set("NeedAppearances", Object::Boolean(true));
        Ok(())
    }

    fn field_dict(&self, field: &NativeField) -> Result<&Dictionary, FieldError> {
        self.doc
            .get_object(field.id)
            .and_then(|o| o.as_dict())
            .map_err(|e| malformed(field, &e.to_string()))
    }

    fn field_dict_mut(&mut self, field: &NativeField) -> Result<&mut Dictionary, FieldError> {
        let name = field.name.clone();
        self.doc
            .get_object_mut(field.id)
            .and_then(|o| o.as_dict_mut())
            .map_err(|e| FieldError::Malformed {
                name,
                reason: e.to_string(),
            })
    }

    /// Look up an inheritable entry, walking `/Parent` links
    ///
    /// A present but unresolvable entry is an error; an absent one is `None`.
    fn inherited_value(
        &self,
        field: &NativeField,
        key: &[u8],
    ) -> Result<Option<&Object>, FieldError> {
        let mut dict = self.field_dict(field)?;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(value) = dict.get(key) {
                return match value {
                    Object::Reference(id) => self
                        .doc
                        .get_object(*id)
                        .map(Some)
                        .map_err(|e| malformed(field, &e.to_string())),
                    other => Ok(Some(other)),
                };
            }
            dict = match dict
                .get(b"Parent")
                .and_then(|p| p.as_reference())
                .and_then(|id| self.doc.get_object(id))
                .and_then(|o| o.as_dict())
            {
                Ok(parent) => parent,
                Err(_) => return Ok(None),
            };
        }
        Ok(None)
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn string_value(&self, obj: &Object) -> Option<String> {
        match self.resolve(obj)? {
            Object::String(bytes, _) => Some(decode_text_string(bytes)),
            Object::Name(name) => Some(decode_name(name)),
            _ => None,
        }
    }
}

fn is_widget(dict: &Dictionary) -> bool {
    matches!(dict.get(b"Subtype"), Ok(Object::Name(subtype)) if subtype.as_slice() == b"Widget")
        || dict.has(b"Rect")
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

fn malformed(field: &NativeField, reason: &str) -> FieldError {
    FieldError::Malformed {
        name: field.name.clone(),
        reason: reason.to_string(),
    }
}

fn kind_mismatch(field: &NativeField, expected: &'static str, found: NativeKind) -> FieldError {
    FieldError::KindMismatch {
        name: field.name.clone(),
        expected,
        found: found.as_str(),
    }
}

fn invalid_option(field: &NativeField, option: &str) -> FieldError {
    FieldError::InvalidOption {
        name: field.name.clone(),
        option: option.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Minimal one-page document whose AcroForm lists the given field ids
    fn document_with_fields(build: impl FnOnce(&mut Document, ObjectId) -> Vec<ObjectId>) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );
        let fields = build(&mut doc, page_id);
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "AcroForm" => dictionary! {
                "Fields" => fields.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            },
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    fn text_field(doc: &mut Document, name: &str, value: &str) -> ObjectId {
        doc.add_object(dictionary! {
            "FT" => "Tx",
            "T" => Object::string_literal(name),
            "V" => Object::string_literal(value),
            "Subtype" => "Widget",
            "Rect" => vec![0.into(), 0.into(), 100.into(), 20.into()],
        })
    }

    #[test]
    fn test_no_acroform_yields_no_fields() {
        let mut doc = Document::with_version("1.7");
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog" });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();

        let form = FormDocument::load(&buffer).unwrap();
        assert!(form.fields().is_empty());
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(FormDocument::load(b"not a pdf").is_err());
        assert!(FormDocument::load(&[]).is_err());
    }

    #[test]
    fn test_qualified_names_from_hierarchy() {
        let bytes = document_with_fields(|doc, _| {
            let parent_id = doc.new_object_id();
            let child = doc.add_object(dictionary! {
                "T" => Object::string_literal("street"),
                "Parent" => parent_id,
                "V" => Object::string_literal("Hauptstr. 1"),
            });
            doc.objects.insert(
                parent_id,
                Object::Dictionary(dictionary! {
                    "T" => Object::string_literal("address"),
                    "FT" => "Tx",
                    "Kids" => vec![Object::Reference(child)],
                }),
            );
            vec![parent_id]
        });

        let form = FormDocument::load(&bytes).unwrap();
        let fields: Vec<NativeField> = form.fields().into_iter().flatten().collect();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name(), "address.street");
        // FT is inherited from the parent
        assert_eq!(fields[0].kind(), NativeKind::Text);
        assert_eq!(form.text(&fields[0]).unwrap(), "Hauptstr. 1");
    }

    #[test]
    fn test_dangling_field_reference_is_reported() {
        let bytes = document_with_fields(|doc, _| {
            let good = text_field(doc, "Name", "Max");
            vec![(9999, 0), good]
        });

        let form = FormDocument::load(&bytes).unwrap();
        let fields = form.fields();
        assert_eq!(fields.len(), 2);
        assert!(fields[0].is_err());
        assert_eq!(fields[1].as_ref().unwrap().name(), "Name");
    }

    #[test]
    fn test_set_text_respects_max_len() {
        let bytes = document_with_fields(|doc, _| {
            vec![doc.add_object(dictionary! {
                "FT" => "Tx",
                "T" => Object::string_literal("PLZ"),
                "MaxLen" => 5,
            })]
        });

        let mut form = FormDocument::load(&bytes).unwrap();
        let field = form.field("PLZ").unwrap();
        assert!(matches!(
            form.set_text(&field, "123456"),
            Err(FieldError::TooLong { max_len: 5, .. })
        ));
        form.set_text(&field, "12345").unwrap();
        assert_eq!(form.text(&field).unwrap(), "12345");
    }

    #[test]
    fn test_kind_checked_accessors() {
        let bytes = document_with_fields(|doc, _| vec![text_field(doc, "Name", "Max")]);
        let mut form = FormDocument::load(&bytes).unwrap();
        let field = form.field("Name").unwrap();

        assert!(matches!(
            form.is_checked(&field),
            Err(FieldError::KindMismatch { expected: "checkbox", .. })
        ));
        assert!(matches!(
            form.select_radio(&field, "Ja"),
            Err(FieldError::KindMismatch { .. })
        ));
        assert!(matches!(
            form.choice_options(&field),
            Err(FieldError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_kind_without_value_is_not_text() {
        let bytes = document_with_fields(|doc, _| {
            vec![doc.add_object(dictionary! { "T" => Object::string_literal("Mystery") })]
        });
        let form = FormDocument::load(&bytes).unwrap();
        let field = form.field("Mystery").unwrap();
        assert_eq!(field.kind(), NativeKind::Unknown);
        assert!(form.text(&field).is_err());
    }

    #[test]
    fn test_save_marks_need_appearances_after_change() {
        let bytes = document_with_fields(|doc, _| vec![text_field(doc, "Name", "")]);
        let mut form = FormDocument::load(&bytes).unwrap();
        let field = form.field("Name").unwrap();
        form.set_text(&field, "Erika").unwrap();
        let saved = form.save().unwrap();

        let reloaded = FormDocument::load(&saved).unwrap();
        let acroform = reloaded.acroform().unwrap();
        assert_eq!(
            acroform.get(b"NeedAppearances").unwrap(),
            &Object::Boolean(true)
        );
    }

    #[test]
    fn test_save_without_changes_leaves_acroform_alone() {
        let bytes = document_with_fields(|doc, _| vec![text_field(doc, "Name", "")]);
        let mut form = FormDocument::load(&bytes).unwrap();
        let saved = form.save().unwrap();
        let reloaded = FormDocument::load(&saved).unwrap();
        assert!(!reloaded.acroform().unwrap().has(b"NeedAppearances"));
    }
}
