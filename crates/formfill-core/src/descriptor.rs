//! The field descriptor exchanged between extraction, the UI, and the writer

use serde::{Deserialize, Serialize};

/// Semantic kind of a descriptor
///
/// `Date` and the choice half of a split text field never exist natively;
/// they are classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Checkbox,
    Radio,
    Select,
    Date,
}

/// Widget rectangle in PDF user space plus the 0-based page index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub page: u32,
}

/// Value sentinel for a checked checkbox descriptor
pub const CHECKED: &str = "checked";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub value: String,
    /// Present only for radio and select descriptors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<FieldBounds>,
}

impl FieldDescriptor {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
            value: value.into(),
            options: Vec::new(),
            bounds: None,
        }
    }

    pub fn date(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Date,
            ..Self::text(name, value)
        }
    }

    pub fn checkbox(name: impl Into<String>, checked: bool) -> Self {
        Self {
            kind: FieldKind::Checkbox,
            ..Self::text(name, if checked { CHECKED } else { "" })
        }
    }

    pub fn radio(name: impl Into<String>, value: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            kind: FieldKind::Radio,
            options,
            ..Self::text(name, value)
        }
    }

    pub fn select(name: impl Into<String>, value: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            kind: FieldKind::Select,
            options,
            ..Self::text(name, value)
        }
    }

    pub fn with_bounds(mut self, bounds: Option<FieldBounds>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn is_checked(&self) -> bool {
        self.value == CHECKED
    }
}
