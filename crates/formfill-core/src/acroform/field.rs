//! Native field identity and kind

use lopdf::ObjectId;
use serde::Serialize;

/// Btn: radio button group
pub(crate) const FF_RADIO: i64 = 1 << 15;
/// Btn: push button
pub(crate) const FF_PUSHBUTTON: i64 = 1 << 16;
/// Ch: combo box (dropdown) rather than list box
pub(crate) const FF_COMBO: i64 = 1 << 17;
/// Ch: combo box accepts values outside its option list
pub(crate) const FF_EDIT: i64 = 1 << 18;

/// Field type as declared by the document (`/FT` plus `/Ff` flags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeKind {
    Text,
    Checkbox,
    RadioGroup,
    Dropdown,
    ListBox,
    PushButton,
    Signature,
    Unknown,
}

impl NativeKind {
    pub(crate) fn from_entries(field_type: Option<&[u8]>, flags: i64) -> Self {
        match field_type {
            Some(b"Tx") => NativeKind::Text,
            Some(b"Btn") if flags & FF_PUSHBUTTON != 0 => NativeKind::PushButton,
            Some(b"Btn") if flags & FF_RADIO != 0 => NativeKind::RadioGroup,
            Some(b"Btn") => NativeKind::Checkbox,
            Some(b"Ch") if flags & FF_COMBO != 0 => NativeKind::Dropdown,
            Some(b"Ch") => NativeKind::ListBox,
            Some(b"Sig") => NativeKind::Signature,
            _ => NativeKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NativeKind::Text => "text",
            NativeKind::Checkbox => "checkbox",
            NativeKind::RadioGroup => "radio group",
            NativeKind::Dropdown => "dropdown",
            NativeKind::ListBox => "list box",
            NativeKind::PushButton => "push button",
            NativeKind::Signature => "signature",
            NativeKind::Unknown => "unknown",
        }
    }
}

/// A terminal field of the AcroForm field tree
#[derive(Debug, Clone, PartialEq)]
pub struct NativeField {
    pub(crate) id: ObjectId,
    pub(crate) name: String,
    pub(crate) kind: NativeKind,
    pub(crate) flags: i64,
}

impl NativeField {
    /// Fully qualified name (partial names joined with `.`)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NativeKind {
        self.kind
    }

    pub fn object_id(&self) -> ObjectId {
        self.id
    }

    pub(crate) fn has_flag(&self, flag: i64) -> bool {
        self.flags & flag != 0
    }
}
