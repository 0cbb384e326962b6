//! Suffix scheme that turns one native text field into two descriptors and back

pub const TEXT_SUFFIX: &str = "_text";
pub const CHOICE_SUFFIX: &str = "_choice";

/// Which half of a split native text field a descriptor represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitHalf {
    Text,
    Choice,
}

pub fn text_name(native: &str) -> String {
    format!("{}{}", native, TEXT_SUFFIX)
}

pub fn choice_name(native: &str) -> String {
    format!("{}{}", native, CHOICE_SUFFIX)
}

/// Strip a split suffix from a descriptor name
///
/// Names without a suffix come back unchanged with `None`. Only one suffix is
/// stripped, so a native field named `notes_text` round-trips through
/// `notes_text_text`.
pub fn split_name(descriptor_name: &str) -> (&str, Option<SplitHalf>) {
    if let Some(native) = descriptor_name.strip_suffix(TEXT_SUFFIX) {
        (native, Some(SplitHalf::Text))
    } else if let Some(native) = descriptor_name.strip_suffix(CHOICE_SUFFIX) {
        (native, Some(SplitHalf::Choice))
    } else {
        (descriptor_name, None)
    }
}
