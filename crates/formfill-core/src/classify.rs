//! Heuristics that recover semantic intent from native text fields
//!
//! Authoring tools often render checkbox-style choices and date inputs as
//! plain text fields. Two independent predicates look at the field name, the
//! current value and the widget size:
//! - [`is_date`]: German or English date wording in the name, or a
//!   date-shaped value
//! - [`is_checkbox_like`]: box glyphs or choice wording in the name, a
//!   mark-like value, or a small near-square widget holding a short value
//!
//! Both are pure. Short free-text fields can be classified as choices; that
//! trade-off is accepted and corrected at the UI, not here.

use crate::config::ClassifierConfig;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Field names that denote a date
    static ref DATE_NAME_PATTERNS: Vec<Regex> = vec![
        // German
        Regex::new(r"datum").unwrap(),
        Regex::new(r"geb(urts)?[_.-]?(datum|tag)").unwrap(),
        Regex::new(r"geburt").unwrap(),
        Regex::new(r"ausstellungs[_.-]?datum").unwrap(),
        Regex::new(r"eingangs[_.-]?datum").unwrap(),
        // English
        Regex::new(r"date").unwrap(),
        Regex::new(r"dob").unwrap(),
        Regex::new(r"birth[_.-]?date").unwrap(),
        Regex::new(r"issue[_.-]?date").unwrap(),
        Regex::new(r"entry[_.-]?date").unwrap(),
        Regex::new(r"start[_.-]?date").unwrap(),
        Regex::new(r"end[_.-]?date").unwrap(),
        // Abbreviations
        Regex::new(r"dt\.").unwrap(),
        Regex::new(r"geb\.").unwrap(),
    ];

    /// Date-shaped values: 31.12.2024, 1/2/24, 2024-12-31, 24.12.
    static ref DATE_VALUE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"^\d{1,2}[./-]\d{1,2}[./-]\d{2,4}$").unwrap(),
        Regex::new(r"^\d{4}[./-]\d{1,2}[./-]\d{1,2}$").unwrap(),
        Regex::new(r"^\d{1,2}\.\d{1,2}\.$").unwrap(),
    ];

    /// Field names that denote a tick box or a yes/no choice
    static ref CHECKBOX_NAME_PATTERNS: Vec<Regex> = vec![
        // Bracket placeholders, optionally already marked: [ ], ( ), {x}
        Regex::new(r"[\[({]\s*[x✓✔]?\s*[\])}]").unwrap(),
        Regex::new(r"[□■○●☐☑☒]").unwrap(),
        // German
        Regex::new(r"\b(ankreuz|kreuz|markier|auswahl|check|häkchen)").unwrap(),
        Regex::new(r"\b(ja|nein|j/n)\b").unwrap(),
        Regex::new(r"\bzutreffend(es)?\b").unwrap(),
        Regex::new(r"\bwählen?\b").unwrap(),
        Regex::new(r"\boptionen?\b").unwrap(),
        Regex::new(r"\bauswahlfeld\b").unwrap(),
        Regex::new(r"\bkästchen\b").unwrap(),
        // English
        Regex::new(r"\b(tick|mark|check|select|choice|box)\b").unwrap(),
        Regex::new(r"\b(yes|no|y/n)\b").unwrap(),
        Regex::new(r"\boption\b").unwrap(),
        Regex::new(r"\bselection\b").unwrap(),
    ];

    /// Values a checkbox rendered as text typically holds
    static ref CHECKBOX_VALUE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"^[x✓✔]$").unwrap(),
        Regex::new(r"^(ja|nein|yes|no)$").unwrap(),
        Regex::new(r"^(true|false|0|1|on|off)$").unwrap(),
        Regex::new(r"^(checked|unchecked|selected|none)$").unwrap(),
        Regex::new(r"^\s*[■●☑☒]\s*$").unwrap(),
        Regex::new(r"^\s*$").unwrap(),
    ];
}

/// Width and height of a widget rectangle, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetSize {
    pub width: f64,
    pub height: f64,
}

impl WidgetSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Outcome of running both predicates on one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub is_date: bool,
    pub is_checkbox_like: bool,
}

/// Classifier with configurable geometry thresholds
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, name: &str, value: &str, geometry: Option<WidgetSize>) -> Classification {
        Classification {
            is_date: self.is_date(name, value),
            is_checkbox_like: self.is_checkbox_like(name, value, geometry),
        }
    }

    /// True if the name reads like a date field or the value looks like a date
    pub fn is_date(&self, name: &str, value: &str) -> bool {
        let name = normalize(name);
        let value = normalize(value);

        DATE_NAME_PATTERNS.iter().any(|p| p.is_match(&name))
            || DATE_VALUE_PATTERNS.iter().any(|p| p.is_match(&value))
    }

    /// True if the field is most likely a checkbox rendered as text
    ///
    /// All three signals are computed before combining them.
    pub fn is_checkbox_like(&self, name: &str, value: &str, geometry: Option<WidgetSize>) -> bool {
        let name = normalize(name);
        let value = normalize(value);

        let has_checkbox_name = CHECKBOX_NAME_PATTERNS.iter().any(|p| p.is_match(&name));
        let has_checkbox_value = CHECKBOX_VALUE_PATTERNS.iter().any(|p| p.is_match(&value));
        let has_short_value = value.chars().count() <= self.config.short_value_len;
        let is_small_square = geometry.map(|g| self.is_small_square(g)).unwrap_or(false);

        has_checkbox_name || has_checkbox_value || (is_small_square && has_short_value)
    }

    fn is_small_square(&self, size: WidgetSize) -> bool {
        if !size.width.is_finite() || !size.height.is_finite() {
            return false;
        }
        let is_small = size.width < self.config.small_size && size.height < self.config.small_size;
        let is_square = (size.width - size.height).abs() < self.config.square_tolerance;
        is_small && is_square
    }
}

/// [`Classifier::is_date`] with default thresholds
pub fn is_date(name: &str, value: &str) -> bool {
    Classifier::default().is_date(name, value)
}

/// [`Classifier::is_checkbox_like`] with default thresholds
pub fn is_checkbox_like(name: &str, value: &str, geometry: Option<WidgetSize>) -> bool {
    Classifier::default().is_checkbox_like(name, value, geometry)
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
