//! Configuration for extraction and classification
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration. Loading from disk is left to the caller.

use crate::error::FormError;
use serde::{Deserialize, Serialize};

/// How native text fields become descriptors. Applied uniformly per call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// Two descriptors per text field: `<name>_text` and `<name>_choice`
    #[default]
    Split,
    /// One descriptor per text field whose kind comes from the classifier
    Classify,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormfillConfig {
    pub strategy: ExtractionStrategy,
    /// Options offered by choice descriptors derived from text fields
    pub choice_options: Vec<String>,
    pub classifier: ClassifierConfig,
}

impl Default for FormfillConfig {
    fn default() -> Self {
        Self {
            strategy: ExtractionStrategy::default(),
            choice_options: default_choice_options(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl FormfillConfig {
    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Config`] if the TOML is malformed or if
    /// `choice_options` is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use formfill_core::config::{ExtractionStrategy, FormfillConfig};
    ///
    /// let config = FormfillConfig::from_str(r#"
    ///     strategy = "classify"
    ///     [classifier]
    ///     small_size = 24.0
    /// "#).unwrap();
    /// assert_eq!(config.strategy, ExtractionStrategy::Classify);
    /// assert_eq!(config.classifier.square_tolerance, 8.0);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, FormError> {
        let config: Self = toml::from_str(s)
            .map_err(|e| FormError::Config(format!("Failed to parse TOML configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.choice_options.is_empty() {
            return Err(FormError::Config(
                "choice_options must not be empty".to_string(),
            ));
        }
        let ClassifierConfig {
            small_size,
            square_tolerance,
            ..
        } = self.classifier;
        if !small_size.is_finite() || small_size <= 0.0 {
            return Err(FormError::Config(format!(
                "classifier.small_size must be a finite number above zero, got {}",
                small_size
            )));
        }
        if !square_tolerance.is_finite() || square_tolerance < 0.0 {
            return Err(FormError::Config(format!(
                "classifier.square_tolerance must be a finite number of zero or more, got {}",
                square_tolerance
            )));
        }
        Ok(())
    }
}

fn default_choice_options() -> Vec<String> {
    vec!["Ja".to_string(), "Nein".to_string()]
}

/// Thresholds of the geometric checkbox heuristic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Width and height must both be below this (points)
    pub small_size: f64,
    /// Maximum difference between width and height (points)
    pub square_tolerance: f64,
    /// Longest value (in characters) a checkbox-like field may hold
    pub short_value_len: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            small_size: 30.0,
            square_tolerance: 8.0,
            short_value_len: 3,
        }
    }
}
