//! Engine configuration.
//!
//! Every knob has a default matching the documented behaviour, so
//! `Config::default()` is what [`validate`](crate::validate()) and
//! [`analyze`](crate::analyze()) use.

use crate::error::LintError;
use facet::Facet;

/// Limits and thresholds applied by the analysis stages.
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct Config {
    /// Inputs longer than this many characters are rejected unread.
    pub max_input_chars: usize,

    /// Nesting deeper than this is reported as deep nesting.
    pub deep_nesting_threshold: usize,

    /// Bracketed contents must be longer than this to count as a sub-expression.
    pub min_subexpression_len: usize,

    /// Shared word-prefix length at which two alternatives look ambiguous.
    pub ambiguity_prefix_len: usize,

    /// Patterns whose optimization potential exceeds this produce suggestions.
    pub suggestion_threshold: f64,

    /// Whether analysis reports carry optimization suggestions.
    pub include_suggestions: bool,
}

/// Default cap on input size, in characters.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 1 << 20;

impl Default for Config {
    fn default() -> Self {
        Self {
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            deep_nesting_threshold: 5,
            min_subexpression_len: 5,
            ambiguity_prefix_len: 3,
            suggestion_threshold: 0.6,
            include_suggestions: true,
        }
    }
}

impl Config {
    /// Parses a complete configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Config`] if the document is not valid JSON or
    /// lacks a field.
    pub fn from_json(json: &str) -> Result<Self, LintError> {
        facet_json::from_str(json).map_err(|e| LintError::Config(e.to_string()))
    }

    /// Rejects input longer than [`Config::max_input_chars`].
    ///
    /// # Errors
    ///
    /// Returns [`LintError::InputTooLarge`] when the limit is exceeded.
    pub fn check_input(&self, text: &str) -> Result<(), LintError> {
        // Byte length bounds char count from above; skip the count when it can't matter.
        if text.len() <= self.max_input_chars {
            return Ok(());
        }
        let len = text.chars().count();
        if len > self.max_input_chars {
            return Err(LintError::InputTooLarge {
                len,
                max: self.max_input_chars,
            });
        }
        Ok(())
    }
}
