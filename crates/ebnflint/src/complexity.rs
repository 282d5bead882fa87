//! Structure metrics and complexity scoring.
//!
//! Two scores exist. The *validation* score weighs symbol counts directly;
//! the *analysis* score swaps those for the weight of the detected patterns.
//! Both read the same [`StructureMetrics`].

use crate::grammar::Grammar;
use crate::patterns::Pattern;
use facet::Facet;
use std::fmt;

/// Counts and ratios measured over an extracted grammar.
#[derive(Debug, Clone, Default, PartialEq, Facet)]
pub struct StructureMetrics {
    /// Number of rule definitions.
    pub rule_count: usize,
    /// Number of distinct terminals.
    pub terminal_count: usize,
    /// Number of distinct referenced non-terminals.
    pub non_terminal_count: usize,
    /// Mean rule body length in characters.
    pub average_rule_length: f64,
    /// Longest rule body in characters.
    pub max_rule_length: usize,
    /// Mean number of alternatives per rule.
    pub average_branching_factor: f64,
    /// Length of the normalized grammar in characters.
    pub grammar_size: usize,
    /// Rules per 1000 characters.
    pub rule_density: f64,
    /// Deepest bracket nesting.
    pub max_nesting_depth: usize,
}

impl StructureMetrics {
    /// Measures a grammar.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn measure(grammar: &Grammar) -> Self {
        let rule_count = grammar.rules.len();
        let divisor = rule_count.max(1) as f64;
        let lengths: Vec<usize> = grammar.rules.iter().map(|rule| rule.body_len()).collect();
        let branches: usize = grammar.rules.iter().map(|rule| rule.branching_factor()).sum();
        let grammar_size = grammar.char_len();

        Self {
            rule_count,
            terminal_count: grammar.terminals.len(),
            non_terminal_count: grammar.non_terminals.len(),
            average_rule_length: lengths.iter().sum::<usize>() as f64 / divisor,
            max_rule_length: lengths.iter().copied().max().unwrap_or(0),
            average_branching_factor: branches as f64 / divisor,
            grammar_size,
            rule_density: rule_count as f64 / grammar_size.max(1) as f64 * 1000.0,
            max_nesting_depth: grammar.max_nesting_depth(),
        }
    }

    /// The validation-path score, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn validation_score(&self) -> f64 {
        let raw = 0.01 * self.rule_count as f64
            + 0.005 * self.terminal_count as f64
            + 0.01 * self.non_terminal_count as f64
            + 0.001 * self.average_rule_length
            + 0.1 * self.max_nesting_depth as f64;
        raw.clamp(0.0, 1.0)
    }
}

/// Coarse complexity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum ComplexityLevel {
    /// Score below 0.3.
    #[facet(rename = "low")]
    Low,
    /// Score below 0.6.
    #[facet(rename = "medium")]
    Medium,
    /// Score below 0.8.
    #[facet(rename = "high")]
    High,
    /// Anything higher.
    #[facet(rename = "very_high")]
    VeryHigh,
}

impl ComplexityLevel {
    /// Band for a score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            ComplexityLevel::Low
        } else if score < 0.6 {
            ComplexityLevel::Medium
        } else if score < 0.8 {
            ComplexityLevel::High
        } else {
            ComplexityLevel::VeryHigh
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ComplexityLevel::Low => "low",
            ComplexityLevel::Medium => "medium",
            ComplexityLevel::High => "high",
            ComplexityLevel::VeryHigh => "very high",
        })
    }
}

/// Expected parsing performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum PerformancePrediction {
    /// Score below 0.3.
    #[facet(rename = "excellent")]
    Excellent,
    /// Score below 0.5.
    #[facet(rename = "good")]
    Good,
    /// Score below 0.7.
    #[facet(rename = "fair")]
    Fair,
    /// Anything higher.
    #[facet(rename = "poor")]
    Poor,
}

impl PerformancePrediction {
    /// Prediction for a score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            PerformancePrediction::Excellent
        } else if score < 0.5 {
            PerformancePrediction::Good
        } else if score < 0.7 {
            PerformancePrediction::Fair
        } else {
            PerformancePrediction::Poor
        }
    }
}

impl fmt::Display for PerformancePrediction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            PerformancePrediction::Excellent => "excellent",
            PerformancePrediction::Good => "good",
            PerformancePrediction::Fair => "fair",
            PerformancePrediction::Poor => "poor",
        })
    }
}

/// Analysis-path complexity with its breakdown.
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct ComplexityAnalysis {
    /// Overall score in `[0, 1]`.
    pub score: f64,
    /// Band of `score`.
    pub level: ComplexityLevel,
    /// Performance expectation derived from `score`.
    pub performance_prediction: PerformancePrediction,
    /// `1 - score`, floored at zero.
    pub maintainability_score: f64,
    /// Contribution of the rule count.
    pub rule_complexity: f64,
    /// Contribution of the nesting depth.
    pub structural_complexity: f64,
    /// Mean weighted pattern occurrence count.
    pub pattern_complexity: f64,
}

impl ComplexityAnalysis {
    /// Scores a grammar from its metrics and detected patterns.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score(metrics: &StructureMetrics, patterns: &[Pattern]) -> Self {
        let weighted: f64 = patterns
            .iter()
            .map(|p| p.occurrences as f64 * p.optimization_potential)
            .sum();
        let pattern_complexity = weighted / patterns.len().max(1) as f64;
        let rule_complexity = 0.01 * metrics.rule_count as f64;
        let structural_complexity = 0.1 * metrics.max_nesting_depth as f64;

        let score = (rule_complexity
            + 0.001 * metrics.average_rule_length
            + structural_complexity
            + 0.2 * pattern_complexity)
            .clamp(0.0, 1.0);

        Self {
            score,
            level: ComplexityLevel::from_score(score),
            performance_prediction: PerformancePrediction::from_score(score),
            maintainability_score: (1.0 - score).max(0.0),
            rule_complexity,
            structural_complexity,
            pattern_complexity,
        }
    }
}

/// Validation-path complexity of a grammar.
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct ComplexityAssessment {
    /// The metrics the score was computed from.
    pub metrics: StructureMetrics,
    /// Score in `[0, 1]`.
    pub score: f64,
    /// Band of `score`.
    pub level: ComplexityLevel,
}

impl ComplexityAssessment {
    /// Assesses an extracted grammar.
    #[must_use]
    pub fn of(grammar: &Grammar) -> Self {
        let metrics = StructureMetrics::measure(grammar);
        let score = metrics.validation_score();
        Self {
            metrics,
            score,
            level: ComplexityLevel::from_score(score),
        }
    }
}
