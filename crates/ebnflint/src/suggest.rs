//! Human-readable optimization suggestions.
//!
//! Each condition is checked on its own and several suggestions can apply at
//! once. Output order is fixed and no suggestion appears twice.

use crate::complexity::{ComplexityAnalysis, PerformancePrediction, StructureMetrics};
use crate::config::Config;
use crate::patterns::{Pattern, PatternKind};
use crate::validate::Findings;

/// Suggested whenever errors were found.
pub const FIX_ERRORS: &str = "fix syntax errors before optimization";
/// Suggested whenever warnings were found.
pub const ADDRESS_WARNINGS: &str = "address warnings for grammar quality";
/// Suggested for grammars with many rules.
pub const MODULARIZE: &str = "modularize the grammar";
/// Suggested for grammars with many terminals.
pub const TOKEN_CLASSES: &str = "use token classes for similar terminals";
/// Suggested when the analysis complexity score is high.
pub const SIMPLIFY_RULES: &str = "break down complex rules into simpler components";
/// Suggested when left recursion was detected.
pub const ELIMINATE_LEFT_RECURSION: &str = "eliminate left recursion";
/// Suggested when sub-expressions repeat.
pub const FACTOR_SUBEXPRESSIONS: &str = "factor out repeated sub-expressions";
/// Suggested when nesting is deep.
pub const REDUCE_NESTING: &str = "reduce nesting depth";
/// Suggested when alternatives share long prefixes.
pub const RESOLVE_AMBIGUITY: &str = "resolve ambiguity";
/// Suggested when parsing performance is predicted to suffer.
pub const OPTIMIZE_PERFORMANCE: &str = "optimize structure for parsing performance";

/// Rule count above which validation suggests modularizing.
pub const VALIDATION_RULE_LIMIT: usize = 50;
/// Rule count above which analysis suggests modularizing.
pub const ANALYSIS_RULE_LIMIT: usize = 100;
/// Terminal count above which token classes are suggested.
pub const TERMINAL_LIMIT: usize = 100;
/// Score above which analysis suggests simplifying rules.
pub const SIMPLIFY_SCORE: f64 = 0.7;

/// Ordered, duplicate-free list of suggestions.
#[derive(Debug, Default)]
struct Suggestions(Vec<String>);

impl Suggestions {
    fn add_if(&mut self, condition: bool, suggestion: &str) {
        if condition && !self.0.iter().any(|s| s == suggestion) {
            self.0.push(suggestion.to_string());
        }
    }
}

/// The suggestion a pattern maps to, if it has one.
#[must_use]
pub fn for_pattern(kind: PatternKind) -> Option<&'static str> {
    match kind {
        PatternKind::LeftRecursion => Some(ELIMINATE_LEFT_RECURSION),
        PatternKind::CommonSubexpression => Some(FACTOR_SUBEXPRESSIONS),
        PatternKind::DeepNesting => Some(REDUCE_NESTING),
        PatternKind::PotentialAmbiguity => Some(RESOLVE_AMBIGUITY),
        PatternKind::RightRecursion
        | PatternKind::OptionalGroup
        | PatternKind::RepetitionGroup
        | PatternKind::Alternation
        | PatternKind::NestedGroup => None,
    }
}

/// Suggestions for a validation verdict.
#[must_use]
pub fn for_validation(
    findings: &Findings,
    rule_count: usize,
    terminal_count: usize,
) -> Vec<String> {
    let mut out = Suggestions::default();
    out.add_if(!findings.errors.is_empty(), FIX_ERRORS);
    out.add_if(!findings.warnings.is_empty(), ADDRESS_WARNINGS);
    out.add_if(rule_count > VALIDATION_RULE_LIMIT, MODULARIZE);
    out.add_if(terminal_count > TERMINAL_LIMIT, TOKEN_CLASSES);
    out.0
}

/// Suggestions for a structural analysis.
///
/// Only patterns whose optimization potential exceeds
/// [`Config::suggestion_threshold`] are considered.
#[must_use]
pub fn for_analysis(
    metrics: &StructureMetrics,
    patterns: &[Pattern],
    complexity: &ComplexityAnalysis,
    config: &Config,
) -> Vec<String> {
    let mut out = Suggestions::default();
    out.add_if(complexity.score > SIMPLIFY_SCORE, SIMPLIFY_RULES);
    out.add_if(metrics.rule_count > ANALYSIS_RULE_LIMIT, MODULARIZE);
    out.add_if(metrics.terminal_count > TERMINAL_LIMIT, TOKEN_CLASSES);
    for pattern in patterns {
        if pattern.optimization_potential > config.suggestion_threshold {
            if let Some(suggestion) = for_pattern(pattern.kind) {
                out.add_if(true, suggestion);
            }
        }
    }
    out.add_if(
        matches!(
            complexity.performance_prediction,
            PerformancePrediction::Fair | PerformancePrediction::Poor
        ),
        OPTIMIZE_PERFORMANCE,
    );
    out.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complexity::ComplexityLevel;

    fn findings(errors: usize, warnings: usize) -> Findings {
        Findings {
            errors: vec!["e".to_string(); errors],
            warnings: vec!["w".to_string(); warnings],
        }
    }

    fn complexity(score: f64) -> ComplexityAnalysis {
        ComplexityAnalysis {
            score,
            level: ComplexityLevel::from_score(score),
            performance_prediction: PerformancePrediction::from_score(score),
            maintainability_score: 1.0 - score,
            rule_complexity: 0.0,
            structural_complexity: 0.0,
            pattern_complexity: 0.0,
        }
    }

    #[test]
    fn test_validation_suggestions_co_occur() {
        assert_eq!(
            for_validation(&findings(1, 1), 51, 101),
            vec![FIX_ERRORS, ADDRESS_WARNINGS, MODULARIZE, TOKEN_CLASSES]
        );
        assert!(for_validation(&findings(0, 0), 50, 100).is_empty());
    }

    #[test]
    fn test_analysis_pattern_suggestions_respect_threshold() {
        let patterns = vec![
            Pattern::new(PatternKind::LeftRecursion, 1, ["a"]),
            Pattern::new(PatternKind::DeepNesting, 1, ["depth 6"]),
            Pattern::new(PatternKind::PotentialAmbiguity, 2, ["x", "y"]),
        ];
        let metrics = StructureMetrics::default();
        let suggestions = for_analysis(&metrics, &patterns, &complexity(0.1), &Config::default());
        assert_eq!(suggestions, vec![ELIMINATE_LEFT_RECURSION, RESOLVE_AMBIGUITY]);

        let eager = Config {
            suggestion_threshold: 0.5,
            ..Config::default()
        };
        let suggestions = for_analysis(&metrics, &patterns, &complexity(0.1), &eager);
        assert_eq!(
            suggestions,
            vec![ELIMINATE_LEFT_RECURSION, REDUCE_NESTING, RESOLVE_AMBIGUITY]
        );
    }

    #[test]
    fn test_analysis_complexity_suggestions() {
        let metrics = StructureMetrics::default();
        let suggestions = for_analysis(&metrics, &[], &complexity(0.75), &Config::default());
        assert_eq!(suggestions, vec![SIMPLIFY_RULES, OPTIMIZE_PERFORMANCE]);

        let suggestions = for_analysis(&metrics, &[], &complexity(0.55), &Config::default());
        assert_eq!(suggestions, vec![OPTIMIZE_PERFORMANCE]);
    }

    #[test]
    fn test_rule_limits_differ_between_paths() {
        let metrics = |rule_count| StructureMetrics {
            rule_count,
            ..StructureMetrics::default()
        };
        let quiet = complexity(0.1);
        let config = Config::default();

        assert!(for_analysis(&metrics(100), &[], &quiet, &config).is_empty());
        assert_eq!(
            for_analysis(&metrics(101), &[], &quiet, &config),
            vec![MODULARIZE]
        );
        assert_eq!(for_validation(&findings(0, 0), 100, 0), vec![MODULARIZE]);
        assert!(for_validation(&findings(0, 0), 50, 0).is_empty());
    }

    #[test]
    fn test_analysis_terminal_limit() {
        let metrics = |terminal_count| StructureMetrics {
            terminal_count,
            ..StructureMetrics::default()
        };
        let quiet = complexity(0.1);
        let config = Config::default();

        assert!(for_analysis(&metrics(100), &[], &quiet, &config).is_empty());
        assert_eq!(
            for_analysis(&metrics(101), &[], &quiet, &config),
            vec![TOKEN_CLASSES]
        );
    }
}
