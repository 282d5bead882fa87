//! Structural analysis of EBNF grammar text.
//!
//! [`analyze`] measures the grammar, detects patterns at the requested
//! depth, scores its complexity and derives optimization suggestions.
//! [`optimization_report`] condenses a comprehensive analysis into a
//! prioritised summary.

use crate::complexity::{
    ComplexityAnalysis, ComplexityAssessment, ComplexityLevel, PerformancePrediction,
    StructureMetrics,
};
use crate::config::Config;
use crate::error::{contain, LintError};
use crate::grammar::Grammar;
use crate::patterns::{self, Pattern, PatternKind};
use crate::suggest;
use facet::Facet;
use std::fmt;
use std::str::FromStr;

/// How much pattern detection to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum AnalysisDepth {
    /// Only the heavier structural patterns.
    #[facet(rename = "basic")]
    Basic,
    /// Every structural pattern plus sub-expressions, nesting and ambiguity.
    #[facet(rename = "detailed")]
    Detailed,
    /// Same detection as `Detailed`; the default.
    #[default]
    #[facet(rename = "comprehensive")]
    Comprehensive,
}

impl AnalysisDepth {
    /// The canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisDepth::Basic => "basic",
            AnalysisDepth::Detailed => "detailed",
            AnalysisDepth::Comprehensive => "comprehensive",
        }
    }

    /// Whether patterns of `kind` are reported at this depth.
    #[must_use]
    pub fn includes(self, kind: PatternKind) -> bool {
        match self {
            AnalysisDepth::Basic => {
                !kind.is_advanced()
                    && kind.optimization_potential() >= patterns::BASIC_MIN_POTENTIAL
            }
            AnalysisDepth::Detailed | AnalysisDepth::Comprehensive => true,
        }
    }
}

impl fmt::Display for AnalysisDepth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisDepth {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(AnalysisDepth::Basic),
            "detailed" => Ok(AnalysisDepth::Detailed),
            "comprehensive" => Ok(AnalysisDepth::Comprehensive),
            _ => Err(LintError::UnknownDepth(s.to_string())),
        }
    }
}

/// Context recorded alongside an analysis.
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct AnalysisMetadata {
    /// The depth the analysis ran at.
    pub analysis_depth: AnalysisDepth,
    /// Length of the input text in characters.
    pub grammar_length: usize,
    /// Set when the analysis could not run; everything else is then empty.
    pub error: Option<String>,
}

/// The report of one [`analyze`] call.
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct AnalysisResult {
    /// Counts and ratios over the extracted grammar.
    pub structure_metrics: StructureMetrics,
    /// Detected patterns, in a fixed kind order.
    pub patterns: Vec<Pattern>,
    /// Improvement hints.
    pub optimization_suggestions: Vec<String>,
    /// Analysis-path complexity score and breakdown.
    pub complexity_analysis: ComplexityAnalysis,
    /// Depth, input length and any failure.
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    fn failed(depth: AnalysisDepth, grammar_length: usize, error: &LintError) -> Self {
        let structure_metrics = StructureMetrics::default();
        let complexity_analysis = ComplexityAnalysis::score(&structure_metrics, &[]);
        Self {
            structure_metrics,
            patterns: Vec::new(),
            optimization_suggestions: Vec::new(),
            complexity_analysis,
            metadata: AnalysisMetadata {
                analysis_depth: depth,
                grammar_length,
                error: Some(error.to_string()),
            },
        }
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "grammar analysis completed: complexity {:.2}, {} patterns, {} suggestions",
            self.complexity_analysis.score,
            self.patterns.len(),
            self.optimization_suggestions.len()
        )
    }
}

/// Analyzes grammar text at the given depth with the default [`Config`].
///
/// Never fails: a failure is recorded in [`AnalysisMetadata::error`].
#[must_use]
pub fn analyze(text: &str, depth: AnalysisDepth) -> AnalysisResult {
    analyze_with(text, depth, &Config::default())
}

/// Analyzes grammar text at the given depth with an explicit [`Config`].
#[must_use]
pub fn analyze_with(text: &str, depth: AnalysisDepth, config: &Config) -> AnalysisResult {
    let grammar_length = text.chars().count();
    contain(|| run(text, depth, config, grammar_length)).unwrap_or_else(|err| {
        tracing::warn!(%err, %depth, "analysis aborted");
        AnalysisResult::failed(depth, grammar_length, &err)
    })
}

fn run(
    text: &str,
    depth: AnalysisDepth,
    config: &Config,
    grammar_length: usize,
) -> Result<AnalysisResult, LintError> {
    config.check_input(text)?;
    let grammar = Grammar::parse(text);

    let structure_metrics = StructureMetrics::measure(&grammar);
    let patterns = patterns::detect(&grammar, depth, config);
    let complexity_analysis = ComplexityAnalysis::score(&structure_metrics, &patterns);
    let optimization_suggestions = if config.include_suggestions {
        suggest::for_analysis(&structure_metrics, &patterns, &complexity_analysis, config)
    } else {
        Vec::new()
    };

    tracing::debug!(
        %depth,
        rules = structure_metrics.rule_count,
        patterns = patterns.len(),
        score = complexity_analysis.score,
        "analyzed grammar"
    );

    Ok(AnalysisResult {
        structure_metrics,
        patterns,
        optimization_suggestions,
        complexity_analysis,
        metadata: AnalysisMetadata {
            analysis_depth: depth,
            grammar_length,
            error: None,
        },
    })
}

/// Runs the validation-path complexity formula over grammar text.
///
/// # Errors
///
/// Returns [`LintError::InputTooLarge`] for oversized input, or
/// [`LintError::Internal`] if extraction fails unexpectedly.
pub fn assess_complexity(text: &str) -> Result<ComplexityAssessment, LintError> {
    let config = Config::default();
    contain(|| {
        config.check_input(text)?;
        Ok(ComplexityAssessment::of(&Grammar::parse(text)))
    })
}

/// Score above which optimization is high priority.
const HIGH_PRIORITY_SCORE: f64 = 0.8;
/// Score above which optimization is medium priority.
const MEDIUM_PRIORITY_SCORE: f64 = 0.5;
/// Patterns heavier than this count as high impact.
const HIGH_IMPACT: f64 = 0.7;

/// How urgently a grammar should be optimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum OptimizationPriority {
    /// Nothing pressing.
    #[facet(rename = "low")]
    Low,
    /// Worth a look.
    #[facet(rename = "medium")]
    Medium,
    /// Very complex, or several high-impact patterns.
    #[facet(rename = "high")]
    High,
}

impl OptimizationPriority {
    /// Priority from a complexity score and the number of high-impact patterns.
    #[must_use]
    pub fn assess(score: f64, high_impact_patterns: usize) -> Self {
        if score > HIGH_PRIORITY_SCORE || high_impact_patterns > 3 {
            OptimizationPriority::High
        } else if score > MEDIUM_PRIORITY_SCORE || high_impact_patterns > 1 {
            OptimizationPriority::Medium
        } else {
            OptimizationPriority::Low
        }
    }
}

impl fmt::Display for OptimizationPriority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            OptimizationPriority::Low => "low",
            OptimizationPriority::Medium => "medium",
            OptimizationPriority::High => "high",
        })
    }
}

/// Headline figures of an [`OptimizationReport`].
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct OptimizationSummary {
    /// Complexity band.
    pub complexity_level: ComplexityLevel,
    /// Expected parsing performance.
    pub performance_prediction: PerformancePrediction,
    /// How urgently to optimize.
    pub optimization_priority: OptimizationPriority,
}

/// One pattern as listed in a report.
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct PatternSummary {
    /// What was detected.
    pub kind: PatternKind,
    /// Human-readable description.
    pub description: String,
    /// Number of matches.
    pub count: usize,
    /// Optimization potential of the kind.
    pub impact: f64,
}

impl From<&Pattern> for PatternSummary {
    fn from(pattern: &Pattern) -> Self {
        Self {
            kind: pattern.kind,
            description: pattern.description.clone(),
            count: pattern.occurrences,
            impact: pattern.optimization_potential,
        }
    }
}

/// A prioritised digest of a comprehensive analysis.
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct OptimizationReport {
    /// Headline figures.
    pub summary: OptimizationSummary,
    /// Structure metrics of the grammar.
    pub metrics: StructureMetrics,
    /// Detected patterns.
    pub patterns: Vec<PatternSummary>,
    /// Improvement hints.
    pub suggestions: Vec<String>,
    /// Complexity score and breakdown.
    pub complexity: ComplexityAnalysis,
    /// Set when the underlying analysis could not run.
    pub error: Option<String>,
}

impl From<AnalysisResult> for OptimizationReport {
    fn from(analysis: AnalysisResult) -> Self {
        let complexity = analysis.complexity_analysis;
        let high_impact = analysis
            .patterns
            .iter()
            .filter(|p| p.optimization_potential > HIGH_IMPACT)
            .count();
        Self {
            summary: OptimizationSummary {
                complexity_level: complexity.level,
                performance_prediction: complexity.performance_prediction,
                optimization_priority: OptimizationPriority::assess(complexity.score, high_impact),
            },
            metrics: analysis.structure_metrics,
            patterns: analysis.patterns.iter().map(PatternSummary::from).collect(),
            suggestions: analysis.optimization_suggestions,
            complexity,
            error: analysis.metadata.error,
        }
    }
}

impl fmt::Display for OptimizationReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "optimization priority {}: complexity {}, performance {}",
            self.summary.optimization_priority,
            self.summary.complexity_level,
            self.summary.performance_prediction
        )
    }
}

/// Runs a comprehensive analysis and condenses it into a report.
#[must_use]
pub fn optimization_report(text: &str) -> OptimizationReport {
    analyze(text, AnalysisDepth::Comprehensive).into()
}
