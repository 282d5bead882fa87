//! Structural validation and analysis for EBNF grammar notation.
//!
//! ```
//! use ebnflint::{validate, ValidationLevel};
//!
//! let result = validate(r#"A = A "x" | "y" ;"#, ValidationLevel::Strict);
//! assert!(!result.is_valid);
//! assert_eq!(result.errors, vec!["left recursive rules detected: A"]);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::multiple_crate_versions)]

/// Comment stripping and whitespace canonicalization.
///
/// Every other stage reads normalized text, so this is where the few
/// lexical conventions of the notation (comments, `=` spacing, `;` line
/// breaks) are settled once.
pub mod normalize;

/// Rule and symbol extraction.
///
/// Produces the [`Grammar`] shared by validation and analysis, along with
/// the literal-aware scanners both use.
pub mod grammar;

/// Grammar validation at a chosen strictness.
pub mod validate;

/// Recurring structural motifs and their optimization weight.
pub mod patterns;

/// Structure metrics and the two complexity scores.
pub mod complexity;

/// Optimization suggestions for validation and analysis results.
pub mod suggest;

/// Structural analysis and the optimization report.
pub mod analyze;

/// Engine limits and thresholds.
pub mod config;

/// The engine error type and the boundary that contains failures.
pub mod error;

pub use analyze::{
    analyze, analyze_with, assess_complexity, optimization_report, AnalysisDepth,
    AnalysisMetadata, AnalysisResult, OptimizationPriority, OptimizationReport,
};
pub use complexity::{
    ComplexityAnalysis, ComplexityAssessment, ComplexityLevel, PerformancePrediction,
    StructureMetrics,
};
pub use config::Config;
pub use error::LintError;
pub use grammar::{Grammar, Rule};
pub use patterns::{Pattern, PatternKind};
pub use validate::{validate, validate_with, ValidationLevel, ValidationMetadata, ValidationResult};
