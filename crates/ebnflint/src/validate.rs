//! Validation of EBNF grammar text.
//!
//! [`validate`] normalizes the input, runs the syntax, structural and
//! semantic checkers, and turns their findings into suggestions. The level
//! decides whether structural and semantic findings count as errors or
//! warnings; syntax findings are always errors.

use crate::config::Config;
use crate::error::{contain, LintError};
use crate::grammar::Grammar;
use crate::suggest;
use facet::Facet;
use std::fmt;
use std::str::FromStr;

/// Syntax checks over the normalized text.
pub mod syntax;

/// Rule-set consistency checks.
pub mod structure;

/// Left recursion and empty production checks.
pub mod semantics;

/// How strictly structural and semantic findings are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum ValidationLevel {
    /// Undefined symbols and left recursion are errors; unused rules and
    /// empty productions are warned about.
    #[default]
    #[facet(rename = "strict")]
    Strict,
    /// Undefined symbols and left recursion are warnings.
    #[facet(rename = "moderate")]
    Moderate,
    /// Undefined symbols are ignored; left recursion is a warning.
    #[facet(rename = "lenient")]
    Lenient,
}

impl ValidationLevel {
    /// The canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationLevel::Strict => "strict",
            ValidationLevel::Moderate => "moderate",
            ValidationLevel::Lenient => "lenient",
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationLevel {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidationLevel::Strict),
            "moderate" => Ok(ValidationLevel::Moderate),
            "lenient" => Ok(ValidationLevel::Lenient),
            _ => Err(LintError::UnknownLevel(s.to_string())),
        }
    }
}

/// Errors and warnings produced by one checker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    /// Findings that make the grammar invalid.
    pub errors: Vec<String>,
    /// Findings worth fixing that leave the grammar valid.
    pub warnings: Vec<String>,
}

impl Findings {
    fn absorb(&mut self, other: Findings) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Counts describing the validated grammar.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct ValidationMetadata {
    /// The level the grammar was validated at.
    pub validation_level: ValidationLevel,
    /// Number of rule definitions, duplicates included.
    pub rule_count: usize,
    /// Number of distinct terminals.
    pub terminal_count: usize,
    /// Number of distinct referenced non-terminals.
    pub non_terminal_count: usize,
}

/// The verdict of one [`validate`] call.
///
/// `is_valid` is `true` exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct ValidationResult {
    /// Whether no errors were found.
    pub is_valid: bool,
    /// Findings that make the grammar invalid.
    pub errors: Vec<String>,
    /// Findings that leave the grammar valid.
    pub warnings: Vec<String>,
    /// Improvement hints derived from the findings and counts.
    pub suggestions: Vec<String>,
    /// Counts describing the grammar.
    pub metadata: ValidationMetadata,
}

impl ValidationResult {
    fn from_findings(
        findings: Findings,
        suggestions: Vec<String>,
        metadata: ValidationMetadata,
    ) -> Self {
        Self {
            is_valid: findings.errors.is_empty(),
            errors: findings.errors,
            warnings: findings.warnings,
            suggestions,
            metadata,
        }
    }

    fn failed(level: ValidationLevel, error: &LintError) -> Self {
        let findings = Findings {
            errors: vec![error.to_string()],
            warnings: Vec::new(),
        };
        let suggestions = suggest::for_validation(&findings, 0, 0);
        Self::from_findings(
            findings,
            suggestions,
            ValidationMetadata {
                validation_level: level,
                rule_count: 0,
                terminal_count: 0,
                non_terminal_count: 0,
            },
        )
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_valid {
            write!(
                f,
                "grammar validation successful, {} warnings found",
                self.warnings.len()
            )
        } else {
            write!(
                f,
                "grammar validation failed, {} errors found",
                self.errors.len()
            )
        }
    }
}

/// Validates grammar text at the given level with the default [`Config`].
///
/// Never fails: malformed input produces a result with errors.
#[must_use]
pub fn validate(text: &str, level: ValidationLevel) -> ValidationResult {
    validate_with(text, level, &Config::default())
}

/// Validates grammar text at the given level with an explicit [`Config`].
#[must_use]
pub fn validate_with(text: &str, level: ValidationLevel, config: &Config) -> ValidationResult {
    contain(|| run(text, level, config)).unwrap_or_else(|err| {
        tracing::warn!(%err, %level, "validation aborted");
        ValidationResult::failed(level, &err)
    })
}

fn run(text: &str, level: ValidationLevel, config: &Config) -> Result<ValidationResult, LintError> {
    config.check_input(text)?;
    let grammar = Grammar::parse(text);

    let mut findings = syntax::check(&grammar);
    findings.absorb(structure::check(&grammar, level));
    findings.absorb(semantics::check(&grammar, level));

    let suggestions =
        suggest::for_validation(&findings, grammar.rules.len(), grammar.terminals.len());

    tracing::debug!(
        %level,
        rules = grammar.rules.len(),
        errors = findings.errors.len(),
        warnings = findings.warnings.len(),
        "validated grammar"
    );

    let metadata = ValidationMetadata {
        validation_level: level,
        rule_count: grammar.rules.len(),
        terminal_count: grammar.terminals.len(),
        non_terminal_count: grammar.non_terminals.len(),
    };
    Ok(ValidationResult::from_findings(findings, suggestions, metadata))
}

/// Joins names for a diagnostic message.
fn join<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names.into_iter().collect::<Vec<_>>().join(", ")
}
