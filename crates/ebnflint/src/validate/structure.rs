//! Structural checks: missing rules, duplicates, undefined and unused symbols.

use super::{join, Findings, ValidationLevel};
use crate::grammar::Grammar;

/// Message reported for text without a single rule line.
pub const NO_RULES: &str = "no valid rules found";

/// Checks rule definitions against symbol references.
///
/// An empty rule set is reported alone, skipping the remaining checks.
#[must_use]
pub fn check(grammar: &Grammar, level: ValidationLevel) -> Findings {
    let mut findings = Findings::default();

    if grammar.rules.is_empty() {
        findings.errors.push(NO_RULES.to_string());
        return findings;
    }

    let duplicates = grammar.duplicate_names();
    if !duplicates.is_empty() {
        findings
            .errors
            .push(format!("duplicate rule definitions: {}", join(duplicates)));
    }

    let undefined = grammar.undefined_symbols();
    if !undefined.is_empty() {
        let message = format!("undefined non-terminals: {}", join(undefined));
        match level {
            ValidationLevel::Strict => findings.errors.push(message),
            ValidationLevel::Moderate => findings.warnings.push(message),
            ValidationLevel::Lenient => {}
        }
    }

    let unused = grammar.unused_rules();
    if !unused.is_empty() {
        match level {
            ValidationLevel::Strict => findings
                .warnings
                .push(format!("unused rules: {}", join(unused))),
            ValidationLevel::Moderate | ValidationLevel::Lenient => {}
        }
    }

    findings
}
