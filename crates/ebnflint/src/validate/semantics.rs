//! Semantic checks: immediate left recursion and empty productions.

use super::{join, Findings, ValidationLevel};
use crate::grammar::Grammar;

/// Flags rules that top-down parsers cannot handle directly.
#[must_use]
pub fn check(grammar: &Grammar, level: ValidationLevel) -> Findings {
    let mut findings = Findings::default();

    let left_recursive = grammar.left_recursive_rules();
    if !left_recursive.is_empty() {
        let message = format!("left recursive rules detected: {}", join(left_recursive));
        match level {
            ValidationLevel::Strict => findings.errors.push(message),
            ValidationLevel::Moderate | ValidationLevel::Lenient => findings.warnings.push(message),
        }
    }

    let empty = grammar.empty_production_rules();
    if !empty.is_empty() && level == ValidationLevel::Strict {
        findings
            .warnings
            .push(format!("empty productions found: {}", join(empty)));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_recursion_is_error_when_strict() {
        let grammar = Grammar::parse(r#"A = A "x" | "y" ;"#);
        let strict = check(&grammar, ValidationLevel::Strict);
        assert_eq!(strict.errors, vec!["left recursive rules detected: A"]);

        let lenient = check(&grammar, ValidationLevel::Lenient);
        assert!(lenient.errors.is_empty());
        assert_eq!(lenient.warnings, vec!["left recursive rules detected: A"]);
    }

    #[test]
    fn test_empty_productions_warn_only_when_strict() {
        let grammar = Grammar::parse(r#"opt = "a" | "" ; none = ;"#);
        let strict = check(&grammar, ValidationLevel::Strict);
        assert_eq!(strict.warnings, vec!["empty productions found: opt, none"]);
        assert!(check(&grammar, ValidationLevel::Moderate).warnings.is_empty());
    }
}
