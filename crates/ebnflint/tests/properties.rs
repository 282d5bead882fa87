//! Property tests for the engine's invariants.
//!
//! - Validation is a pure function of its input.
//! - `is_valid` holds exactly when there are no errors.
//! - Bracket errors appear exactly when brackets are unbalanced.
//! - Growing a grammar never lowers its complexity score.

use ebnflint::{analyze, assess_complexity, validate, AnalysisDepth, ValidationLevel};
use proptest::prelude::*;

fn arb_level() -> impl Strategy<Value = ValidationLevel> {
    prop_oneof![
        Just(ValidationLevel::Strict),
        Just(ValidationLevel::Moderate),
        Just(ValidationLevel::Lenient),
    ]
}

fn arb_depth() -> impl Strategy<Value = AnalysisDepth> {
    prop_oneof![
        Just(AnalysisDepth::Basic),
        Just(AnalysisDepth::Detailed),
        Just(AnalysisDepth::Comprehensive),
    ]
}

/// Text drawn mostly from the notation's own alphabet, so rules, literals,
/// comments and brackets all turn up.
fn arb_grammarish() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-c =|;\"(){}\\[\\]/*\n]{0,80}",
        any::<String>(),
    ]
}

/// Brackets outside literals, pairing quotes left to right; an odd last
/// quote opens nothing. Assumes a single line.
fn structural_brackets(line: &str) -> String {
    let pairable = line.matches('"').count() / 2 * 2;
    let mut seen = 0;
    let mut inside = false;
    let mut brackets = String::new();
    for c in line.chars() {
        if c == '"' {
            seen += 1;
            if seen <= pairable {
                inside = !inside;
            }
        } else if !inside && "()[]{}".contains(c) {
            brackets.push(c);
        }
    }
    brackets
}

/// Balanced iff repeatedly deleting adjacent pairs empties the bracket string.
fn is_balanced(line: &str) -> bool {
    let mut brackets = structural_brackets(line);
    loop {
        let reduced = brackets.replace("()", "").replace("[]", "").replace("{}", "");
        if reduced.len() == brackets.len() {
            return reduced.is_empty();
        }
        brackets = reduced;
    }
}

/// `rules` rules, each nesting `terminals` literals `depth` brackets deep.
fn layered_grammar(rules: usize, terminals: usize, depth: usize) -> String {
    (0..rules)
        .map(|i| {
            let literals: Vec<String> = (0..terminals).map(|j| format!("\"t{i}_{j}\"")).collect();
            format!(
                "r{i} = {}{}{} ;\n",
                "( ".repeat(depth),
                literals.join(" "),
                " )".repeat(depth)
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn validation_is_deterministic(text in arb_grammarish(), level in arb_level()) {
        prop_assert_eq!(validate(&text, level), validate(&text, level));
    }

    #[test]
    fn analysis_is_deterministic(text in arb_grammarish(), depth in arb_depth()) {
        prop_assert_eq!(analyze(&text, depth), analyze(&text, depth));
    }

    #[test]
    fn is_valid_iff_no_errors(text in arb_grammarish(), level in arb_level()) {
        let result = validate(&text, level);
        prop_assert_eq!(result.is_valid, result.errors.is_empty());
        prop_assert_eq!(result.metadata.validation_level, level);
    }

    #[test]
    fn analysis_stays_in_range(text in arb_grammarish(), depth in arb_depth()) {
        let result = analyze(&text, depth);
        let score = result.complexity_analysis.score;
        prop_assert!((0.0..=1.0).contains(&score));
        prop_assert!(result.metadata.error.is_none());
        for pattern in &result.patterns {
            prop_assert!(pattern.occurrences > 0);
            prop_assert!(pattern.examples.len() <= 5);
        }
    }

    #[test]
    fn bracket_errors_iff_unbalanced(text in "[a-d ()\\[\\]{}\"]{0,60}") {
        let result = validate(&text, ValidationLevel::Lenient);
        let bracket_errors = result.errors.iter().filter(|e| e.contains("bracket")).count();
        prop_assert_eq!(bracket_errors == 0, is_balanced(&text));
    }

    #[test]
    fn stray_quotes_are_reported(text in "[a-c \"]{0,40}") {
        let result = validate(&text, ValidationLevel::Lenient);
        let stray = result.errors.iter().any(|e| e.starts_with("unterminated literal"));
        prop_assert_eq!(stray, text.matches('"').count() % 2 == 1);
    }

    #[test]
    fn complexity_grows_with_grammar(
        rules in 1usize..30,
        terminals in 1usize..6,
        depth in 0usize..8,
    ) {
        let score = |r, t, d| {
            assess_complexity(&layered_grammar(r, t, d))
                .map(|assessment| assessment.score)
                .unwrap_or(f64::NAN)
        };
        let base = score(rules, terminals, depth);
        prop_assert!(score(rules + 1, terminals, depth) >= base);
        prop_assert!(score(rules, terminals + 1, depth) >= base);
        prop_assert!(score(rules, terminals, depth + 1) >= base);
    }
}
