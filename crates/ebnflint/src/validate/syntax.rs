//! Syntax checks: character set, stray quotes, bracket balance and rule-line
//! shape.
//!
//! All three run over the normalized text and always report errors; none of
//! them stops the others.

use super::Findings;
use crate::grammar::scan::{
    closer_for, is_closer, is_opener, stray_quotes, Located, Structural,
};
use crate::grammar::Grammar;
use std::collections::BTreeSet;

/// Punctuation allowed besides word characters and whitespace.
const ALLOWED_PUNCTUATION: &[char] = &[
    '=', '[', ']', '{', '}', '(', ')', '|', '"', ';', ',', '-', '+', '*', '?', '.',
];

/// Runs every syntax check against an extracted grammar.
#[must_use]
pub fn check(grammar: &Grammar) -> Findings {
    let mut findings = Findings::default();
    findings.errors.extend(check_characters(&grammar.text));
    findings.errors.extend(check_literals(&grammar.text));
    findings.errors.extend(check_brackets(&grammar.text));
    findings.errors.extend(
        grammar
            .malformed_lines
            .iter()
            .map(|line| format!("line {line}: invalid rule format")),
    );
    findings
}

/// Reports the set of characters outside the EBNF alphabet, if any.
#[must_use]
pub fn check_characters(text: &str) -> Option<String> {
    let invalid: BTreeSet<char> = text.chars().filter(|&ch| !is_allowed(ch)).collect();
    if invalid.is_empty() {
        return None;
    }
    let listed: Vec<String> = invalid.iter().map(|ch| format!("'{ch}'")).collect();
    Some(format!("invalid characters found: {}", listed.join(", ")))
}

/// Reports every quote left without a partner on its line.
#[must_use]
pub fn check_literals(text: &str) -> Vec<String> {
    stray_quotes(text)
        .into_iter()
        .map(|pos| format!("unterminated literal at position {pos}"))
        .collect()
}

fn is_allowed(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch.is_whitespace() || ALLOWED_PUNCTUATION.contains(&ch)
}

/// Checks that `(`, `[` and `{` are closed in properly nested order.
///
/// Positions are zero-based character indices. Brackets inside quoted
/// literals are ignored. Openers still unclosed at the end are reported in
/// source order.
#[must_use]
pub fn check_brackets(text: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let mut stack: Vec<Located> = Vec::new();

    for loc in Structural::new(text) {
        if is_opener(loc.ch) {
            stack.push(loc);
        } else if is_closer(loc.ch) {
            match stack.pop() {
                None => errors.push(format!(
                    "unmatched closing bracket '{}' at position {}",
                    loc.ch, loc.pos
                )),
                Some(open) if closer_for(open.ch) != Some(loc.ch) => errors.push(format!(
                    "mismatched brackets at position {}: '{}' closed by '{}'",
                    loc.pos, open.ch, loc.ch
                )),
                Some(_) => {}
            }
        }
    }

    errors.extend(stack.into_iter().map(|open| {
        format!(
            "unmatched opening bracket '{}' at position {}",
            open.ch, open.pos
        )
    }));
    errors
}
