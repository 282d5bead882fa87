//! Rule and symbol extraction for EBNF grammar text.
//!
//! This module turns normalized grammar text into the [`Grammar`] every
//! later stage reads: the rules in source order, the terminal and
//! non-terminal sets, and the lines that look like rules but are not.
//! Extraction never fails; anything it cannot read is recorded for the
//! syntax checker instead.

use crate::normalize::normalize;
use std::collections::BTreeSet;

/// Production rules and the rule-line shape.
pub mod rules;

/// Literal-aware single-pass scanners.
pub mod scan;

pub use rules::Rule;

/// The extracted view of one grammar.
///
/// Symbol sets are computed over the whole text rather than per rule, since
/// their only consumers are the global structural checks and the metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    /// The normalized text everything below was derived from.
    pub text: String,

    /// Rules in source order; names may repeat.
    pub rules: Vec<Rule>,

    /// Contents of every quoted literal.
    pub terminals: BTreeSet<String>,

    /// Identifiers referenced on the right-hand side of some rule.
    pub non_terminals: BTreeSet<String>,

    /// 1-based numbers of lines that contain `=` but are not rule lines.
    pub malformed_lines: Vec<usize>,
}

impl Grammar {
    /// Normalizes raw grammar text and extracts it.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::from_normalized(normalize(raw))
    }

    /// Extracts rules and symbols from already-normalized text.
    #[must_use]
    pub fn from_normalized(text: String) -> Self {
        let mut rules = Vec::new();
        let mut malformed_lines = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match Rule::parse_line(line) {
                Some(rule) => rules.push(rule),
                None if has_structural_equals(line) => malformed_lines.push(idx + 1),
                None => {}
            }
        }

        let terminals = scan::quoted_literals(&text);
        let non_terminals = scan::referenced_identifiers(&text);

        Self {
            text,
            rules,
            terminals,
            non_terminals,
            malformed_lines,
        }
    }

    /// Names of all defined rules.
    #[must_use]
    pub fn defined_names(&self) -> BTreeSet<&str> {
        self.rules.iter().map(|rule| rule.name.as_str()).collect()
    }

    /// Names defined by more than one rule.
    #[must_use]
    pub fn duplicate_names(&self) -> BTreeSet<&str> {
        let mut seen = BTreeSet::new();
        self.rules
            .iter()
            .map(|rule| rule.name.as_str())
            .filter(|name| !seen.insert(*name))
            .collect()
    }

    /// Non-terminals referenced somewhere but never defined.
    #[must_use]
    pub fn undefined_symbols(&self) -> BTreeSet<&str> {
        let defined = self.defined_names();
        self.non_terminals
            .iter()
            .map(String::as_str)
            .filter(|name| !defined.contains(name))
            .collect()
    }

    /// Defined rules that nothing references.
    #[must_use]
    pub fn unused_rules(&self) -> BTreeSet<&str> {
        self.defined_names()
            .into_iter()
            .filter(|name| !self.non_terminals.contains(*name))
            .collect()
    }

    /// Rules with a left-recursive alternative, in source order, without repeats.
    #[must_use]
    pub fn left_recursive_rules(&self) -> Vec<&str> {
        self.rule_names_where(Rule::is_left_recursive)
    }

    /// Rules with an empty alternative, in source order, without repeats.
    #[must_use]
    pub fn empty_production_rules(&self) -> Vec<&str> {
        self.rule_names_where(Rule::has_empty_alternative)
    }

    /// Deepest bracket nesting anywhere in the text.
    #[must_use]
    pub fn max_nesting_depth(&self) -> usize {
        scan::max_nesting_depth(&self.text)
    }

    /// Length of the normalized text in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn rule_names_where(&self, predicate: impl Fn(&Rule) -> bool) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.rules
            .iter()
            .filter(|&rule| predicate(rule))
            .map(|rule| rule.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

fn has_structural_equals(line: &str) -> bool {
    scan::Structural::new(line).any(|loc| loc.ch == '=')
}
