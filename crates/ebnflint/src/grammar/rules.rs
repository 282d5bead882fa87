//! Production rules and the rule-line shape.
//!
//! A rule line is `name = body`, optionally closed by `;`. This module owns
//! that shape and the per-rule questions later stages ask: what are the
//! alternatives, does one of them start with the rule itself, is one empty.

use super::scan::{is_ident_continue, leading_identifier, split_alternatives};
use facet::Facet;

/// A single production extracted from a normalized grammar.
///
/// Rules keep their body as raw text; nothing downstream needs a tree, only
/// the alternatives and a handful of prefix/suffix checks.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct Rule {
    /// The left-hand side identifier.
    pub name: String,

    /// Everything after `=`, trimmed, without the closing `;`.
    pub body: String,
}

impl Rule {
    /// Creates a rule from its parts.
    #[must_use]
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }

    /// Parses one line of normalized grammar text.
    ///
    /// Returns `None` unless the line reads `identifier = rest` with a
    /// non-empty `rest`. A single trailing `;` is stripped from the body, so
    /// `a = ;` yields a rule with an empty body while `a =` yields nothing.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        let name = leading_identifier(line)?;
        let rest = line[name.len()..].trim_start().strip_prefix('=')?.trim();
        if rest.is_empty() {
            return None;
        }
        let body = rest.strip_suffix(';').map_or(rest, str::trim_end);
        Some(Self::new(name, body))
    }

    /// The body split on top-level `|`, each alternative trimmed.
    #[must_use]
    pub fn alternatives(&self) -> Vec<&str> {
        split_alternatives(&self.body)
            .into_iter()
            .map(str::trim)
            .collect()
    }

    /// Number of alternatives, i.e. the count of `|` plus one.
    #[must_use]
    pub fn branching_factor(&self) -> usize {
        split_alternatives(&self.body).len()
    }

    /// Body length in characters.
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.body.chars().count()
    }

    /// Returns `true` when some alternative begins with this rule's own name.
    ///
    /// The name must end at an identifier boundary: `expr = exprs "x"` is not
    /// left recursive.
    #[must_use]
    pub fn is_left_recursive(&self) -> bool {
        self.alternatives().into_iter().any(|alt| {
            alt.strip_prefix(self.name.as_str())
                .is_some_and(|after| !after.starts_with(is_ident_continue))
        })
    }

    /// Returns `true` when some alternative is blank or exactly `""`.
    #[must_use]
    pub fn has_empty_alternative(&self) -> bool {
        self.alternatives()
            .into_iter()
            .any(|alt| alt.is_empty() || alt == "\"\"")
    }

    /// The identifier the body ends with, if it ends with a bare one.
    ///
    /// A body ending in a literal, a bracket or any other symbol has none.
    #[must_use]
    pub fn trailing_identifier(&self) -> Option<&str> {
        let body = self.body.trim_end();
        let start = body
            .char_indices()
            .rev()
            .take_while(|&(_, ch)| is_ident_continue(ch))
            .last()
            .map(|(idx, _)| idx)?;
        let word = &body[start..];
        if word.starts_with(|ch: char| ch.is_ascii_alphabetic()) && !body[..start].ends_with('"') {
            Some(word)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_rule() {
        let rule = Rule::parse_line(r#"expr = term "+" expr;"#).unwrap();
        assert_eq!(rule.name, "expr");
        assert_eq!(rule.body, r#"term "+" expr"#);
    }

    #[test]
    fn test_parse_without_terminator() {
        let rule = Rule::parse_line("digit = \"0\" | \"1\"").unwrap();
        assert_eq!(rule.body, "\"0\" | \"1\"");
    }

    #[test]
    fn test_parse_empty_body_with_terminator() {
        let rule = Rule::parse_line("blank =;").unwrap();
        assert_eq!(rule.body, "");
        assert!(rule.has_empty_alternative());
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert!(Rule::parse_line("blank =").is_none());
        assert!(Rule::parse_line("= body;").is_none());
        assert!(Rule::parse_line("9lives = x;").is_none());
        assert!(Rule::parse_line("a-b = x;").is_none());
    }

    #[test]
    fn test_alternatives_and_branching() {
        let rule = Rule::new("op", r#""|" | "+" | "-""#);
        assert_eq!(rule.alternatives(), vec![r#""|""#, r#""+""#, r#""-""#]);
        assert_eq!(rule.branching_factor(), 3);
    }

    #[test]
    fn test_left_recursion_needs_identifier_boundary() {
        assert!(Rule::new("A", r#"A "x" | "y""#).is_left_recursive());
        assert!(Rule::new("A", r#""y" | A"#).is_left_recursive());
        assert!(!Rule::new("A", r#"AB "x""#).is_left_recursive());
        assert!(!Rule::new("A", r#""x" A"#).is_left_recursive());
    }

    #[test]
    fn test_empty_alternatives() {
        assert!(Rule::new("opt", r#""a" | """#).has_empty_alternative());
        assert!(Rule::new("opt", r#""a" | "#).has_empty_alternative());
        assert!(!Rule::new("opt", r#""a" | "b""#).has_empty_alternative());
    }

    #[test]
    fn test_trailing_identifier() {
        assert_eq!(Rule::new("list", "item \",\" list").trailing_identifier(), Some("list"));
        assert_eq!(Rule::new("word", "letter { letter }").trailing_identifier(), None);
        assert_eq!(Rule::new("kw", "\"if\"").trailing_identifier(), None);
        assert_eq!(Rule::new("num", "\"x\" 42").trailing_identifier(), None);
    }
}
