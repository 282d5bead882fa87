//! Single-pass scanners shared by every analysis stage.
//!
//! Double-quoted literals are opaque to all of these: a bracket, `|` or `=`
//! inside `"..."` is literal text, not grammar structure. Literals never
//! span lines: a `"` with no partner before the end of its line is a stray
//! quote and opens nothing. Each scanner walks its input once with a
//! constant amount of state, so worst-case cost stays linear in the input
//! length.

use std::collections::BTreeSet;
use std::iter::Enumerate;
use std::str::CharIndices;

/// A character found outside any quoted literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    /// Zero-based character index in the scanned text.
    pub pos: usize,
    /// Byte offset of the character in the scanned text.
    pub byte: usize,
    /// The character itself.
    pub ch: char,
}

/// Iterator over the characters of a text that sit outside quoted literals.
///
/// Paired quote characters are consumed and never yielded; a stray quote is
/// yielded like any other structural character.
pub struct Structural<'a> {
    text: &'a str,
    chars: Enumerate<CharIndices<'a>>,
    in_literal: bool,
}

impl<'a> Structural<'a> {
    /// Starts a scan at the beginning of `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().enumerate(),
            in_literal: false,
        }
    }
}

impl Iterator for Structural<'_> {
    type Item = Located;

    fn next(&mut self) -> Option<Located> {
        loop {
            let (pos, (byte, ch)) = self.chars.next()?;
            if ch == '"' {
                if self.in_literal {
                    self.in_literal = false;
                    continue;
                }
                if closes_on_line(&self.text[byte + 1..]) {
                    self.in_literal = true;
                    continue;
                }
            }
            if !self.in_literal {
                return Some(Located { pos, byte, ch });
            }
        }
    }
}

/// Whether the text following an opening quote holds its partner before the
/// next line break.
#[must_use]
pub fn closes_on_line(after_quote: &str) -> bool {
    after_quote
        .find(['"', '\n'])
        .is_some_and(|idx| after_quote.as_bytes()[idx] == b'"')
}

/// Positions of quotes that have no partner on their line.
#[must_use]
pub fn stray_quotes(text: &str) -> Vec<usize> {
    Structural::new(text)
        .filter(|loc| loc.ch == '"')
        .map(|loc| loc.pos)
        .collect()
}

/// Returns `true` for bracket openers: `(`, `[` and `{`.
#[must_use]
pub fn is_opener(ch: char) -> bool {
    matches!(ch, '(' | '[' | '{')
}

/// Returns `true` for bracket closers: `)`, `]` and `}`.
#[must_use]
pub fn is_closer(ch: char) -> bool {
    matches!(ch, ')' | ']' | '}')
}

/// The closer that matches an opener, if `open` is one.
#[must_use]
pub fn closer_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Returns `true` for characters that may continue an identifier.
#[must_use]
pub fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// The identifier at the start of `text`, if any.
///
/// Identifiers are an ASCII letter followed by ASCII letters, digits or `_`.
#[must_use]
pub fn leading_identifier(text: &str) -> Option<&str> {
    let first = text.chars().next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    let end = text
        .char_indices()
        .find(|&(_, ch)| !is_ident_continue(ch))
        .map_or(text.len(), |(idx, _)| idx);
    Some(&text[..end])
}

/// Every `"..."` literal's contents, collected across the whole text.
///
/// A stray quote contributes nothing.
#[must_use]
pub fn quoted_literals(text: &str) -> BTreeSet<String> {
    let mut literals = BTreeSet::new();
    let mut rest = text;
    while let Some(open) = rest.find('"') {
        let after = &rest[open + 1..];
        match after.find(['"', '\n']) {
            Some(close) if after.as_bytes()[close] == b'"' => {
                literals.insert(after[..close].to_string());
                rest = &after[close + 1..];
            }
            Some(newline) => rest = &after[newline + 1..],
            None => break,
        }
    }
    literals
}

/// Identifiers used as references, i.e. those after the first `=` of a line.
///
/// Literal contents are removed before scanning, so `"a"b` reads as `b`
/// glued to whatever preceded the literal. Lines without an `=` contribute
/// nothing.
#[must_use]
pub fn referenced_identifiers(text: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut seen_equals = false;
    let mut current = String::new();

    let mut flush = |current: &mut String, seen_equals: bool| {
        if seen_equals && !current.is_empty() {
            found.insert(std::mem::take(current));
        } else {
            current.clear();
        }
    };

    for Located { ch, .. } in Structural::new(text) {
        if current.is_empty() {
            if ch.is_ascii_alphabetic() {
                current.push(ch);
            }
        } else if is_ident_continue(ch) {
            current.push(ch);
        } else {
            flush(&mut current, seen_equals);
        }

        match ch {
            '=' => seen_equals = true,
            '\n' => seen_equals = false,
            _ => {}
        }
    }
    flush(&mut current, seen_equals);
    found
}

/// Splits a production body on every `|` that sits outside a literal.
///
/// Brackets do not shield a `|`: `( a | b )` splits into two pieces, which is
/// what the alternative counting in the metrics expects.
#[must_use]
pub fn split_alternatives(body: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for Located { byte, ch, .. } in Structural::new(body) {
        if ch == '|' {
            pieces.push(&body[start..byte]);
            start = byte + 1;
        }
    }
    pieces.push(&body[start..]);
    pieces
}

/// Number of `|` symbols outside literals.
#[must_use]
pub fn count_alternations(text: &str) -> usize {
    Structural::new(text).filter(|loc| loc.ch == '|').count()
}

/// Deepest bracket nesting reached while scanning left to right.
///
/// Any opener increments the running depth and any closer decrements it,
/// clamped at zero; bracket kinds are not matched against each other.
#[must_use]
pub fn max_nesting_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    for Located { ch, .. } in Structural::new(text) {
        if is_opener(ch) {
            depth += 1;
            max = max.max(depth);
        } else if is_closer(ch) {
            depth = depth.saturating_sub(1);
        }
    }
    max
}

/// Contents of every innermost `open ... close` group.
///
/// A group is innermost when it holds no further bracket of the same kind;
/// other bracket kinds may appear inside. Groups are returned in source
/// order and never overlap.
#[must_use]
pub fn innermost_groups(text: &str, open: char, close: char) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut start = None;
    for Located { byte, ch, .. } in Structural::new(text) {
        if ch == open {
            start = Some(byte + ch.len_utf8());
        } else if ch == close {
            if let Some(from) = start.take() {
                groups.push(&text[from..byte]);
            }
        }
    }
    groups
}

/// Contents of every parenthesised group that itself contains a group.
///
/// Each qualifying group is reported once, outer groups after the groups
/// nested in them. Unmatched closers are ignored.
#[must_use]
pub fn nesting_paren_groups(text: &str) -> Vec<&str> {
    // (content start, holds a child group)
    let mut stack: Vec<(usize, bool)> = Vec::new();
    let mut groups = Vec::new();
    for Located { byte, ch, .. } in Structural::new(text) {
        match ch {
            '(' => stack.push((byte + 1, false)),
            ')' => {
                let Some((from, has_child)) = stack.pop() else {
                    continue;
                };
                if has_child {
                    groups.push(&text[from..byte]);
                }
                if let Some(parent) = stack.last_mut() {
                    parent.1 = true;
                }
            }
            _ => {}
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_skips_literals() {
        let chars: String = Structural::new(r#"a "(|)" b"#).map(|l| l.ch).collect();
        assert_eq!(chars, "a  b");
    }

    #[test]
    fn test_stray_quote_closes_nothing() {
        let chars: String = Structural::new("a \"( ;\nb )").map(|l| l.ch).collect();
        assert_eq!(chars, "a \"( ;\nb )");
        assert_eq!(stray_quotes("a \"( ;\nb = \"x\""), vec![2]);
        assert_eq!(max_nesting_depth("a = \" ( ( x ) )"), 2);
    }

    #[test]
    fn test_literals_do_not_span_lines() {
        let chars: String = Structural::new("\"a\n\"b\"").map(|l| l.ch).collect();
        assert_eq!(chars, "\"a\n");
    }

    #[test]
    fn test_structural_reports_char_positions() {
        let located: Vec<_> = Structural::new("é(").collect();
        assert_eq!(located[1].pos, 1);
        assert_eq!(located[1].byte, 2);
    }

    #[test]
    fn test_leading_identifier() {
        assert_eq!(leading_identifier("expr_1 = x"), Some("expr_1"));
        assert_eq!(leading_identifier("1expr"), None);
        assert_eq!(leading_identifier(""), None);
    }

    #[test]
    fn test_quoted_literals_include_empty_and_ignore_unpaired() {
        let literals = quoted_literals(r#"a = "x" | "" | "y ; b = "z"#);
        let expected: BTreeSet<String> =
            ["x", "", "y ; b = "].iter().map(ToString::to_string).collect();
        assert_eq!(literals, expected);

        let across_lines = quoted_literals("a = \"x\nb = \"y\" ;");
        assert_eq!(across_lines.into_iter().collect::<Vec<_>>(), vec!["y"]);
    }

    #[test]
    fn test_referenced_identifiers_skip_definitions_and_literals() {
        let refs = referenced_identifiers("expr = term \"op\" expr;\nterm = digit9 | _x;");
        let names: Vec<_> = refs.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["digit9", "expr", "term", "x"]);
    }

    #[test]
    fn test_referenced_identifiers_need_equals_on_line() {
        assert!(referenced_identifiers("just words here").is_empty());
    }

    #[test]
    fn test_split_alternatives_respects_literals() {
        assert_eq!(
            split_alternatives(r#" "|" a | b "#),
            vec![r#" "|" a "#, " b "]
        );
    }

    #[test]
    fn test_max_nesting_depth_clamps_at_zero() {
        assert_eq!(max_nesting_depth(")))(["), 2);
        assert_eq!(max_nesting_depth("( [ { } ] )"), 3);
        assert_eq!(max_nesting_depth(r#""(((""#), 0);
    }

    #[test]
    fn test_innermost_groups() {
        assert_eq!(innermost_groups("[a[b]c] [d]", '[', ']'), vec!["b", "d"]);
        assert_eq!(innermost_groups("{ (x) }", '{', '}'), vec![" (x) "]);
    }

    #[test]
    fn test_nesting_paren_groups() {
        assert_eq!(nesting_paren_groups("(a (b) c) (d)"), vec!["a (b) c"]);
        assert_eq!(nesting_paren_groups("((()))"), vec!["()", "(())"]);
    }
}
