//! Canonical text form for grammar input.
//!
//! Normalization removes `//` and `/* */` comments, collapses every
//! whitespace run to one space, writes each `=` as `" = "` and ends each `;`
//! with a newline. The result holds one rule per line, which is the shape
//! the extractor and the syntax checker scan.
//!
//! Quoted literals pass through untouched apart from whitespace collapsing:
//! a `;` or `//` inside `"..."` is part of a terminal, not grammar structure.
//! Literals end at their line, as in [`scan`](crate::grammar::scan).

use crate::grammar::scan::closes_on_line;

/// Normalizes raw grammar text. Empty input yields an empty string.
#[must_use]
pub fn normalize(raw: &str) -> String {
    canonicalize(&strip_comments(raw))
}

/// Removes comment spans outside quoted literals.
///
/// A line comment runs up to, but not including, its newline. An
/// unterminated block comment is kept verbatim so that its markers surface
/// in the character-set check.
#[must_use]
pub fn strip_comments(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    let mut in_literal = false;
    // Once a block comment has no terminator, no later one can have one.
    let mut closer_ahead = true;

    while let Some(ch) = rest.chars().next() {
        if !in_literal {
            if rest.starts_with("//") {
                rest = rest.find('\n').map_or("", |end| &rest[end..]);
                continue;
            }
            if let Some(body) = rest.strip_prefix("/*").filter(|_| closer_ahead) {
                if let Some(end) = body.find("*/") {
                    rest = &body[end + 2..];
                    continue;
                }
                closer_ahead = false;
            }
        }
        if ch == '"' {
            in_literal = !in_literal && closes_on_line(&rest[1..]);
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

/// Collapses whitespace and canonicalizes `=` and `;` outside literals.
///
/// A line holding a stray quote keeps its line break, so the quote stays the
/// last one on its normalized line and pairs with nothing there either.
fn canonicalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    // Whitespace directly after an emitted separator is swallowed.
    let mut after_separator = false;
    let mut in_literal = false;
    let mut stray_on_line = false;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if ch == '\n' && std::mem::take(&mut stray_on_line) {
                end_line(&mut out);
                pending_space = false;
                after_separator = true;
            } else {
                pending_space = true;
            }
            continue;
        }

        if !in_literal && ch == '=' {
            if !(out.is_empty() || out.ends_with('\n')) {
                out.push(' ');
            }
            out.push_str("= ");
            pending_space = false;
            after_separator = true;
            continue;
        }

        if !in_literal && ch == ';' {
            while out.ends_with(' ') {
                out.pop();
            }
            out.push(';');
            end_line(&mut out);
            stray_on_line = false;
            pending_space = false;
            after_separator = true;
            continue;
        }

        if pending_space && !after_separator && !out.is_empty() {
            out.push(' ');
        }
        out.push(ch);
        if ch == '"' {
            if in_literal {
                in_literal = false;
            } else if closes_on_line(&text[idx + 1..]) {
                in_literal = true;
            } else {
                stray_on_line = true;
            }
        }
        pending_space = false;
        after_separator = false;
    }

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out
}

/// Drops trailing spaces and terminates the current output line once.
fn end_line(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
    if !(out.is_empty() || out.ends_with('\n')) {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  \n\t "), "");
    }

    #[test]
    fn test_one_rule_per_line() {
        assert_eq!(
            normalize("a=\"x\"  ;b   =\n a\t|\"y\";"),
            "a = \"x\";\nb = a |\"y\";"
        );
    }

    #[test]
    fn test_comments_removed() {
        let raw = "// header\na = \"x\" ; /* block\n spanning */ b = a ; // trailing";
        assert_eq!(normalize(raw), "a = \"x\";\nb = a;");
    }

    #[test]
    fn test_literals_are_preserved() {
        assert_eq!(
            normalize(r#"sep = ";" | "=" | "//" ;"#),
            r#"sep = ";" | "=" | "//";"#
        );
    }

    #[test]
    fn test_unterminated_block_comment_is_kept() {
        assert_eq!(strip_comments("a = b /* open"), "a = b /* open");
    }

    #[test]
    fn test_stray_quote_does_not_swallow_later_rules() {
        assert_eq!(normalize("a = \"x ;\nb = ( c ;"), "a = \"x;\nb = ( c;");
        assert_eq!(normalize("a = \"x\nb = \"y\" ;"), "a = \"x\nb = \"y\";");
        assert_eq!(strip_comments("a = \"x\nb // note"), "a = \"x\nb ");
    }

    #[test]
    fn test_empty_body_rule() {
        assert_eq!(normalize("a = ;"), "a =;");
    }
}
