//! Detection of recurring structural motifs.
//!
//! Six structural patterns are always candidates; [`AnalysisDepth::Basic`]
//! keeps only those weighing at least [`BASIC_MIN_POTENTIAL`]. Deeper
//! analyses add three more that need a wider look at the grammar: repeated
//! sub-expressions, deep nesting and ambiguous alternatives.

use crate::analyze::AnalysisDepth;
use crate::config::Config;
use crate::grammar::{scan, Grammar};
use facet::Facet;
use std::collections::HashMap;

/// At most this many examples are kept per pattern.
pub const MAX_EXAMPLES: usize = 5;

/// Patterns lighter than this are suppressed at basic depth.
pub const BASIC_MIN_POTENTIAL: f64 = 0.5;

/// The kinds of pattern the detector knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum PatternKind {
    /// A rule with an alternative starting with the rule itself.
    #[facet(rename = "left_recursion")]
    LeftRecursion,
    /// A rule whose body ends in a bare identifier.
    #[facet(rename = "right_recursion")]
    RightRecursion,
    /// `[ ... ]` groups.
    #[facet(rename = "optional_group")]
    OptionalGroup,
    /// `{ ... }` groups.
    #[facet(rename = "repetition_group")]
    RepetitionGroup,
    /// `|` choices.
    #[facet(rename = "alternation")]
    Alternation,
    /// Parenthesised groups containing further parenthesised groups.
    #[facet(rename = "nested_group")]
    NestedGroup,
    /// Bracketed contents that occur more than once.
    #[facet(rename = "common_subexpression")]
    CommonSubexpression,
    /// Bracket nesting beyond the configured threshold.
    #[facet(rename = "deep_nesting")]
    DeepNesting,
    /// Alternatives sharing a long word prefix.
    #[facet(rename = "potential_ambiguity")]
    PotentialAmbiguity,
}

impl PatternKind {
    /// Every kind, in reporting order.
    pub const ALL: [PatternKind; 9] = [
        PatternKind::LeftRecursion,
        PatternKind::RightRecursion,
        PatternKind::OptionalGroup,
        PatternKind::RepetitionGroup,
        PatternKind::Alternation,
        PatternKind::NestedGroup,
        PatternKind::CommonSubexpression,
        PatternKind::DeepNesting,
        PatternKind::PotentialAmbiguity,
    ];

    /// How much fixing this pattern tends to help, in `[0, 1]`.
    #[must_use]
    pub fn optimization_potential(self) -> f64 {
        match self {
            PatternKind::LeftRecursion => 0.8,
            PatternKind::RightRecursion | PatternKind::Alternation => 0.3,
            PatternKind::OptionalGroup => 0.2,
            PatternKind::RepetitionGroup => 0.4,
            PatternKind::NestedGroup | PatternKind::DeepNesting => 0.6,
            PatternKind::CommonSubexpression => 0.7,
            PatternKind::PotentialAmbiguity => 0.9,
        }
    }

    /// Whether the kind is only looked for beyond basic depth.
    #[must_use]
    pub fn is_advanced(self) -> bool {
        matches!(
            self,
            PatternKind::CommonSubexpression
                | PatternKind::DeepNesting
                | PatternKind::PotentialAmbiguity
        )
    }

    /// Fixed description; deep nesting adds its depth separately.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            PatternKind::LeftRecursion => "left recursive rule",
            PatternKind::RightRecursion => "right recursive rule",
            PatternKind::OptionalGroup => "optional elements",
            PatternKind::RepetitionGroup => "repetition elements",
            PatternKind::Alternation => "choice alternatives",
            PatternKind::NestedGroup => "nested grouping",
            PatternKind::CommonSubexpression => "repeated sub-expressions that could be factored",
            PatternKind::DeepNesting => "deep nesting detected",
            PatternKind::PotentialAmbiguity => "rules that may cause parsing ambiguities",
        }
    }
}

/// One detected motif with its count and a few examples.
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct Pattern {
    /// What was detected.
    pub kind: PatternKind,
    /// Human-readable description.
    pub description: String,
    /// Number of matches.
    pub occurrences: usize,
    /// Up to [`MAX_EXAMPLES`] matched snippets.
    pub examples: Vec<String>,
    /// The kind's optimization potential.
    pub optimization_potential: f64,
}

impl Pattern {
    /// Builds a pattern, keeping the first [`MAX_EXAMPLES`] examples.
    #[must_use]
    pub fn new<I, S>(kind: PatternKind, occurrences: usize, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            description: kind.description().to_string(),
            occurrences,
            examples: examples.into_iter().take(MAX_EXAMPLES).map(Into::into).collect(),
            optimization_potential: kind.optimization_potential(),
        }
    }

    /// Builds a pattern whose occurrence count is its example count.
    fn from_matches<S: Into<String>>(kind: PatternKind, matches: Vec<S>) -> Option<Self> {
        if matches.is_empty() {
            None
        } else {
            Some(Self::new(kind, matches.len(), matches))
        }
    }
}

/// Detects every pattern the depth asks for, in [`PatternKind::ALL`] order.
#[must_use]
pub fn detect(grammar: &Grammar, depth: AnalysisDepth, config: &Config) -> Vec<Pattern> {
    PatternKind::ALL
        .into_iter()
        .filter(|&kind| depth.includes(kind))
        .filter_map(|kind| match kind {
            PatternKind::LeftRecursion => {
                Pattern::from_matches(kind, grammar.left_recursive_rules())
            }
            PatternKind::RightRecursion => right_recursion(grammar),
            PatternKind::OptionalGroup => {
                Pattern::from_matches(kind, scan::innermost_groups(&grammar.text, '[', ']'))
            }
            PatternKind::RepetitionGroup => {
                Pattern::from_matches(kind, scan::innermost_groups(&grammar.text, '{', '}'))
            }
            PatternKind::Alternation => alternation(grammar),
            PatternKind::NestedGroup => {
                Pattern::from_matches(kind, scan::nesting_paren_groups(&grammar.text))
            }
            PatternKind::CommonSubexpression => common_subexpressions(grammar, config),
            PatternKind::DeepNesting => deep_nesting(grammar, config),
            PatternKind::PotentialAmbiguity => ambiguities(grammar, config),
        })
        .collect()
}

fn right_recursion(grammar: &Grammar) -> Option<Pattern> {
    let matches: Vec<String> = grammar
        .rules
        .iter()
        .filter_map(|rule| {
            rule.trailing_identifier()
                .map(|ident| format!("{} ends with {ident}", rule.name))
        })
        .collect();
    Pattern::from_matches(PatternKind::RightRecursion, matches)
}

fn alternation(grammar: &Grammar) -> Option<Pattern> {
    let count = scan::count_alternations(&grammar.text);
    if count == 0 {
        return None;
    }
    let choosing = grammar
        .rules
        .iter()
        .filter(|rule| rule.branching_factor() > 1)
        .map(|rule| rule.name.as_str());
    Some(Pattern::new(PatternKind::Alternation, count, choosing))
}

/// Innermost bracketed contents seen more than once, in first-seen order.
fn common_subexpressions(grammar: &Grammar, config: &Config) -> Option<Pattern> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for (open, close) in [('(', ')'), ('[', ']'), ('{', '}')] {
        for content in scan::innermost_groups(&grammar.text, open, close) {
            if content.chars().count() <= config.min_subexpression_len {
                continue;
            }
            let count = counts.entry(content).or_insert(0);
            if *count == 0 {
                order.push(content);
            }
            *count += 1;
        }
    }

    let repeated: Vec<&str> = order
        .into_iter()
        .filter(|content| counts.get(content).is_some_and(|&n| n > 1))
        .collect();
    Pattern::from_matches(PatternKind::CommonSubexpression, repeated)
}

fn deep_nesting(grammar: &Grammar, config: &Config) -> Option<Pattern> {
    let depth = grammar.max_nesting_depth();
    if depth <= config.deep_nesting_threshold {
        return None;
    }
    let mut pattern = Pattern::new(
        PatternKind::DeepNesting,
        1,
        [format!("maximum nesting depth: {depth}")],
    );
    pattern.description = format!("{} (depth: {depth})", pattern.description);
    Some(pattern)
}

/// Pairs of alternatives within one rule that share a whole-word prefix of
/// at least `ambiguity_prefix_len` characters.
///
/// Two alternatives qualify exactly when their shortest qualifying word
/// prefixes are equal, so alternatives are grouped by that prefix and each
/// group of `n` contributes `n * (n - 1) / 2` pairs without comparing them.
fn ambiguities(grammar: &Grammar, config: &Config) -> Option<Pattern> {
    let mut occurrences = 0usize;
    let mut examples = Vec::new();

    for rule in &grammar.rules {
        let alternatives = rule.alternatives();
        let keys: Vec<Option<Vec<&str>>> = alternatives
            .iter()
            .map(|alt| prefix_key(alt, config.ambiguity_prefix_len))
            .collect();

        let mut groups: HashMap<&[&str], Vec<usize>> = HashMap::new();
        for (idx, key) in keys.iter().enumerate() {
            if let Some(key) = key {
                groups.entry(key.as_slice()).or_default().push(idx);
            }
        }
        for members in groups.values() {
            let n = members.len();
            occurrences = occurrences.saturating_add(n.saturating_mul(n - 1) / 2);
        }

        for (first, key) in keys.iter().enumerate() {
            if examples.len() == MAX_EXAMPLES {
                break;
            }
            let Some(members) = key.as_deref().and_then(|key| groups.get(key)) else {
                continue;
            };
            let later = &members[members.partition_point(|&idx| idx <= first)..];
            for &second in later.iter().take(MAX_EXAMPLES - examples.len()) {
                examples.push(format!(
                    "{}: '{}' vs '{}'",
                    rule.name, alternatives[first], alternatives[second]
                ));
            }
        }
    }

    (occurrences > 0)
        .then(|| Pattern::new(PatternKind::PotentialAmbiguity, occurrences, examples))
}

/// The shortest run of leading words whose lengths reach `min_len`.
fn prefix_key(alternative: &str, min_len: usize) -> Option<Vec<&str>> {
    let mut key = Vec::new();
    let mut len = 0;
    for word in alternative.split_whitespace() {
        if len >= min_len {
            break;
        }
        len += word.chars().count();
        key.push(word);
    }
    (len >= min_len).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(patterns: &[Pattern]) -> Vec<PatternKind> {
        patterns.iter().map(|p| p.kind).collect()
    }

    fn find(patterns: &[Pattern], kind: PatternKind) -> &Pattern {
        patterns
            .iter()
            .find(|p| p.kind == kind)
            .unwrap_or_else(|| panic!("no {kind:?} pattern in {patterns:?}"))
    }

    #[test]
    fn test_structural_patterns() {
        let grammar = Grammar::parse(
            r#"expr = expr "+" term | term ;
               term = [ "-" ] factor { "*" factor } ;
               factor = ( "(" ( expr ) ")" ) | digit ;
               digit = "0" | "1" ;"#,
        );
        let patterns = detect(&grammar, AnalysisDepth::Detailed, &Config::default());

        let left = find(&patterns, PatternKind::LeftRecursion);
        assert_eq!(left.occurrences, 1);
        assert_eq!(left.examples, vec!["expr"]);

        let right = find(&patterns, PatternKind::RightRecursion);
        assert_eq!(
            right.examples,
            vec!["expr ends with term", "factor ends with digit"]
        );

        assert_eq!(find(&patterns, PatternKind::OptionalGroup).examples, vec![r#" "-" "#]);
        assert_eq!(find(&patterns, PatternKind::RepetitionGroup).occurrences, 1);
        let alternation = find(&patterns, PatternKind::Alternation);
        assert_eq!(alternation.occurrences, 3);
        assert_eq!(alternation.examples, vec!["expr", "factor", "digit"]);
        assert_eq!(find(&patterns, PatternKind::NestedGroup).occurrences, 1);
    }

    #[test]
    fn test_basic_depth_suppresses_light_patterns() {
        let grammar = Grammar::parse(r#"a = a "x" | [ "y" ] { b } ( ( b ) ) ; b = "z" ;"#);
        let patterns = detect(&grammar, AnalysisDepth::Basic, &Config::default());
        assert_eq!(
            kinds(&patterns),
            vec![PatternKind::LeftRecursion, PatternKind::NestedGroup]
        );
    }

    #[test]
    fn test_common_subexpressions() {
        let grammar = Grammar::parse(concat!(
            r#"a = ( "x" | "y" ) "1" ; b = ( "x" | "y" ) "2" ; "#,
            r#"c = [ "x" | "y" ] ; d = ( "zz" ) ( "zz" ) ( "z" ) ;"#,
        ));
        let patterns = detect(&grammar, AnalysisDepth::Comprehensive, &Config::default());
        let common = find(&patterns, PatternKind::CommonSubexpression);
        assert_eq!(common.occurrences, 2);
        assert_eq!(common.examples, vec![r#" "x" | "y" "#, r#" "zz" "#]);
    }

    #[test]
    fn test_deep_nesting_reported_once() {
        let grammar = Grammar::parse(r#"a = ( ( ( ( ( ( "x" ) ) ) ) ) ) ;"#);
        let patterns = detect(&grammar, AnalysisDepth::Comprehensive, &Config::default());
        let deep: Vec<_> = patterns
            .iter()
            .filter(|p| p.kind == PatternKind::DeepNesting)
            .collect();
        assert_eq!(deep.len(), 1);
        assert_eq!(deep[0].occurrences, 1);
        assert_eq!(deep[0].description, "deep nesting detected (depth: 6)");
        assert_eq!(deep[0].examples, vec!["maximum nesting depth: 6"]);

        let shallow = Grammar::parse(r#"a = ( ( ( ( ( "x" ) ) ) ) ) ;"#);
        let patterns = detect(&shallow, AnalysisDepth::Comprehensive, &Config::default());
        assert!(!kinds(&patterns).contains(&PatternKind::DeepNesting));
    }

    #[test]
    fn test_ambiguity_needs_whole_word_prefix() {
        let grammar = Grammar::parse(
            r#"stmt = "if" cond "then" block | "if" cond "goto" label | "i" x ;"#,
        );
        let patterns = detect(&grammar, AnalysisDepth::Comprehensive, &Config::default());
        let ambiguous = find(&patterns, PatternKind::PotentialAmbiguity);
        assert_eq!(ambiguous.occurrences, 1);
        assert_eq!(
            ambiguous.examples,
            vec![r#"stmt: '"if" cond "then" block' vs '"if" cond "goto" label'"#]
        );
        assert!((ambiguous.optimization_potential - 0.9).abs() < f64::EPSILON);
    }

    /// Total length of the leading words two alternatives share.
    fn shared_prefix_len(a: &str, b: &str) -> usize {
        a.split_whitespace()
            .zip(b.split_whitespace())
            .take_while(|(x, y)| x == y)
            .map(|(x, _)| x.chars().count())
            .sum()
    }

    #[test]
    fn test_ambiguity_count_matches_pairwise_comparison() {
        let text = r#"r = a b c | a b d | a x | ab c | ab c | abc | "if" x | "if" y | ;"#;
        let grammar = Grammar::parse(text);
        for prefix_len in 0..6 {
            let config = Config {
                ambiguity_prefix_len: prefix_len,
                ..Config::default()
            };
            let alternatives = grammar.rules[0].alternatives();
            let mut expected = 0;
            for (i, a) in alternatives.iter().enumerate() {
                for b in &alternatives[i + 1..] {
                    if shared_prefix_len(a, b) >= prefix_len {
                        expected += 1;
                    }
                }
            }
            let found = ambiguities(&grammar, &config).map_or(0, |p| p.occurrences);
            assert_eq!(found, expected, "prefix length {prefix_len}");
        }
    }

    #[test]
    fn test_ambiguity_scales_with_identical_alternatives() {
        let n = 20_000;
        let text = format!("r = {} ;", vec![r#""abc" x"#; n].join(" | "));
        let grammar = Grammar::parse(&text);
        let pattern = ambiguities(&grammar, &Config::default()).unwrap();
        assert_eq!(pattern.occurrences, n * (n - 1) / 2);
        assert_eq!(pattern.examples.len(), MAX_EXAMPLES);
        assert_eq!(pattern.examples[0], r#"r: '"abc" x' vs '"abc" x'"#);
    }

    #[test]
    fn test_prefix_key() {
        assert_eq!(prefix_key("a b c", 2), Some(vec!["a", "b"]));
        assert_eq!(prefix_key("abc d", 3), Some(vec!["abc"]));
        assert_eq!(prefix_key("a", 3), None);
        assert_eq!(prefix_key("", 0), Some(vec![]));
    }

    #[test]
    fn test_examples_are_capped() {
        let text: String = (0..8).map(|i| format!("r{i} = r{i} \"x\" ; ")).collect();
        let patterns = detect(&Grammar::parse(&text), AnalysisDepth::Basic, &Config::default());
        let left = find(&patterns, PatternKind::LeftRecursion);
        assert_eq!(left.occurrences, 8);
        assert_eq!(left.examples.len(), MAX_EXAMPLES);
    }
}
