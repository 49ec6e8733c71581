//! Matcher stage: turns each rule's [`MatchSpec`] into a predicate and
//! finds the first rule whose predicate accepts the value text.

use regex::{Regex, RegexBuilder};

use crate::schema::MatchSpec;

use super::coerce::{format_js_number, parse_js_number};
use super::StageError;

/// A compiled, ready-to-test form of a [`MatchSpec`].
#[derive(Debug, Clone)]
pub(crate) enum Predicate {
    /// Literals and patterns.
    Regex(Regex),
    /// `text` is the decimal form of `value`, compared verbatim first.
    Numeric { text: String, value: f64 },
}

impl Predicate {
    pub(crate) fn compile(spec: &MatchSpec) -> Result<Self, StageError> {
        match spec {
            MatchSpec::Literal(text) => literal_regex(text).map(Predicate::Regex),
            MatchSpec::Numeric(value) => Ok(Predicate::Numeric {
                text: format_js_number(*value),
                value: *value,
            }),
            MatchSpec::Pattern { regex, flags } => build_regex(regex, flags).map(Predicate::Regex),
        }
    }

    pub(crate) fn matches(&self, text: &str) -> bool {
        match self {
            Predicate::Regex(re) => re.is_match(text),
            // Numeric equality is a second chance within the same rule
            Predicate::Numeric { text: literal, value } => {
                text == literal || parse_js_number(text) == Some(*value)
            }
        }
    }
}

/// Whole-string, case-insensitive match of the escaped literal.
fn literal_regex(text: &str) -> Result<Regex, StageError> {
    RegexBuilder::new(&format!("^{}$", regex::escape(text)))
        .case_insensitive(true)
        .build()
        .map_err(|e| StageError::Pattern {
            pattern: text.to_string(),
            flags: "i".to_string(),
            message: e.to_string(),
        })
}

/// Build a regex from a pattern and JavaScript-style flags.
///
/// `i`, `m` and `s` map onto the builder; `y` anchors at the start of the
/// text; `g`, `d`, `u` and `v` do not change a single test. Unknown or
/// repeated flags are rejected, as JavaScript's `RegExp` constructor does.
///
/// `\d`, `\w` and `\b` are ASCII-only as in JavaScript. Lookaround and
/// backreferences are not supported and make the pattern invalid.
pub(crate) fn build_regex(pattern: &str, flags: &str) -> Result<Regex, StageError> {
    let invalid = |message: String| StageError::Pattern {
        pattern: pattern.to_string(),
        flags: flags.to_string(),
        message,
    };

    let mut seen = String::new();
    for flag in flags.chars() {
        if !"dgimsuvy".contains(flag) {
            return Err(invalid(format!("unknown flag '{flag}'")));
        }
        if seen.contains(flag) {
            return Err(invalid(format!("duplicate flag '{flag}'")));
        }
        seen.push(flag);
    }

    let translated = ascii_escapes(pattern);
    let source = if seen.contains('y') {
        format!(r"\A(?:{translated})")
    } else {
        translated
    };

    RegexBuilder::new(&source)
        .case_insensitive(seen.contains('i'))
        .multi_line(seen.contains('m'))
        .dot_matches_new_line(seen.contains('s'))
        .build()
        .map_err(|e| invalid(e.to_string()))
}

/// Rewrite JavaScript's ASCII-only escapes into explicit classes, which the
/// `regex` crate would otherwise read as Unicode classes.
fn ascii_escapes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    let mut in_class = false;

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('d') if in_class => out.push_str("0-9"),
                Some('d') => out.push_str("[0-9]"),
                Some('D') => out.push_str("[^0-9]"),
                Some('w') if in_class => out.push_str("0-9A-Za-z_"),
                Some('w') => out.push_str("[0-9A-Za-z_]"),
                Some('W') => out.push_str("[^0-9A-Za-z_]"),
                // backspace inside a class
                Some('b') if in_class => out.push_str(r"\x08"),
                Some('b') => out.push_str(r"(?-u:\b)"),
                Some('B') => out.push_str(r"(?-u:\B)"),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            // a bare `[` inside a class is literal in JavaScript
            '[' if in_class => out.push_str(r"\["),
            '[' => {
                in_class = true;
                out.push(ch);
            }
            ']' if in_class => {
                in_class = false;
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(spec: MatchSpec) -> Predicate {
        Predicate::compile(&spec).unwrap()
    }

    #[test]
    fn literal_is_whole_string_and_case_insensitive() {
        let p = compile(MatchSpec::literal("on"));
        assert!(p.matches("on"));
        assert!(p.matches("ON"));
        assert!(p.matches("On"));
        assert!(!p.matches("online"));
        assert!(!p.matches("turn on"));
    }

    #[test]
    fn literal_metacharacters_are_escaped() {
        let p = compile(MatchSpec::literal("1.5 (max)"));
        assert!(p.matches("1.5 (MAX)"));
        assert!(!p.matches("1x5 (max)"));
    }

    #[test]
    fn pattern_is_unanchored_unless_written_so() {
        let p = compile(MatchSpec::pattern("^a.*", ""));
        assert!(p.matches("abc"));
        assert!(!p.matches("cab"));

        let p = compile(MatchSpec::pattern("err", ""));
        assert!(p.matches("fatal error"));
        assert!(!p.matches("ERROR"));
    }

    #[test]
    fn pattern_flags() {
        assert!(compile(MatchSpec::pattern("^error$", "i")).matches("ERROR"));
        assert!(compile(MatchSpec::pattern("^b$", "m")).matches("a\nb"));
        assert!(!compile(MatchSpec::pattern("^b$", "")).matches("a\nb"));
        assert!(compile(MatchSpec::pattern("a.b", "s")).matches("a\nb"));
        assert!(!compile(MatchSpec::pattern("a.b", "")).matches("a\nb"));
        assert!(compile(MatchSpec::pattern("on", "gu")).matches("turn on"));
    }

    #[test]
    fn sticky_flag_anchors_at_start() {
        let p = compile(MatchSpec::pattern("on", "y"));
        assert!(p.matches("online"));
        assert!(!p.matches("turn on"));
    }

    #[test]
    fn bad_flags_are_rejected() {
        assert!(Predicate::compile(&MatchSpec::pattern("on", "x")).is_err());
        assert!(Predicate::compile(&MatchSpec::pattern("on", "ii")).is_err());
        // "/on/off" loads as pattern "on" with flags "off"
        assert!(Predicate::compile(&MatchSpec::from_text("/on/off")).is_err());
    }

    #[test]
    fn shorthand_classes_are_ascii() {
        let digits = compile(MatchSpec::pattern(r"^\d+$", ""));
        assert!(digits.matches("42"));
        assert!(!digits.matches("\u{0663}"));

        let word = compile(MatchSpec::pattern(r"^\w+$", ""));
        assert!(word.matches("abc_1"));
        assert!(!word.matches("café"));

        let non_word = compile(MatchSpec::pattern(r"^\W$", ""));
        assert!(non_word.matches("é"));

        // `é` is not a word character, so there is a boundary before `x`
        assert!(compile(MatchSpec::pattern(r"\bx", "")).matches("éx"));
        assert!(compile(MatchSpec::pattern(r"^[\d.]+$", "")).matches("1.5"));
        assert!(compile(MatchSpec::pattern(r"^[[]$", "")).matches("["));
    }

    #[test]
    fn lookaround_and_backreferences_are_invalid() {
        for pattern in ["on(?=line)", "(?<!x)on", r"(a)\1"] {
            let err = Predicate::compile(&MatchSpec::pattern(pattern, "")).unwrap_err();
            assert!(matches!(err, StageError::Pattern { .. }), "{pattern}");
        }
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        let err = Predicate::compile(&MatchSpec::pattern("(unterminated", "")).unwrap_err();
        assert!(matches!(err, StageError::Pattern { .. }));
    }

    #[test]
    fn numeric_matches_decimal_text_and_numeric_value() {
        let p = compile(MatchSpec::numeric(42.0));
        assert!(p.matches("42"));
        assert!(p.matches("42.0"));
        assert!(p.matches(" 42 "));
        assert!(p.matches("0x2A"));
        assert!(!p.matches("420"));
        assert!(!p.matches("4"));
        assert!(!p.matches(""));
    }

    #[test]
    fn zero_matches_blank_text() {
        let p = compile(MatchSpec::numeric(0.0));
        assert!(p.matches("0"));
        assert!(p.matches(""));
        assert!(p.matches("  "));
        assert!(!p.matches("off"));
    }

    #[test]
    fn numeric_does_not_treat_dot_as_wildcard() {
        let p = compile(MatchSpec::numeric(1.5));
        assert!(p.matches("1.5"));
        assert!(!p.matches("1x5"));
    }

    #[test]
    fn numeric_ignores_locale_formatting() {
        let p = compile(MatchSpec::numeric(1000.0));
        assert!(p.matches("1000"));
        assert!(p.matches("1e3"));
        assert!(!p.matches("1,000"));
        assert!(!p.matches("1 000"));
    }
}
