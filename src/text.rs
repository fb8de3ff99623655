//! Letter-level string helpers.
//!
//! A "letter" is an extended grapheme cluster, so combining marks stay
//! attached to their base character whenever words are compared, cut,
//! or reversed.

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Number of letters in `s`.
pub fn letter_count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Letters of `s`, in order.
pub fn letters(s: &str) -> Vec<&str> {
    s.graphemes(true).collect()
}

/// Longest common prefix of `a` and `b`, cut on a letter boundary.
pub fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len: usize = a
        .graphemes(true)
        .zip(b.graphemes(true))
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len())
        .sum();
    &a[..len]
}

/// `s` with its letters in reverse order.
pub fn reverse_letters(s: &str) -> String {
    s.graphemes(true).rev().collect()
}

/// Remainder of `word` after `prefix`, if `prefix` ends on a letter boundary of `word`.
pub fn strip_letter_prefix<'a>(word: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = word.strip_prefix(prefix)?;
    let mut offset = 0;
    for grapheme in word.graphemes(true) {
        if offset >= prefix.len() {
            break;
        }
        offset += grapheme.len();
    }
    (offset == prefix.len()).then_some(rest)
}

/// First `n` letters of `s`, or `None` if `s` is shorter.
pub fn leading_letters(s: &str, n: usize) -> Option<&str> {
    if n == 0 {
        return Some("");
    }
    let (idx, grapheme) = s.grapheme_indices(true).nth(n - 1)?;
    Some(&s[..idx + grapheme.len()])
}

/// Last `n` letters of `s`, or `None` if `s` is shorter.
pub fn trailing_letters(s: &str, n: usize) -> Option<&str> {
    if n == 0 {
        return Some("");
    }
    let (idx, _) = s.grapheme_indices(true).rev().nth(n - 1)?;
    Some(&s[idx..])
}

/// Non-overlapping matches of `pattern` in `text`, in order.
pub fn tokenize<'a>(text: &'a str, pattern: &'a Regex) -> impl Iterator<Item = &'a str> + 'a {
    pattern.find_iter(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_prefix() {
        assert_eq!(common_prefix("wanted", "wanting"), "want");
        assert_eq!(common_prefix("adds", "wanted"), "");
        assert_eq!(common_prefix("add", "added"), "add");
    }

    #[test]
    fn test_common_prefix_keeps_combining_marks() {
        // "e" + combining acute vs plain "e": no shared letter
        assert_eq!(common_prefix("cafe\u{301}s", "cafes"), "caf");
    }

    #[test]
    fn test_reverse_letters() {
        assert_eq!(reverse_letters("redo"), "oder");
        assert_eq!(reverse_letters("e\u{301}a"), "ae\u{301}");
    }

    #[test]
    fn test_strip_letter_prefix() {
        assert_eq!(strip_letter_prefix("wanted", "want"), Some("ed"));
        assert_eq!(strip_letter_prefix("want", "want"), Some(""));
        assert_eq!(strip_letter_prefix("wanted", "add"), None);
        assert_eq!(strip_letter_prefix("cafe\u{301}", "cafe"), None);
    }

    #[test]
    fn test_edges() {
        assert_eq!(trailing_letters("want", 1), Some("t"));
        assert_eq!(trailing_letters("want", 2), Some("nt"));
        assert_eq!(trailing_letters("a", 2), None);
        assert_eq!(leading_letters("want", 2), Some("wa"));
        assert_eq!(leading_letters("want", 5), None);
        assert_eq!(leading_letters("want", 0), Some(""));
    }

    #[test]
    fn test_tokenize() {
        let words = Regex::new(r"\w+").unwrap();
        let tokens: Vec<&str> = tokenize("Test data, test!", &words).collect();
        assert_eq!(tokens, vec!["Test", "data", "test"]);

        let spaced = Regex::new(r"\S+").unwrap();
        let tokens: Vec<&str> = tokenize("don't stop.", &spaced).collect();
        assert_eq!(tokens, vec!["don't", "stop."]);
    }

    #[test]
    fn test_tokenize_unicode_words() {
        let words = Regex::new(r"\w+").unwrap();
        let tokens: Vec<&str> = tokenize("café, naïve", &words).collect();
        assert_eq!(tokens, vec!["café", "naïve"]);
    }
}
