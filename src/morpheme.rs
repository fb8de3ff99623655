//! Morphemes: regular strings, the NULL affix, and disambiguation-indexed affixes.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

use ahash::AHashMap;
use serde::{Serialize, Serializer};

use crate::text;

/// Display token of the NULL affix.
pub const NULL_DISPLAY: &str = "NULL";

/// Separator between affixes in a signature's affix string.
pub const AFFIX_DELIMITER: &str = "=";

/// Separator between an affix and its disambiguation index.
pub const AFFIX_INDEX_DELIMITER: char = ':';

/// A stem or affix.
///
/// `Null` behaves as the empty string for concatenation and length but is
/// displayed as `NULL`. `Indexed` carries a disambiguation index so that an
/// affix created by affix splitting never merges with an existing affix of
/// the same spelling; it displays as `form:index` and concatenates as `form`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Morpheme {
    Null,
    Regular(String),
    Indexed { form: String, index: usize },
}

impl Morpheme {
    /// Build a morpheme from a surface string; the empty string is NULL.
    pub fn new(form: impl Into<String>) -> Self {
        let form = form.into();
        if form.is_empty() {
            Morpheme::Null
        } else {
            Morpheme::Regular(form)
        }
    }

    pub fn indexed(form: impl Into<String>, index: usize) -> Self {
        Morpheme::Indexed {
            form: form.into(),
            index,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Morpheme::Null)
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, Morpheme::Indexed { .. })
    }

    /// Letters contributed to a word (no index marker, empty for NULL).
    pub fn surface(&self) -> &str {
        match self {
            Morpheme::Null => "",
            Morpheme::Regular(form) | Morpheme::Indexed { form, .. } => form,
        }
    }

    /// Length in letters (extended grapheme clusters).
    pub fn len(&self) -> usize {
        text::letter_count(self.surface())
    }

    pub fn is_empty(&self) -> bool {
        self.surface().is_empty()
    }

    /// The same morpheme without its disambiguation index.
    pub fn stripped(&self) -> Morpheme {
        match self {
            Morpheme::Indexed { form, .. } => Morpheme::new(form.clone()),
            other => other.clone(),
        }
    }

    fn display_key(&self) -> Cow<'_, str> {
        match self {
            Morpheme::Null => Cow::Borrowed(NULL_DISPLAY),
            Morpheme::Regular(form) => Cow::Borrowed(form),
            Morpheme::Indexed { form, index } => {
                Cow::Owned(format!("{form}{AFFIX_INDEX_DELIMITER}{index}"))
            }
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Morpheme::Null => 0,
            Morpheme::Regular(_) => 1,
            Morpheme::Indexed { .. } => 2,
        }
    }
}

impl fmt::Display for Morpheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_key())
    }
}

// Morphemes sort by their displayed form, which keeps affix strings such as
// "NULL=ed=ing=s" canonical.
impl Ord for Morpheme {
    fn cmp(&self, other: &Self) -> Ordering {
        self.display_key()
            .cmp(&other.display_key())
            .then_with(|| self.rank().cmp(&other.rank()))
            .then_with(|| match (self, other) {
                (
                    Morpheme::Indexed { form: a, index: i },
                    Morpheme::Indexed { form: b, index: j },
                ) => a.cmp(b).then(i.cmp(j)),
                _ => Ordering::Equal,
            })
    }
}

impl PartialOrd for Morpheme {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for Morpheme {
    fn from(form: &str) -> Self {
        Morpheme::new(form)
    }
}

impl From<String> for Morpheme {
    fn from(form: String) -> Self {
        Morpheme::new(form)
    }
}

impl From<&Morpheme> for Morpheme {
    fn from(morpheme: &Morpheme) -> Self {
        morpheme.clone()
    }
}

impl Add<&Morpheme> for String {
    type Output = String;

    fn add(mut self, rhs: &Morpheme) -> String {
        self.push_str(rhs.surface());
        self
    }
}

impl Serialize for Morpheme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-side collision counters for affix spellings.
#[derive(Debug, Clone, Default)]
pub struct AffixIndexer {
    counters: AHashMap<String, usize>,
}

impl AffixIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next index for `form`: `af:1`, then `af:2`, ...
    pub fn add_new_index(&mut self, form: &str) -> Morpheme {
        let counter = self.counters.entry(form.to_string()).or_insert(0);
        *counter += 1;
        Morpheme::indexed(form, *counter)
    }

    /// Number of indices handed out so far for `form`.
    pub fn count(&self, form: &str) -> usize {
        self.counters.get(form).copied().unwrap_or(0)
    }
}
