//! Word records and their per-pass biographies.

use std::collections::btree_map::Values;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::types::{Parse, Pass, Side};

/// A trace note one pass left on a word while analysing one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub side: Side,
    pub text: String,
}

/// What one learning pass concluded about a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BiographyEntry {
    pub pass: Pass,
    pub side: Side,
    pub parses: BTreeSet<Parse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Word {
    form: String,
    count: usize,
    biography: Vec<BiographyEntry>,
    /// Free-form trace notes, for human inspection only.
    scratchpad: Vec<Note>,
}

impl Word {
    pub fn new(form: impl Into<String>, count: usize) -> Self {
        Self {
            form: form.into(),
            count,
            biography: Vec::new(),
            scratchpad: Vec::new(),
        }
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn biography(&self) -> &[BiographyEntry] {
        &self.biography
    }

    pub fn biography_for(&self, side: Side) -> impl Iterator<Item = &BiographyEntry> {
        self.biography.iter().filter(move |entry| entry.side == side)
    }

    /// Parses from the latest pass on `side` that analysed this word.
    pub fn current_parses(&self, side: Side) -> Option<&BTreeSet<Parse>> {
        self.biography
            .iter()
            .rev()
            .find(|entry| entry.side == side)
            .map(|entry| &entry.parses)
    }

    pub fn scratchpad(&self) -> &[Note] {
        &self.scratchpad
    }

    pub fn notes_for(&self, side: Side) -> impl Iterator<Item = &str> {
        self.scratchpad
            .iter()
            .filter(move |note| note.side == side)
            .map(|note| note.text.as_str())
    }

    pub(crate) fn record(&mut self, entry: BiographyEntry) {
        self.biography.push(entry);
    }

    pub(crate) fn note(&mut self, side: Side, text: impl Into<String>) {
        self.scratchpad.push(Note {
            side,
            text: text.into(),
        });
    }
}

/// All word types of the corpus, keyed (and ordered) by form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    words: BTreeMap<String, Word>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count tokens into word types.
    pub fn from_tokens<I, S>(tokens: I, lowercase: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for token in tokens {
            let token = token.as_ref();
            if token.is_empty() {
                continue;
            }
            let form = if lowercase {
                token.to_lowercase()
            } else {
                token.to_string()
            };
            *counts.entry(form).or_insert(0) += 1;
        }
        Self::from_counts(counts)
    }

    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let words = counts
            .into_iter()
            .map(|(form, count)| {
                let form = form.into();
                (form.clone(), Word::new(form, count))
            })
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Total number of tokens.
    pub fn token_count(&self) -> usize {
        self.words.values().map(Word::count).sum()
    }

    pub fn get(&self, form: &str) -> Option<&Word> {
        self.words.get(form)
    }

    pub(crate) fn get_mut(&mut self, form: &str) -> Option<&mut Word> {
        self.words.get_mut(form)
    }

    pub fn contains(&self, form: &str) -> bool {
        self.words.contains_key(form)
    }

    /// Corpus frequency of `form` (0 if unseen).
    pub fn count(&self, form: &str) -> usize {
        self.words.get(form).map_or(0, Word::count)
    }

    /// Words in alphabetical order.
    pub fn iter(&self) -> Values<'_, String, Word> {
        self.words.values()
    }

    pub fn forms(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }

    pub(crate) fn note(&mut self, form: &str, side: Side, text: impl Into<String>) {
        if let Some(word) = self.words.get_mut(form) {
            word.note(side, text);
        }
    }
}

impl<'a> IntoIterator for &'a Lexicon {
    type Item = &'a Word;
    type IntoIter = Values<'a, String, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
