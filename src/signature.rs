//! Signatures: sets of stems sharing exactly the same set of affixes.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::entropy::entropy;
use crate::error::{CrabError, CrabResult};
use crate::morpheme::{Morpheme, AFFIX_DELIMITER};
use crate::text;
use crate::types::{Bigram, Side};

/// Immutable signature value.
///
/// Identity is the canonical affix string (plus side): two signatures with
/// the same affix set describe the same paradigm. Derived quantities are
/// computed once at construction.
#[derive(Debug, Clone, Serialize)]
pub struct Signature {
    affix_string: String,
    side: Side,
    stems: BTreeMap<Morpheme, usize>,
    affixes: BTreeMap<Morpheme, usize>,
    robustness: usize,
    edge_entropy: Option<OrderedFloat<f64>>,
    #[serde(skip)]
    bigrams: BTreeSet<Bigram>,
}

impl Signature {
    pub fn new(
        stems: BTreeMap<Morpheme, usize>,
        affixes: BTreeMap<Morpheme, usize>,
        side: Side,
    ) -> Self {
        let affix_string = affix_string_of(affixes.keys());
        let robustness = compute_robustness(&stems, &affixes);
        let edge_entropy = edge_entropy_of(stems.keys(), 1, side)
            .ok()
            .map(OrderedFloat);
        let bigrams = stems
            .keys()
            .flat_map(|stem| {
                affixes
                    .keys()
                    .map(move |affix| Bigram::new(stem.clone(), affix.clone()))
            })
            .collect();

        Self {
            affix_string,
            side,
            stems,
            affixes,
            robustness,
            edge_entropy,
            bigrams,
        }
    }

    /// Build a signature from plain lists; repeated items are counted.
    pub fn from_lists<S, A>(
        stems: impl IntoIterator<Item = S>,
        affixes: impl IntoIterator<Item = A>,
        side: Side,
    ) -> Self
    where
        S: Into<Morpheme>,
        A: Into<Morpheme>,
    {
        Self::new(count_items(stems), count_items(affixes), side)
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn stems(&self) -> &BTreeMap<Morpheme, usize> {
        &self.stems
    }

    pub fn affixes(&self) -> &BTreeMap<Morpheme, usize> {
        &self.affixes
    }

    pub fn num_stems(&self) -> usize {
        self.stems.len()
    }

    pub fn num_affixes(&self) -> usize {
        self.affixes.len()
    }

    /// Canonical key, e.g. `NULL=ed=ing=s`.
    pub fn affix_string(&self) -> &str {
        &self.affix_string
    }

    /// Letters saved by this signature compared to listing every word whole.
    pub fn robustness(&self) -> usize {
        self.robustness
    }

    /// Entropy of the stems' edge letters (last letter for suffixal
    /// signatures, first letter for prefixal ones).
    pub fn edge_entropy(&self) -> Option<f64> {
        self.edge_entropy.map(|e| e.0)
    }

    /// Entropy of the stems' edge strings of `length` letters.
    pub fn edge_entropy_at(&self, length: usize) -> CrabResult<f64> {
        edge_entropy_of(self.stems.keys(), length, self.side)
    }

    pub fn bigrams(&self) -> &BTreeSet<Bigram> {
        &self.bigrams
    }

    /// Words covered by this signature.
    pub fn words(&self) -> impl Iterator<Item = String> + '_ {
        self.bigrams.iter().map(move |b| b.word(self.side))
    }

    /// Most frequent stem (first in order on ties).
    pub fn example_stem(&self) -> Option<&Morpheme> {
        self.stems
            .iter()
            .fold(None, |best: Option<(&Morpheme, usize)>, (stem, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((stem, count)),
            })
            .map(|(stem, _)| stem)
    }

    /// Whether every affix of `self` is also an affix of `other`.
    pub fn affixes_subset_of(&self, other: &Signature) -> bool {
        self.affixes.keys().all(|a| other.affixes.contains_key(a))
    }

    /// Affix strings of the phantom signatures this one would induce if its
    /// stems were lengthened by one letter.
    ///
    /// For every slice length `p`, affixes are grouped by their first `p`
    /// letters (last `p` for prefixes). A group of two or more affixes whose
    /// following letters are pairwise distinct casts the shadow made of those
    /// letters, with `NULL` for the affix that equals the slice itself.
    pub fn cast_shadows(&self) -> BTreeSet<String> {
        let forms: Vec<Vec<&str>> = self
            .affixes
            .keys()
            .filter(|a| !a.is_empty())
            .map(|a| {
                let mut letters = text::letters(a.surface());
                if self.side == Side::Prefix {
                    letters.reverse();
                }
                letters
            })
            .collect();
        let max_len = forms.iter().map(Vec::len).max().unwrap_or(0);

        let mut shadows = BTreeSet::new();
        for p in 1..max_len {
            let mut groups: BTreeMap<&[&str], Vec<Morpheme>> = BTreeMap::new();
            for letters in forms.iter().filter(|l| l.len() >= p) {
                let next = letters.get(p).map_or(Morpheme::Null, |l| Morpheme::new(*l));
                groups.entry(&letters[..p]).or_default().push(next);
            }
            for next_letters in groups.into_values().filter(|g| g.len() >= 2) {
                let distinct: BTreeSet<&Morpheme> = next_letters.iter().collect();
                if distinct.len() == next_letters.len() {
                    shadows.insert(affix_string_of(distinct));
                }
            }
        }
        shadows
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.side == other.side && self.stems == other.stems && self.affixes == other.affixes
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.side.hash(state);
        self.affix_string.hash(state);
    }
}

/// Sorted, delimiter-joined affix list.
pub fn affix_string_of<'a>(affixes: impl IntoIterator<Item = &'a Morpheme>) -> String {
    let mut sorted: Vec<&Morpheme> = affixes.into_iter().collect();
    sorted.sort();
    sorted
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(AFFIX_DELIMITER)
}

fn count_items<T: Into<Morpheme>>(items: impl IntoIterator<Item = T>) -> BTreeMap<Morpheme, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item.into()).or_insert(0) += 1;
    }
    counts
}

fn compute_robustness(stems: &BTreeMap<Morpheme, usize>, affixes: &BTreeMap<Morpheme, usize>) -> usize {
    let stem_letters: usize = stems.keys().map(Morpheme::len).sum();
    let affix_letters: usize = affixes.keys().map(Morpheme::len).sum();
    stem_letters * affixes.len().saturating_sub(1) + affix_letters * stems.len().saturating_sub(1)
}

fn edge_entropy_of<'a>(
    stems: impl Iterator<Item = &'a Morpheme>,
    length: usize,
    side: Side,
) -> CrabResult<f64> {
    let mut edges: AHashMap<&str, usize> = AHashMap::new();
    for stem in stems {
        let surface = stem.surface();
        let edge = match side {
            Side::Suffix => text::trailing_letters(surface, length),
            Side::Prefix => text::leading_letters(surface, length),
        }
        .ok_or_else(|| CrabError::StemTooShort {
            stem: stem.to_string(),
            length,
        })?;
        *edges.entry(edge).or_insert(0) += 1;
    }
    Ok(entropy(edges.values().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn want_add() -> Signature {
        Signature::from_lists(["want", "add", "add"], ["", "ed", "ing"], Side::Suffix)
    }

    #[test]
    fn test_stem_counts() {
        let sig = want_add();
        assert_eq!(sig.stems()[&Morpheme::from("add")], 2);
        assert_eq!(sig.stems()[&Morpheme::from("want")], 1);
        assert_eq!(sig.affixes()[&Morpheme::Null], 1);
    }

    #[test]
    fn test_robustness() {
        assert_eq!(want_add().robustness(), 19);
    }

    #[test]
    fn test_equality_ignores_order() {
        let other = Signature::from_lists(["add", "add", "want"], ["ing", "", "ed"], Side::Suffix);
        assert_eq!(want_add(), other);
        let fewer = Signature::from_lists(["want", "add"], ["", "ed", "ing"], Side::Suffix);
        assert_ne!(want_add(), fewer);
    }

    #[test]
    fn test_side_matters() {
        let prefixal = Signature::from_lists(["want", "add", "add"], ["", "ed", "ing"], Side::Prefix);
        assert_ne!(want_add(), prefixal);
    }

    #[test]
    fn test_affix_string() {
        assert_eq!(want_add().affix_string(), "NULL=ed=ing");
        let sig = Signature::from_lists(["do", "wind"], ["un", "re"], Side::Prefix);
        assert_eq!(sig.affix_string(), "re=un");
    }

    #[test]
    fn test_bigrams() {
        let sig = Signature::from_lists(["cr", "dr"], ["y", "ied"], Side::Suffix);
        assert_eq!(sig.bigrams().len(), 4);
        assert!(sig.bigrams().contains(&Bigram::new("dr", "ied")));
        let words: BTreeSet<String> = sig.words().collect();
        assert!(words.contains("cried"));
    }

    #[test]
    fn test_example_stem() {
        assert_eq!(want_add().example_stem(), Some(&Morpheme::from("add")));
    }

    #[test]
    fn test_edge_entropy() {
        let sig = Signature::from_lists(["want", "add"], ["", "s"], Side::Suffix);
        assert_eq!(sig.edge_entropy(), Some(1.0));
        let sig = Signature::from_lists(["walk", "talk"], ["", "s"], Side::Suffix);
        assert_eq!(sig.edge_entropy(), Some(0.0));
        assert_eq!(sig.edge_entropy_at(2).unwrap(), 0.0);
    }

    #[test]
    fn test_prefixal_edge_entropy_uses_first_letters() {
        let sig = Signature::from_lists(["do", "wind"], ["un", "re"], Side::Prefix);
        assert_eq!(sig.edge_entropy(), Some(1.0));
    }

    #[test]
    fn test_edge_entropy_rejects_short_stem() {
        let sig = Signature::from_lists(["want", "ad"], ["", "s"], Side::Suffix);
        match sig.edge_entropy_at(3) {
            Err(CrabError::StemTooShort { stem, length }) => {
                assert_eq!(stem, "ad");
                assert_eq!(length, 3);
            }
            other => panic!("expected StemTooShort, got {other:?}"),
        }
    }

    #[test]
    fn test_cast_shadows() {
        let sig = Signature::from_lists(["chang"], ["e", "ed", "es", "ing"], Side::Suffix);
        let shadows = sig.cast_shadows();
        assert!(shadows.contains("NULL=d=s"));
        assert_eq!(shadows.len(), 1);

        let sig = Signature::from_lists(["structural"], ["ism", "ist"], Side::Suffix);
        assert_eq!(sig.cast_shadows(), BTreeSet::from(["m=t".to_string()]));
    }

    #[test]
    fn test_prefixal_shadows_read_from_the_right() {
        let sig = Signature::from_lists(["do"], ["re", "pre", "are"], Side::Prefix);
        // "re" ends both "pre" and "are": p + a + NULL
        assert!(sig.cast_shadows().contains("NULL=a=p"));
    }

    #[test]
    fn test_subset() {
        let small = Signature::from_lists(["x", "y"], ["", "s"], Side::Suffix);
        let big = Signature::from_lists(["z", "w"], ["", "s", "ed"], Side::Suffix);
        assert!(small.affixes_subset_of(&big));
        assert!(!big.affixes_subset_of(&small));
    }
}
