//! The morphology of a corpus: suffixal and prefixal analyses over one lexicon.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::info;

use crate::config::{InputEncoding, LearnConfig};
use crate::error::{CrabError, CrabResult};
use crate::family::{build_families, Family};
use crate::graph::SuccessorGraph;
use crate::lexicon::{BiographyEntry, Lexicon};
use crate::morpheme::{AffixIndexer, Morpheme};
use crate::signature::Signature;
use crate::types::{Bigram, Parse, Pass, Side};
use crate::{discovery, split, text, widen};

/// Everything learned for one affix side.
#[derive(Debug, Clone, Default)]
pub struct SideAnalysis {
    pub(crate) signatures: BTreeMap<String, Signature>,
    pub(crate) families: Vec<Family>,
    pub(crate) protostems: BTreeMap<String, BTreeSet<Morpheme>>,
    pub(crate) indexer: AffixIndexer,
    pub(crate) passes: Vec<Pass>,
}

impl SideAnalysis {
    pub fn signatures(&self) -> &BTreeMap<String, Signature> {
        &self.signatures
    }

    pub fn families(&self) -> &[Family] {
        &self.families
    }

    pub fn protostems(&self) -> &BTreeMap<String, BTreeSet<Morpheme>> {
        &self.protostems
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }
}

#[derive(Debug, Clone, Default)]
pub struct Morphology {
    suffixal: SideAnalysis,
    prefixal: SideAnalysis,
    lexicon: Lexicon,
}

impl Morphology {
    pub fn new() -> Self {
        Self::default()
    }

    /// A morphology holding the given signatures (each filed under its side).
    pub fn from_signatures(signatures: impl IntoIterator<Item = Signature>) -> Self {
        let mut morphology = Self::new();
        for signature in signatures {
            morphology.insert_signature(signature);
        }
        morphology
    }

    /// A morphology with a lexicon but nothing learned yet.
    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            ..Self::default()
        }
    }

    pub fn analysis(&self, side: Side) -> &SideAnalysis {
        match side {
            Side::Suffix => &self.suffixal,
            Side::Prefix => &self.prefixal,
        }
    }

    pub(crate) fn analysis_mut(&mut self, side: Side) -> &mut SideAnalysis {
        match side {
            Side::Suffix => &mut self.suffixal,
            Side::Prefix => &mut self.prefixal,
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub(crate) fn lexicon_mut(&mut self) -> &mut Lexicon {
        &mut self.lexicon
    }

    // ------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------

    /// Reset all state, count `words`, and run the learning pipeline.
    pub fn learn_from_wordlist<I, S>(&mut self, words: I, config: &LearnConfig) -> CrabResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        config.validate()?;
        *self = Self::with_lexicon(Lexicon::from_tokens(words, config.lowercase));
        info!(
            word_types = self.lexicon.len(),
            tokens = self.lexicon.token_count(),
            "lexicon loaded"
        );

        for &side in &config.sides {
            self.learn_side(side, config);
        }
        Ok(())
    }

    /// Tokenize `text` with the configured regex, then learn from the tokens.
    pub fn learn_from_string(&mut self, text: &str, config: &LearnConfig) -> CrabResult<()> {
        let pattern = config.tokenizer()?;
        self.learn_from_wordlist(text::tokenize(text, &pattern), config)
    }

    pub fn learn_from_file(
        &mut self,
        path: impl AsRef<Path>,
        encoding: &str,
        config: &LearnConfig,
    ) -> CrabResult<()> {
        let path = path.as_ref();
        let encoding: InputEncoding = encoding.parse()?;
        let bytes = std::fs::read(path).map_err(|source| CrabError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = encoding.decode(bytes, path)?;
        self.learn_from_string(&text, config)
    }

    fn learn_side(&mut self, side: Side, config: &LearnConfig) {
        discovery::find_signatures1(self, side, config.min_stem_len, config.min_num_stems);
        widen::widen_signatures(self, side, config.min_num_stems);
        split::split_affixes(self, side, config.min_biparse_entropy);
        build_families(self, side, config.num_seed_families, config.min_robustness);
    }

    // ------------------------------------------------------------------
    // Signatures
    // ------------------------------------------------------------------

    /// Signatures of one side, in affix-string order.
    pub fn get_signatures(&self, side: Side) -> Vec<&Signature> {
        self.analysis(side).signatures.values().collect()
    }

    pub fn get_signature(&self, affix_string: &str, side: Side) -> CrabResult<&Signature> {
        self.analysis(side)
            .signatures
            .get(affix_string)
            .ok_or_else(|| CrabError::SignatureNotFound {
                key: affix_string.to_string(),
                side,
            })
    }

    /// Add a signature whose counts are taken from the lexicon.
    pub fn add_signature<S, A>(
        &mut self,
        stems: impl IntoIterator<Item = S>,
        affixes: impl IntoIterator<Item = A>,
        side: Side,
    ) -> &Signature
    where
        S: Into<Morpheme>,
        A: Into<Morpheme>,
    {
        let stems: BTreeSet<Morpheme> = stems.into_iter().map(Into::into).collect();
        let affixes: BTreeSet<Morpheme> = affixes.into_iter().map(Into::into).collect();
        let (stem_counts, affix_counts) = self.get_stem_and_affix_count(&stems, &affixes, side);
        let key = self.insert_signature(Signature::new(stem_counts, affix_counts, side));
        &self.analysis(side).signatures[&key]
    }

    pub fn remove_signature(&mut self, affix_string: &str, side: Side) -> CrabResult<Signature> {
        self.analysis_mut(side)
            .signatures
            .remove(affix_string)
            .ok_or_else(|| CrabError::SignatureNotFound {
                key: affix_string.to_string(),
                side,
            })
    }

    fn insert_signature(&mut self, signature: Signature) -> String {
        let key = signature.affix_string().to_string();
        self.analysis_mut(signature.side())
            .signatures
            .insert(key.clone(), signature);
        key
    }

    /// Per-stem and per-affix corpus counts of `stem ⊕ affix` combinations.
    ///
    /// A combination missing from the lexicon counts once.
    pub fn get_stem_and_affix_count<'a>(
        &self,
        stems: impl IntoIterator<Item = &'a Morpheme>,
        affixes: impl IntoIterator<Item = &'a Morpheme> + Clone,
        side: Side,
    ) -> (BTreeMap<Morpheme, usize>, BTreeMap<Morpheme, usize>) {
        let mut stem_counts = BTreeMap::new();
        let mut affix_counts = BTreeMap::new();
        for stem in stems {
            for affix in affixes.clone() {
                let count = match self.lexicon.count(&side.combine(stem, affix)) {
                    0 => 1,
                    n => n,
                };
                *stem_counts.entry(stem.clone()).or_insert(0) += count;
                *affix_counts.entry(affix.clone()).or_insert(0) += count;
            }
        }
        (stem_counts, affix_counts)
    }

    /// Replace the signatures of `side` with those induced by `bigrams`.
    ///
    /// Stems are grouped by their exact affix set; groups with fewer than
    /// `min_num_stems` stems are dropped.
    pub fn build_signatures<'a>(
        &mut self,
        bigrams: impl IntoIterator<Item = &'a Bigram>,
        side: Side,
        min_num_stems: usize,
    ) {
        let mut stem_to_affixes: FxHashMap<&Morpheme, BTreeSet<&Morpheme>> = FxHashMap::default();
        for bigram in bigrams {
            stem_to_affixes
                .entry(&bigram.stem)
                .or_default()
                .insert(&bigram.affix);
        }

        let mut affixes_to_stems: BTreeMap<BTreeSet<&Morpheme>, BTreeSet<&Morpheme>> =
            BTreeMap::new();
        for (stem, affixes) in stem_to_affixes {
            affixes_to_stems.entry(affixes).or_default().insert(stem);
        }

        let signatures: Vec<Signature> = affixes_to_stems
            .par_iter()
            .filter(|(_, stems)| stems.len() >= min_num_stems)
            .map(|(affixes, stems)| {
                let (stem_counts, affix_counts) =
                    self.get_stem_and_affix_count(stems.iter().copied(), affixes.iter().copied(), side);
                Signature::new(stem_counts, affix_counts, side)
            })
            .collect();

        let analysis = self.analysis_mut(side);
        analysis.signatures = signatures
            .into_iter()
            .map(|sig| (sig.affix_string().to_string(), sig))
            .collect();
    }

    /// Allocate a fresh disambiguated spelling of `form` for `side`.
    pub fn add_new_index(&mut self, form: &str, side: Side) -> Morpheme {
        self.analysis_mut(side).indexer.add_new_index(form)
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn get_families(&self, side: Side) -> &[Family] {
        &self.analysis(side).families
    }

    pub fn get_protostems(&self, side: Side) -> &BTreeMap<String, BTreeSet<Morpheme>> {
        &self.analysis(side).protostems
    }

    pub fn get_stems(&self, side: Side) -> BTreeSet<&Morpheme> {
        self.analysis(side)
            .signatures
            .values()
            .flat_map(|sig| sig.stems().keys())
            .collect()
    }

    pub fn get_affixes(&self, side: Side) -> BTreeSet<&Morpheme> {
        self.analysis(side)
            .signatures
            .values()
            .flat_map(|sig| sig.affixes().keys())
            .collect()
    }

    /// All bigrams of `side`; `stripped` drops disambiguation indices.
    pub fn get_bigrams(&self, side: Side, stripped: bool) -> BTreeSet<Bigram> {
        self.analysis(side)
            .signatures
            .values()
            .flat_map(|sig| sig.bigrams().iter())
            .map(|bigram| {
                if stripped {
                    bigram.stripped()
                } else {
                    bigram.clone()
                }
            })
            .collect()
    }

    /// Full word parses, following chains through indexed morphemes.
    pub fn get_parses(&self, side: Side) -> BTreeSet<Parse> {
        let bigrams = self.get_bigrams(side, false);
        SuccessorGraph::from_bigrams(&bigrams).parses(side)
    }

    /// Union of the shadows cast by every signature of `side`.
    pub fn get_shadow_signatures(&self, side: Side) -> BTreeSet<String> {
        self.analysis(side)
            .signatures
            .par_iter()
            .map(|(_, sig)| sig.cast_shadows())
            .reduce(BTreeSet::new, |mut acc, shadows| {
                acc.extend(shadows);
                acc
            })
    }

    pub fn passes(&self, side: Side) -> &[Pass] {
        &self.analysis(side).passes
    }

    /// Biography entries of `word` for `side`.
    pub fn get_biography(&self, word: &str, side: Side) -> Vec<&BiographyEntry> {
        self.lexicon
            .get(word)
            .map(|w| w.biography_for(side).collect())
            .unwrap_or_default()
    }

    /// Append `pass` to the biography of every word parsed on `side`.
    pub(crate) fn record_biography(&mut self, side: Side, pass: Pass) {
        let mut word_to_parses: BTreeMap<String, BTreeSet<Parse>> = BTreeMap::new();
        for parse in self.get_parses(side) {
            word_to_parses.entry(parse.surface()).or_default().insert(parse);
        }
        for (form, parses) in word_to_parses {
            if let Some(word) = self.lexicon.get_mut(&form) {
                word.record(BiographyEntry { pass, side, parses });
            }
        }
        self.analysis_mut(side).passes.push(pass);
    }
}

/// Two morphologies are equal when both sides hold the same signatures.
impl PartialEq for Morphology {
    fn eq(&self, other: &Self) -> bool {
        self.suffixal.signatures == other.suffixal.signatures
            && self.prefixal.signatures == other.prefixal.signatures
    }
}
