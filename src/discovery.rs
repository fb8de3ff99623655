//! Initial signature discovery from adjacent words in sorted order.
//!
//! Words are sorted (reversed first for the prefixal analysis, so the pass
//! always works on left edges), every adjacent pair contributes its longest
//! common prefix as a protostem, and protostems sharing exactly the same set
//! of continuations become the stems of one signature.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::morpheme::Morpheme;
use crate::morphology::Morphology;
use crate::text;
use crate::types::{Bigram, Pass, Side};

/// Protostems found in `forms` (sorted) with at least `min_stem_len` letters.
pub fn find_protostems(forms: &[String], min_stem_len: usize) -> BTreeSet<&str> {
    forms
        .windows(2)
        .map(|pair| text::common_prefix(&pair[0], &pair[1]))
        .filter(|prefix| text::letter_count(prefix) >= min_stem_len)
        .collect()
}

/// Continuations of `stem` among the sorted `forms`; the empty one is NULL.
pub fn continuations(forms: &[String], stem: &str) -> BTreeSet<String> {
    let start = forms.partition_point(|w| w.as_str() < stem);
    let mut found = BTreeSet::new();
    for word in &forms[start..] {
        if !word.starts_with(stem) {
            break;
        }
        if let Some(rest) = text::strip_letter_prefix(word, stem) {
            found.insert(rest.to_string());
        }
    }
    found
}

pub fn find_signatures1(
    morphology: &mut Morphology,
    side: Side,
    min_stem_len: usize,
    min_num_stems: usize,
) {
    let restore = |s: &str| match side {
        Side::Suffix => s.to_string(),
        Side::Prefix => text::reverse_letters(s),
    };

    let mut forms: Vec<String> = morphology.lexicon().forms().map(restore).collect();
    forms.sort();

    let mut groups: BTreeMap<BTreeSet<Morpheme>, Vec<String>> = BTreeMap::new();
    for protostem in find_protostems(&forms, min_stem_len) {
        let conts: BTreeSet<Morpheme> = continuations(&forms, protostem)
            .iter()
            .map(|c| Morpheme::new(restore(c.as_str())))
            .collect();
        groups.entry(conts).or_default().push(restore(protostem));
    }

    let mut bigrams: BTreeSet<Bigram> = BTreeSet::new();
    let mut protostems: BTreeMap<String, BTreeSet<Morpheme>> = BTreeMap::new();
    for (conts, stems) in groups {
        if stems.len() >= min_num_stems {
            for stem in &stems {
                for affix in &conts {
                    bigrams.insert(Bigram::new(stem.as_str(), affix.clone()));
                }
            }
        } else {
            debug!(%side, stems = ?stems, "continuation set below stem threshold");
            for stem in stems {
                protostems.insert(stem, conts.clone());
            }
        }
    }

    morphology.build_signatures(&bigrams, side, min_num_stems);
    let analysis = morphology.analysis_mut(side);
    analysis.protostems = protostems;
    info!(
        %side,
        signatures = analysis.signatures.len(),
        protostems = analysis.protostems.len(),
        "find_signatures1 done"
    );

    let notes: Vec<(String, String)> = morphology
        .get_signatures(side)
        .iter()
        .flat_map(|sig| {
            sig.bigrams().iter().map(move |b| {
                (
                    b.word(side),
                    format!("{}: {} + {} in {}", Pass::FindSignatures1, b.stem, b.affix, sig.affix_string()),
                )
            })
        })
        .collect();
    for (word, note) in notes {
        morphology.lexicon_mut().note(&word, side, note);
    }
    morphology.record_biography(side, Pass::FindSignatures1);
}
