//! Widening: reclaim protostems whose continuations contain a known signature.
//!
//! A protostem too rare to found its own signature may still show every
//! affix of an accepted one (a good signature inside a bad continuation
//! set). Larger, more robust signatures pick first; each protostem joins at
//! most one signature per pass.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use tracing::info;

use crate::morpheme::Morpheme;
use crate::morphology::Morphology;
use crate::signature::Signature;
use crate::types::{Bigram, Pass, Side};

/// Signatures in claiming order: most affixes first, then most robust.
pub fn claiming_order<'a>(signatures: impl IntoIterator<Item = &'a Signature>) -> Vec<&'a Signature> {
    let mut ordered: Vec<&Signature> = signatures.into_iter().collect();
    ordered.sort_by(|a, b| {
        b.num_affixes()
            .cmp(&a.num_affixes())
            .then(b.robustness().cmp(&a.robustness()))
            .then_with(|| a.affix_string().cmp(b.affix_string()))
    });
    ordered
}

pub fn widen_signatures(morphology: &mut Morphology, side: Side, min_num_stems: usize) {
    let mut pool = morphology.get_protostems(side).clone();
    let mut claimed: FxHashSet<String> = FxHashSet::default();
    let mut new_bigrams: Vec<Bigram> = Vec::new();
    let mut notes: Vec<(String, String)> = Vec::new();

    for sig in claiming_order(morphology.get_signatures(side)) {
        for (stem, conts) in pool.iter_mut() {
            if claimed.contains(stem) || !sig.affixes().keys().all(|a| conts.contains(a)) {
                continue;
            }
            for affix in sig.affixes().keys() {
                new_bigrams.push(Bigram::new(stem.as_str(), affix.clone()));
                conts.remove(affix);
                notes.push((
                    side.join(stem, affix.surface()),
                    format!("{}: {stem} joins {}", Pass::WidenSignatures, sig.affix_string()),
                ));
            }
            claimed.insert(stem.clone());
        }
    }
    pool.retain(|_, conts: &mut BTreeSet<Morpheme>| !conts.is_empty());

    let mut bigrams = morphology.get_bigrams(side, false);
    bigrams.extend(new_bigrams);
    morphology.build_signatures(&bigrams, side, min_num_stems);
    morphology.analysis_mut(side).protostems = pool;
    info!(
        %side,
        reclaimed = claimed.len(),
        signatures = morphology.get_signatures(side).len(),
        "widen_signatures done"
    );

    for (word, note) in notes {
        morphology.lexicon_mut().note(&word, side, note);
    }
    morphology.record_biography(side, Pass::WidenSignatures);
}
