//! Affix splitting through biparses.
//!
//! A word analysed both as `short + x` and as `long + r`, where
//! `long = short + diff`, suggests that `x` is really `diff + r`. Each such
//! group of short stems gets a fresh indexed morpheme for `diff`, and the
//! two-morpheme bigrams are rewired into the chain `short -> diff:k -> r`.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, trace};

use crate::morpheme::Morpheme;
use crate::morphology::Morphology;
use crate::signature::Signature;
use crate::types::{Bigram, Pass, Side};

/// Key of a biparse group: the diff, then the short and long signature keys.
pub type BiparseKey = (String, String, String);

/// `(stem, signature key)` analyses of every word covered by `side`.
pub fn word_analyses(morphology: &Morphology, side: Side) -> BTreeMap<String, BTreeSet<(Morpheme, String)>> {
    let mut analyses: BTreeMap<String, BTreeSet<(Morpheme, String)>> = BTreeMap::new();
    for sig in morphology.get_signatures(side) {
        for bigram in sig.bigrams() {
            analyses
                .entry(bigram.word(side))
                .or_default()
                .insert((bigram.stem.clone(), sig.affix_string().to_string()));
        }
    }
    analyses
}

/// Letters by which `long` extends `short` on the affix side, if any.
fn stem_diff<'a>(short: &str, long: &'a str, side: Side) -> Option<&'a str> {
    let diff = match side {
        Side::Suffix => long.strip_prefix(short),
        Side::Prefix => long.strip_suffix(short),
    }?;
    (!diff.is_empty()).then_some(diff)
}

/// Group short stems of admitted biparses by `(diff, short key, long key)`.
pub fn find_biparses(
    morphology: &Morphology,
    side: Side,
    min_entropy: f64,
) -> BTreeMap<BiparseKey, BTreeSet<Morpheme>> {
    let mut groups: BTreeMap<BiparseKey, BTreeSet<Morpheme>> = BTreeMap::new();

    for (word, analyses) in word_analyses(morphology, side) {
        let analyses: Vec<&(Morpheme, String)> = analyses.iter().collect();
        for (i, first) in analyses.iter().enumerate() {
            for second in &analyses[i + 1..] {
                let (short, long) = if first.0.len() <= second.0.len() {
                    (*first, *second)
                } else {
                    (*second, *first)
                };
                if short.1 == long.1 {
                    continue;
                }
                let Some(diff) = stem_diff(short.0.surface(), long.0.surface(), side) else {
                    continue;
                };

                let entropy = morphology
                    .get_signature(&long.1, side)
                    .ok()
                    .and_then(Signature::edge_entropy);
                match entropy {
                    Some(e) if e >= min_entropy => {
                        groups
                            .entry((diff.to_string(), short.1.clone(), long.1.clone()))
                            .or_default()
                            .insert(short.0.clone());
                    }
                    _ => trace!(%word, long = %long.1, ?entropy, "biparse below entropy threshold"),
                }
            }
        }
    }
    groups
}

pub fn split_affixes(morphology: &mut Morphology, side: Side, min_entropy: f64) {
    let groups = find_biparses(morphology, side, min_entropy);
    let mut bigrams = morphology.get_bigrams(side, false);
    let mut notes: Vec<(String, String)> = Vec::new();
    let mut split_groups = 0usize;

    for ((diff, short_key, long_key), stems) in groups {
        let (Ok(short_sig), Ok(long_sig)) = (
            morphology.get_signature(&short_key, side),
            morphology.get_signature(&long_key, side),
        ) else {
            continue;
        };
        let long_stems: BTreeSet<Morpheme> = long_sig.stems().keys().cloned().collect();

        // (x, r) with x == diff + r on the affix side
        let diff_str = diff.as_str();
        let plan: Vec<(Morpheme, Morpheme)> = short_sig
            .affixes()
            .keys()
            .flat_map(|x| {
                long_sig
                    .affixes()
                    .keys()
                    .filter(move |r| x.surface() == side.join(diff_str, r.surface()))
                    .map(move |r| (x.clone(), r.clone()))
            })
            .collect();
        if plan.is_empty() {
            continue;
        }

        let mut name: Option<Morpheme> = None;
        for stem in &stems {
            let long = Morpheme::new(side.join(stem.surface(), &diff));
            if !long_stems.contains(&long) {
                continue;
            }
            for (x, r) in &plan {
                let short_bigram = Bigram::new(stem.clone(), x.clone());
                let long_bigram = Bigram::new(long.clone(), r.clone());
                // both analyses must still be unclaimed by earlier groups
                if !bigrams.contains(&short_bigram) || !bigrams.contains(&long_bigram) {
                    continue;
                }
                let bridge = name
                    .get_or_insert_with(|| morphology.add_new_index(&diff, side))
                    .clone();

                notes.push((
                    short_bigram.word(side),
                    format!("{}: {stem} + {bridge} + {r} from {short_key} / {long_key}", Pass::SplitAffixes),
                ));
                bigrams.remove(&short_bigram);
                bigrams.remove(&long_bigram);
                bigrams.insert(Bigram::new(stem.clone(), bridge.clone()));
                bigrams.insert(Bigram::new(bridge, r.clone()));
            }
        }
        if let Some(name) = name {
            split_groups += 1;
            debug!(%side, %diff, %name, short = %short_key, long = %long_key, stems = stems.len(), "affix split");
        }
    }

    morphology.build_signatures(&bigrams, side, 1);
    info!(
        %side,
        groups = split_groups,
        signatures = morphology.get_signatures(side).len(),
        "split_affixes done"
    );

    for (word, note) in notes {
        morphology.lexicon_mut().note(&word, side, note);
    }
    morphology.record_biography(side, Pass::SplitAffixes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::find_signatures1;
    use crate::lexicon::Lexicon;

    const BUILD_PAINT: [&str; 8] = [
        "build", "builds", "building", "buildings", "paint", "paints", "painting", "paintings",
    ];

    fn discovered() -> Morphology {
        let mut morphology = Morphology::with_lexicon(Lexicon::from_tokens(BUILD_PAINT, false));
        find_signatures1(&mut morphology, Side::Suffix, 3, 2);
        morphology
    }

    #[test]
    fn test_stem_diff() {
        assert_eq!(stem_diff("build", "building", Side::Suffix), Some("ing"));
        assert_eq!(stem_diff("do", "redo", Side::Prefix), Some("re"));
        assert_eq!(stem_diff("do", "redo", Side::Suffix), None);
        assert_eq!(stem_diff("do", "do", Side::Suffix), None);
    }

    #[test]
    fn test_biparse_groups() {
        let morphology = discovered();
        assert!(morphology.get_signature("NULL=ing=ings=s", Side::Suffix).is_ok());
        assert!(morphology.get_signature("NULL=s", Side::Suffix).is_ok());

        let groups = find_biparses(&morphology, Side::Suffix, 0.0);
        let key = ("ing".to_string(), "NULL=ing=ings=s".to_string(), "NULL=s".to_string());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[&key], BTreeSet::from([Morpheme::from("build"), Morpheme::from("paint")]));
    }

    #[test]
    fn test_low_entropy_long_signature_rejected() {
        // "building" and "painting" both end in g: edge entropy 0
        let mut morphology = discovered();
        assert!(find_biparses(&morphology, Side::Suffix, 1.0).is_empty());
        split_affixes(&mut morphology, Side::Suffix, 1.0);
        assert!(morphology.get_signature("NULL=ing=ings=s", Side::Suffix).is_ok());
        assert_eq!(morphology.passes(Side::Suffix).last(), Some(&Pass::SplitAffixes));
    }

    #[test]
    fn test_split_inserts_indexed_bridge() {
        let mut morphology = discovered();
        split_affixes(&mut morphology, Side::Suffix, 0.0);

        let sig = morphology.get_signature("NULL=ing:1=s", Side::Suffix).unwrap();
        assert_eq!(sig.stems().keys().cloned().collect::<Vec<_>>(), vec![
            Morpheme::from("build"),
            Morpheme::from("paint")
        ]);
        let bridge = morphology.get_signature("NULL=s", Side::Suffix).unwrap();
        assert_eq!(bridge.num_stems(), 1);
        assert!(bridge.stems().contains_key(&Morpheme::indexed("ing", 1)));
        assert!(morphology.get_signature("NULL=ing=ings=s", Side::Suffix).is_err());
    }

    #[test]
    fn test_biparse_round_trip() {
        let mut morphology = discovered();
        let covered: BTreeSet<String> = word_analyses(&morphology, Side::Suffix).into_keys().collect();
        split_affixes(&mut morphology, Side::Suffix, 0.0);

        for form in covered {
            let word = morphology.lexicon().get(&form).unwrap();
            let entry = word.biography().last().unwrap();
            assert_eq!(entry.pass, Pass::SplitAffixes);
            assert!(!entry.parses.is_empty());
            assert!(entry.parses.iter().all(|p| p.surface() == form));
        }

        let buildings = morphology.lexicon().get("buildings").unwrap();
        let parses = buildings.current_parses(Side::Suffix).unwrap();
        assert_eq!(parses.len(), 1);
        assert_eq!(parses.iter().next().unwrap().to_string(), "build + ing:1 + s");
        assert!(buildings.notes_for(Side::Suffix).any(|n| n.starts_with("split_affixes")));
    }

    #[test]
    fn test_prefixal_split() {
        let mut morphology = Morphology::from_signatures([
            Signature::from_lists(["do", "make"], ["", "re", "unre"], Side::Prefix),
            Signature::from_lists(["redo", "remake"], ["", "un"], Side::Prefix),
        ]);
        split_affixes(&mut morphology, Side::Prefix, 0.0);

        let re = Morpheme::indexed("re", 1);
        let sig = morphology.get_signature("NULL=re:1", Side::Prefix).unwrap();
        assert_eq!(sig.num_stems(), 2);
        assert!(morphology
            .get_signature("NULL=un", Side::Prefix)
            .unwrap()
            .stems()
            .contains_key(&re));
        let surfaces: BTreeSet<String> = morphology
            .get_parses(Side::Prefix)
            .iter()
            .filter(|p| p.len() == 3)
            .map(|p| p.surface())
            .collect();
        assert_eq!(surfaces, BTreeSet::from(["unredo".to_string(), "unremake".to_string()]));
    }

    fn three_morpheme_parses(morphology: &Morphology, word: &str) -> BTreeSet<String> {
        morphology
            .get_parses(Side::Suffix)
            .iter()
            .filter(|p| p.len() == 3 && p.surface() == word)
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_earlier_group_wins_shared_short_bigram() {
        // (build, ings) splits as in + gs and as ing + s; "in" sorts first
        let mut morphology = Morphology::from_signatures([
            Signature::from_lists(["build", "paint"], ["", "ings"], Side::Suffix),
            Signature::from_lists(["buildin", "building"], ["gs", "s"], Side::Suffix),
        ]);
        let groups = find_biparses(&morphology, Side::Suffix, 0.0);
        let diffs: Vec<&str> = groups.keys().map(|(diff, _, _)| diff.as_str()).collect();
        assert_eq!(diffs, vec!["in", "ing"]);

        split_affixes(&mut morphology, Side::Suffix, 0.0);
        let sig = morphology.get_signature("NULL=in:1", Side::Suffix).unwrap();
        assert!(sig.stems().contains_key(&Morpheme::from("build")));
        let ing = Morpheme::indexed("ing", 1);
        assert!(!morphology.get_stems(Side::Suffix).contains(&ing));
        assert!(!morphology.get_affixes(Side::Suffix).contains(&ing));
        assert_eq!(
            three_morpheme_parses(&morphology, "buildings"),
            BTreeSet::from(["build + in:1 + gs".to_string()])
        );
    }

    #[test]
    fn test_consumed_long_bigram_is_not_split_again() {
        let mut morphology = Morphology::from_signatures([
            Signature::from_lists(["build", "paint"], ["", "ing", "ings", "s"], Side::Suffix),
            Signature::from_lists(["building", "painting"], ["", "s"], Side::Suffix),
            Signature::from_lists(["buildings", "paintings"], ["", "x"], Side::Suffix),
        ]);
        split_affixes(&mut morphology, Side::Suffix, 0.0);

        // the ing group already took (building, s)
        let stems = morphology.get_stems(Side::Suffix);
        assert!(!stems.contains(&Morpheme::from("building")));
        assert!(!stems.contains(&Morpheme::indexed("s", 1)));
        assert!(!stems.contains(&Morpheme::indexed("ings", 1)));
        assert!(morphology.get_signature("NULL=ing:1=s", Side::Suffix).is_ok());
        assert_eq!(morphology.get_signature("NULL=x", Side::Suffix).unwrap().num_stems(), 2);
        assert_eq!(
            three_morpheme_parses(&morphology, "buildings"),
            BTreeSet::from(["build + ing:1 + s".to_string()])
        );
    }

    #[test]
    fn test_index_counter_is_per_side() {
        let mut morphology = discovered();
        morphology.add_new_index("ing", Side::Prefix);
        split_affixes(&mut morphology, Side::Suffix, 0.0);
        assert!(morphology.get_signature("NULL=ing:1=s", Side::Suffix).is_ok());
    }
}
