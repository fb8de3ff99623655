//! Human-readable reports and JSON export of a learned morphology.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{CrabError, CrabResult};
use crate::morphology::Morphology;
use crate::signature::Signature;
use crate::types::Side;

const RULE: &str = "--------------------------------------------------------------------------------";

/// Bracket `affix_string` if it is one of `shadows`.
pub fn format_if_shadow<'a>(affix_string: &'a str, shadows: &BTreeSet<String>) -> Cow<'a, str> {
    if shadows.contains(affix_string) {
        Cow::Owned(format!("[{affix_string}]"))
    } else {
        Cow::Borrowed(affix_string)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    MorphologyOverview,
    Families,
    SignaturesRobustness,
    SignaturesAscii,
    StemsAndWords,
    Protostems,
    WordBiographies,
}

impl ReportKind {
    pub const ALL: [ReportKind; 7] = [
        ReportKind::MorphologyOverview,
        ReportKind::Families,
        ReportKind::SignaturesRobustness,
        ReportKind::SignaturesAscii,
        ReportKind::StemsAndWords,
        ReportKind::Protostems,
        ReportKind::WordBiographies,
    ];

    /// Name used for output files (`<base>_<name>.txt`).
    pub fn name(self) -> &'static str {
        match self {
            ReportKind::MorphologyOverview => "morphology_overview",
            ReportKind::Families => "families",
            ReportKind::SignaturesRobustness => "signatures_robustness",
            ReportKind::SignaturesAscii => "signatures_ascii",
            ReportKind::StemsAndWords => "stems_and_words",
            ReportKind::Protostems => "protostems",
            ReportKind::WordBiographies => "word_biographies",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportKind {
    type Err = CrabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| CrabError::InvalidConfig(format!("unknown report {s:?}")))
    }
}

/// One report over one side, rendered through `Display`.
pub struct Report<'m> {
    kind: ReportKind,
    morphology: &'m Morphology,
    side: Side,
    shadows: BTreeSet<String>,
}

impl<'m> Report<'m> {
    pub fn new(kind: ReportKind, morphology: &'m Morphology, side: Side) -> Self {
        Self::with_shadows(kind, morphology, side, morphology.get_shadow_signatures(side))
    }

    pub fn with_shadows(
        kind: ReportKind,
        morphology: &'m Morphology,
        side: Side,
        shadows: BTreeSet<String>,
    ) -> Self {
        Self {
            kind,
            morphology,
            side,
            shadows,
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    fn key<'s>(&self, sig: &'s Signature) -> Cow<'s, str> {
        format_if_shadow(sig.affix_string(), &self.shadows)
    }

    fn write_overview(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.morphology;
        let side = self.side;
        let mut signatures = m.get_signatures(side);
        signatures.sort_by(|a, b| {
            b.num_stems()
                .cmp(&a.num_stems())
                .then_with(|| a.affix_string().cmp(b.affix_string()))
        });

        writeln!(f, "Morphology overview ({side}al)")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Word types:        {}", m.lexicon().len())?;
        writeln!(f, "Word tokens:       {}", m.lexicon().token_count())?;
        writeln!(f, "Signatures:        {}", signatures.len())?;
        writeln!(f, "Stems:             {}", m.get_stems(side).len())?;
        writeln!(f, "Affixes:           {}", m.get_affixes(side).len())?;
        writeln!(f, "Protostems:        {}", m.get_protostems(side).len())?;
        writeln!(f, "Families:          {}", m.get_families(side).len())?;
        writeln!(f, "Shadow signatures: {}", self.shadows.len())?;
        let passes: Vec<&str> = m.passes(side).iter().map(|p| p.name()).collect();
        writeln!(f, "Passes:            {}", passes.join(", "))?;
        writeln!(f)?;
        writeln!(f, "{:<40} {:>8} {:>12}  {}", "Signature", "Stems", "Robustness", "Example")?;
        writeln!(f, "{RULE}")?;
        for sig in signatures {
            let example = sig.example_stem().map(ToString::to_string).unwrap_or_default();
            writeln!(
                f,
                "{:<40} {:>8} {:>12}  {}",
                self.key(sig),
                sig.num_stems(),
                sig.robustness(),
                example
            )?;
        }
        Ok(())
    }

    fn write_families(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let families = self.morphology.get_families(self.side);
        if families.is_empty() {
            return writeln!(f, "No families.");
        }
        for family in families {
            let Ok(nucleus) = family.nucleus_signature(self.morphology) else {
                continue;
            };
            writeln!(
                f,
                "{} (robustness {}, {} children)",
                self.key(nucleus),
                nucleus.robustness(),
                family.children().len()
            )?;
            for child in family.signatures(self.morphology).into_iter().skip(1) {
                writeln!(f, "    {:<40} {:>8}", self.key(child), child.robustness())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_signature(&self, f: &mut fmt::Formatter<'_>, sig: &Signature) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "{}", self.key(sig))?;
        let entropy = sig
            .edge_entropy()
            .map_or_else(|| "n/a".to_string(), |e| format!("{e:.3}"));
        writeln!(
            f,
            "Stems: {}  Affixes: {}  Robustness: {}  Edge entropy: {}",
            sig.num_stems(),
            sig.num_affixes(),
            sig.robustness(),
            entropy
        )?;
        let stems: Vec<String> = sig.stems().iter().map(|(s, n)| format!("{s} ({n})")).collect();
        writeln!(f, "  stems:   {}", stems.join(" "))?;
        let affixes: Vec<String> = sig.affixes().iter().map(|(a, n)| format!("{a} ({n})")).collect();
        writeln!(f, "  affixes: {}", affixes.join(" "))
    }

    fn write_signatures(&self, f: &mut fmt::Formatter<'_>, by_robustness: bool) -> fmt::Result {
        let mut signatures = self.morphology.get_signatures(self.side);
        if by_robustness {
            signatures.sort_by(|a, b| {
                b.robustness()
                    .cmp(&a.robustness())
                    .then_with(|| a.affix_string().cmp(b.affix_string()))
            });
        }
        for sig in signatures {
            self.write_signature(f, sig)?;
        }
        Ok(())
    }

    fn write_stems_and_words(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sig in self.morphology.get_signatures(self.side) {
            writeln!(f, "{}", self.key(sig))?;
            for stem in sig.stems().keys() {
                let words: Vec<String> = sig
                    .affixes()
                    .keys()
                    .map(|affix| self.side.combine(stem, affix))
                    .collect();
                writeln!(f, "    {stem}: {}", words.join(" "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_protostems(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (stem, conts) in self.morphology.get_protostems(self.side) {
            let conts: Vec<String> = conts.iter().map(ToString::to_string).collect();
            writeln!(f, "{stem}: {}", conts.join(" "))?;
        }
        Ok(())
    }

    fn write_biographies(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in self.morphology.lexicon() {
            let entries: Vec<_> = word.biography_for(self.side).collect();
            writeln!(f, "{} ({})", word.form(), word.count())?;
            if entries.is_empty() {
                writeln!(f, "    unanalysed")?;
            }
            for entry in entries {
                let parses: Vec<String> = entry.parses.iter().map(ToString::to_string).collect();
                writeln!(f, "    {:<20} {}", entry.pass.name(), parses.join(" | "))?;
            }
            for note in word.notes_for(self.side) {
                writeln!(f, "      - {note}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ReportKind::MorphologyOverview => self.write_overview(f),
            ReportKind::Families => self.write_families(f),
            ReportKind::SignaturesRobustness => self.write_signatures(f, true),
            ReportKind::SignaturesAscii => self.write_signatures(f, false),
            ReportKind::StemsAndWords => self.write_stems_and_words(f),
            ReportKind::Protostems => self.write_protostems(f),
            ReportKind::WordBiographies => self.write_biographies(f),
        }
    }
}

/// Every report for `side`, in output order.
pub fn all_reports(morphology: &Morphology, side: Side) -> Vec<Report<'_>> {
    let shadows = morphology.get_shadow_signatures(side);
    ReportKind::ALL
        .into_iter()
        .map(|kind| Report::with_shadows(kind, morphology, side, shadows.clone()))
        .collect()
}

/// JSON document with the signatures, families, protostems and shadows of `side`.
pub fn to_json(morphology: &Morphology, side: Side) -> CrabResult<String> {
    let signatures: Vec<_> = morphology
        .get_signatures(side)
        .into_iter()
        .map(|sig| {
            serde_json::json!({
                "affix_string": sig.affix_string(),
                "stems": sig.stems(),
                "affixes": sig.affixes(),
                "robustness": sig.robustness(),
                "edge_entropy": sig.edge_entropy(),
            })
        })
        .collect();

    let document = serde_json::json!({
        "side": side,
        "word_types": morphology.lexicon().len(),
        "passes": morphology.passes(side),
        "signatures": signatures,
        "families": morphology.get_families(side),
        "protostems": morphology.get_protostems(side),
        "shadow_signatures": morphology.get_shadow_signatures(side),
    });
    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LearnConfig;

    fn learned() -> Morphology {
        let mut morphology = Morphology::new();
        let config = LearnConfig {
            min_stem_len: 2,
            min_robustness: 0,
            ..LearnConfig::default()
        }
        .with_side(Side::Suffix);
        morphology
            .learn_from_wordlist(
                ["want", "wants", "wanted", "wanting", "add", "adds", "added", "adding", "zebra"],
                &config,
            )
            .unwrap();
        morphology
    }

    #[test]
    fn test_format_if_shadow() {
        let shadows = BTreeSet::from(["NULL=d=s".to_string()]);
        assert_eq!(format_if_shadow("NULL=d=s", &shadows), "[NULL=d=s]");
        assert_eq!(format_if_shadow("e=ed=es", &shadows), "e=ed=es");
    }

    #[test]
    fn test_report_names_round_trip() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.name().parse::<ReportKind>().unwrap(), kind);
        }
        assert!("latex".parse::<ReportKind>().is_err());
    }

    #[test]
    fn test_overview() {
        let morphology = learned();
        let text = Report::new(ReportKind::MorphologyOverview, &morphology, Side::Suffix).to_string();
        assert!(text.contains("Word types:        9"));
        assert!(text.contains("NULL=ed=ing=s"));
        assert!(text.contains("find_signatures1, widen_signatures, split_affixes"));
    }

    #[test]
    fn test_families_report() {
        let morphology = learned();
        let text = Report::new(ReportKind::Families, &morphology, Side::Suffix).to_string();
        assert!(text.starts_with("NULL=ed=ing=s (robustness"));
        assert!(text.contains("0 children"));

        let empty = Morphology::new();
        assert_eq!(Report::new(ReportKind::Families, &empty, Side::Prefix).to_string(), "No families.\n");
    }

    #[test]
    fn test_stems_and_words() {
        let morphology = learned();
        let text = Report::new(ReportKind::StemsAndWords, &morphology, Side::Suffix).to_string();
        assert!(text.contains("    add: add added adding adds"));
    }

    #[test]
    fn test_biographies_mark_unanalysed_words() {
        let morphology = learned();
        let text = Report::new(ReportKind::WordBiographies, &morphology, Side::Suffix).to_string();
        assert!(text.contains("zebra (1)\n    unanalysed"));
        assert!(text.contains("want + ed"));
    }

    #[test]
    fn test_biography_notes_stay_on_their_side() {
        let mut morphology = Morphology::new();
        let config = LearnConfig {
            min_stem_len: 2,
            ..LearnConfig::default()
        };
        morphology
            .learn_from_wordlist(["want", "wants", "wanted", "add", "adds", "added"], &config)
            .unwrap();

        let suffixal = Report::new(ReportKind::WordBiographies, &morphology, Side::Suffix).to_string();
        let prefixal = Report::new(ReportKind::WordBiographies, &morphology, Side::Prefix).to_string();
        assert!(suffixal.contains("want + ed in NULL=ed=s"));
        assert!(!prefixal.contains("in NULL=ed=s"));
    }

    #[test]
    fn test_all_reports() {
        let morphology = learned();
        let reports = all_reports(&morphology, Side::Suffix);
        assert_eq!(reports.len(), ReportKind::ALL.len());
        assert!(reports.iter().all(|r| !r.to_string().is_empty()));
    }

    #[test]
    fn test_json_export() {
        let morphology = learned();
        let json = to_json(&morphology, Side::Suffix).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["side"], "suffix");
        assert_eq!(value["signatures"][0]["affix_string"], "NULL=ed=ing=s");
        assert_eq!(value["signatures"][0]["stems"]["want"], 4);
        assert_eq!(value["families"][0]["nucleus"], "NULL=ed=ing=s");
        assert_eq!(value["passes"][2], "split_affixes");
    }
}
