//! Families: signatures grouped under a robust nucleus they extend.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use crate::error::CrabResult;
use crate::morphology::Morphology;
use crate::signature::Signature;
use crate::types::Side;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Family {
    nucleus: String,
    side: Side,
    children: BTreeSet<String>,
}

impl Family {
    pub fn new(nucleus: impl Into<String>, side: Side) -> Self {
        Self {
            nucleus: nucleus.into(),
            side,
            children: BTreeSet::new(),
        }
    }

    /// Affix string of the nucleus signature.
    pub fn nucleus(&self) -> &str {
        &self.nucleus
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Affix strings of the member signatures, nucleus excluded.
    pub fn children(&self) -> &BTreeSet<String> {
        &self.children
    }

    pub fn add_child(&mut self, affix_string: impl Into<String>) {
        self.children.insert(affix_string.into());
    }

    pub fn nucleus_signature<'m>(&self, morphology: &'m Morphology) -> CrabResult<&'m Signature> {
        morphology.get_signature(&self.nucleus, self.side)
    }

    /// Nucleus then children, skipping keys no longer present.
    pub fn signatures<'m>(&self, morphology: &'m Morphology) -> Vec<&'m Signature> {
        std::iter::once(&self.nucleus)
            .chain(&self.children)
            .filter_map(|key| morphology.get_signature(key, self.side).ok())
            .collect()
    }
}

/// The `num_seed_families` most robust signatures, most robust first.
pub fn select_nuclei(signatures: Vec<&Signature>, num_seed_families: usize) -> Vec<&Signature> {
    let mut ranked = signatures;
    ranked.sort_by(|a, b| {
        b.robustness()
            .cmp(&a.robustness())
            .then_with(|| a.affix_string().cmp(b.affix_string()))
    });
    ranked.truncate(num_seed_families);
    ranked
}

pub fn build_families(
    morphology: &mut Morphology,
    side: Side,
    num_seed_families: usize,
    min_robustness: usize,
) {
    let signatures = morphology.get_signatures(side);
    let mut nuclei = select_nuclei(signatures.clone(), num_seed_families);
    // stable: ties keep robustness order
    nuclei.sort_by(|a, b| b.num_affixes().cmp(&a.num_affixes()));

    let nucleus_keys: BTreeSet<&str> = nuclei.iter().map(|sig| sig.affix_string()).collect();
    let mut families: Vec<Family> = nuclei
        .iter()
        .map(|sig| Family::new(sig.affix_string(), side))
        .collect();

    let mut assigned = 0usize;
    for sig in signatures {
        if nucleus_keys.contains(sig.affix_string()) || sig.robustness() < min_robustness {
            continue;
        }
        if let Some((family, _)) = families
            .iter_mut()
            .zip(&nuclei)
            .find(|(_, nucleus)| nucleus.affixes_subset_of(sig))
        {
            family.add_child(sig.affix_string());
            assigned += 1;
        }
    }

    info!(%side, families = families.len(), assigned, "build_families done");
    morphology.analysis_mut(side).families = families;
}
