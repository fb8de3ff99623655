//! Shared data structures for the learning passes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CrabError;
use crate::morpheme::Morpheme;

/// Which end of the word affixes attach to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Suffix,
    Prefix,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Suffix, Side::Prefix];

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Suffix => "suffix",
            Side::Prefix => "prefix",
        }
    }

    /// Attach `affix` to `stem` on this side.
    pub fn join(self, stem: &str, affix: &str) -> String {
        match self {
            Side::Suffix => format!("{stem}{affix}"),
            Side::Prefix => format!("{affix}{stem}"),
        }
    }

    /// Surface word formed by a stem and an affix.
    pub fn combine(self, stem: &Morpheme, affix: &Morpheme) -> String {
        self.join(stem.surface(), affix.surface())
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = CrabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "suffix" | "suffixal" => Ok(Side::Suffix),
            "prefix" | "prefixal" => Ok(Side::Prefix),
            other => Err(CrabError::InvalidConfig(format!("unknown affix side {other:?}"))),
        }
    }
}

/// One analysed word: a stem paired with an affix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Bigram {
    pub stem: Morpheme,
    pub affix: Morpheme,
}

impl Bigram {
    pub fn new(stem: impl Into<Morpheme>, affix: impl Into<Morpheme>) -> Self {
        Self {
            stem: stem.into(),
            affix: affix.into(),
        }
    }

    /// Surface form of the analysed word.
    pub fn word(&self, side: Side) -> String {
        side.combine(&self.stem, &self.affix)
    }

    /// The pair in left-to-right order: (stem, affix) or (affix, stem).
    pub fn ordered(&self, side: Side) -> (&Morpheme, &Morpheme) {
        match side {
            Side::Suffix => (&self.stem, &self.affix),
            Side::Prefix => (&self.affix, &self.stem),
        }
    }

    pub fn stripped(&self) -> Self {
        Self {
            stem: self.stem.stripped(),
            affix: self.affix.stripped(),
        }
    }
}

/// Left-to-right morpheme decomposition of a word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Parse(Vec<Morpheme>);

impl Parse {
    pub fn new(morphemes: Vec<Morpheme>) -> Self {
        Self(morphemes)
    }

    pub fn morphemes(&self) -> &[Morpheme] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenation of all morphemes; equals the parsed word.
    pub fn surface(&self) -> String {
        self.0.iter().fold(String::new(), |word, m| word + m)
    }
}

impl fmt::Display for Parse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(" + "))
    }
}

/// Learning passes, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    FindSignatures1,
    WidenSignatures,
    SplitAffixes,
}

impl Pass {
    pub fn name(self) -> &'static str {
        match self {
            Pass::FindSignatures1 => "find_signatures1",
            Pass::WidenSignatures => "widen_signatures",
            Pass::SplitAffixes => "split_affixes",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
