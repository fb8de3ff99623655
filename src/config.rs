//! Learning parameters and input decoding.

use std::path::Path;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CrabError, CrabResult};
use crate::types::Side;

pub const DEFAULT_MIN_STEM_LEN: usize = 4;
pub const DEFAULT_MIN_NUM_STEMS: usize = 2;
pub const DEFAULT_NUM_SEED_FAMILIES: usize = 10;
pub const DEFAULT_MIN_ROBUSTNESS: usize = 20;
pub const DEFAULT_MIN_BIPARSE_ENTROPY: f64 = 1.0;
/// Runs of word characters.
pub const DEFAULT_TOKENIZATION_REGEX: &str = r"\w+";

/// Parameters shared by every `learn_from_*` entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnConfig {
    /// Pattern whose matches are the tokens of running text.
    pub tokenization_regex: String,
    pub lowercase: bool,
    pub min_stem_len: usize,
    pub min_num_stems: usize,
    pub num_seed_families: usize,
    /// Robustness a signature needs to join a family.
    pub min_robustness: usize,
    /// Edge entropy the long-stem signature of a biparse must reach.
    pub min_biparse_entropy: f64,
    /// Analyses to run, in order.
    pub sides: Vec<Side>,
}

impl Default for LearnConfig {
    fn default() -> Self {
        Self {
            tokenization_regex: DEFAULT_TOKENIZATION_REGEX.to_string(),
            lowercase: true,
            min_stem_len: DEFAULT_MIN_STEM_LEN,
            min_num_stems: DEFAULT_MIN_NUM_STEMS,
            num_seed_families: DEFAULT_NUM_SEED_FAMILIES,
            min_robustness: DEFAULT_MIN_ROBUSTNESS,
            min_biparse_entropy: DEFAULT_MIN_BIPARSE_ENTROPY,
            sides: Side::ALL.to_vec(),
        }
    }
}

impl LearnConfig {
    /// Same parameters, restricted to one side.
    pub fn with_side(mut self, side: Side) -> Self {
        self.sides = vec![side];
        self
    }

    pub fn tokenizer(&self) -> CrabResult<Regex> {
        Ok(Regex::new(&self.tokenization_regex)?)
    }

    pub fn validate(&self) -> CrabResult<()> {
        self.tokenizer()?;
        if self.min_stem_len == 0 {
            return Err(CrabError::InvalidConfig(
                "min_stem_len must be at least 1".into(),
            ));
        }
        if self.min_num_stems == 0 {
            return Err(CrabError::InvalidConfig(
                "min_num_stems must be at least 1".into(),
            ));
        }
        if self.sides.is_empty() {
            return Err(CrabError::InvalidConfig("no affix side selected".into()));
        }
        if !self.min_biparse_entropy.is_finite() || self.min_biparse_entropy < 0.0 {
            return Err(CrabError::InvalidConfig(format!(
                "min_biparse_entropy must be a non-negative number, got {}",
                self.min_biparse_entropy
            )));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> CrabResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> CrabResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CrabError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

/// Text encodings accepted for input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEncoding {
    Utf8,
    Latin1,
}

impl InputEncoding {
    pub fn name(self) -> &'static str {
        match self {
            InputEncoding::Utf8 => "utf-8",
            InputEncoding::Latin1 => "latin-1",
        }
    }

    pub fn decode(self, bytes: Vec<u8>, path: &Path) -> CrabResult<String> {
        match self {
            InputEncoding::Utf8 => String::from_utf8(bytes).map_err(|_| CrabError::Decode {
                path: path.to_path_buf(),
                encoding: self.name().to_string(),
            }),
            InputEncoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }
}

impl FromStr for InputEncoding {
    type Err = CrabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf8" | "utf-8" => Ok(InputEncoding::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(InputEncoding::Latin1),
            _ => Err(CrabError::UnsupportedEncoding(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LearnConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sides, vec![Side::Suffix, Side::Prefix]);
    }

    #[test]
    fn test_rejects_zero_stem_length() {
        let config = LearnConfig {
            min_stem_len: 0,
            ..LearnConfig::default()
        };
        assert!(matches!(config.validate(), Err(CrabError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_tokenization_regex() {
        let config = LearnConfig {
            tokenization_regex: "[a-z".into(),
            ..LearnConfig::default()
        };
        assert!(matches!(config.validate(), Err(CrabError::Tokenizer(_))));
        assert!(LearnConfig::default().tokenizer().unwrap().is_match("word"));
    }

    #[test]
    fn test_partial_json() {
        let config = LearnConfig::from_json_str(r#"{"min_stem_len": 3, "sides": ["prefix"]}"#).unwrap();
        assert_eq!(config.min_stem_len, 3);
        assert_eq!(config.sides, vec![Side::Prefix]);
        assert_eq!(config.min_num_stems, DEFAULT_MIN_NUM_STEMS);
        assert_eq!(config.tokenization_regex, DEFAULT_TOKENIZATION_REGEX);
    }

    #[test]
    fn test_json_validation() {
        assert!(LearnConfig::from_json_str(r#"{"sides": []}"#).is_err());
        assert!(matches!(
            LearnConfig::from_json_str("{"),
            Err(CrabError::Json(_))
        ));
    }

    #[test]
    fn test_encodings() {
        assert_eq!("UTF8".parse::<InputEncoding>().unwrap(), InputEncoding::Utf8);
        assert_eq!("iso_8859_1".parse::<InputEncoding>().unwrap(), InputEncoding::Latin1);
        assert!(matches!(
            "cp1252".parse::<InputEncoding>(),
            Err(CrabError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_latin1_decoding() {
        let text = InputEncoding::Latin1
            .decode(vec![0x63, 0x61, 0x66, 0xE9], Path::new("x"))
            .unwrap();
        assert_eq!(text, "café");
        assert!(InputEncoding::Utf8.decode(vec![0xE9], Path::new("x")).is_err());
    }
}
