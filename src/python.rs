//! Python bindings (feature `python`).

use std::collections::BTreeMap;

use pyo3::exceptions::{PyKeyError, PyOSError, PyValueError};
use pyo3::prelude::*;

use crate::config::{
    LearnConfig, DEFAULT_MIN_BIPARSE_ENTROPY, DEFAULT_MIN_NUM_STEMS, DEFAULT_MIN_ROBUSTNESS,
    DEFAULT_MIN_STEM_LEN, DEFAULT_NUM_SEED_FAMILIES,
};
use crate::entropy::entropy;
use crate::error::CrabError;
use crate::family::Family;
use crate::morphology::Morphology;
use crate::report;
use crate::signature::Signature;
use crate::types::Side;

impl From<CrabError> for PyErr {
    fn from(err: CrabError) -> Self {
        match err {
            CrabError::Io { .. } | CrabError::Decode { .. } => PyOSError::new_err(err.to_string()),
            CrabError::SignatureNotFound { .. } => PyKeyError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

fn parse_side(side: &str) -> PyResult<Side> {
    Ok(side.parse::<Side>()?)
}

#[allow(clippy::too_many_arguments)]
fn learn_config(
    lowercase: bool,
    min_stem_len: usize,
    min_num_stems: usize,
    num_seed_families: usize,
    min_robustness: usize,
    min_biparse_entropy: f64,
    side: Option<&str>,
    tokenization_regex: Option<String>,
) -> PyResult<LearnConfig> {
    let defaults = LearnConfig::default();
    let config = LearnConfig {
        tokenization_regex: tokenization_regex.unwrap_or_else(|| defaults.tokenization_regex.clone()),
        lowercase,
        min_stem_len,
        min_num_stems,
        num_seed_families,
        min_robustness,
        min_biparse_entropy,
        ..defaults
    };
    Ok(match side {
        Some(side) => config.with_side(parse_side(side)?),
        None => config,
    })
}

// ============================================================================
// FREE FUNCTIONS
// ============================================================================

#[pyfunction]
#[pyo3(name = "entropy")]
fn py_entropy(counts: Vec<usize>) -> f64 {
    entropy(counts)
}

#[pyfunction]
#[pyo3(name = "robustness")]
fn py_robustness(stems: Vec<String>, affixes: Vec<String>) -> usize {
    Signature::from_lists(stems, affixes, Side::Suffix).robustness()
}

// ============================================================================
// PYTHON WRAPPER TYPES
// ============================================================================

#[pyclass(name = "Signature")]
struct PySignature {
    #[pyo3(get)]
    affix_string: String,
    #[pyo3(get)]
    stems: BTreeMap<String, usize>,
    #[pyo3(get)]
    affixes: BTreeMap<String, usize>,
    #[pyo3(get)]
    robustness: usize,
    #[pyo3(get)]
    edge_entropy: Option<f64>,
}

impl From<&Signature> for PySignature {
    fn from(sig: &Signature) -> Self {
        Self {
            affix_string: sig.affix_string().to_string(),
            stems: sig.stems().iter().map(|(s, &n)| (s.to_string(), n)).collect(),
            affixes: sig.affixes().iter().map(|(a, &n)| (a.to_string(), n)).collect(),
            robustness: sig.robustness(),
            edge_entropy: sig.edge_entropy(),
        }
    }
}

#[pyclass(name = "Family")]
struct PyFamily {
    #[pyo3(get)]
    nucleus: String,
    #[pyo3(get)]
    children: Vec<String>,
}

impl From<&Family> for PyFamily {
    fn from(family: &Family) -> Self {
        Self {
            nucleus: family.nucleus().to_string(),
            children: family.children().iter().cloned().collect(),
        }
    }
}

#[pyclass(name = "Morphology")]
struct PyMorphology {
    inner: Morphology,
}

#[pymethods]
impl PyMorphology {
    #[new]
    fn new() -> Self {
        Self {
            inner: Morphology::new(),
        }
    }

    #[pyo3(signature = (
        text,
        lowercase = true,
        min_stem_len = DEFAULT_MIN_STEM_LEN,
        min_num_stems = DEFAULT_MIN_NUM_STEMS,
        num_seed_families = DEFAULT_NUM_SEED_FAMILIES,
        min_robustness = DEFAULT_MIN_ROBUSTNESS,
        min_biparse_entropy = DEFAULT_MIN_BIPARSE_ENTROPY,
        side = None,
        tokenization_regex = None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn learn_from_string(
        &mut self,
        text: &str,
        lowercase: bool,
        min_stem_len: usize,
        min_num_stems: usize,
        num_seed_families: usize,
        min_robustness: usize,
        min_biparse_entropy: f64,
        side: Option<&str>,
        tokenization_regex: Option<String>,
    ) -> PyResult<()> {
        let config = learn_config(
            lowercase,
            min_stem_len,
            min_num_stems,
            num_seed_families,
            min_robustness,
            min_biparse_entropy,
            side,
            tokenization_regex,
        )?;
        Ok(self.inner.learn_from_string(text, &config)?)
    }

    #[pyo3(signature = (
        words,
        lowercase = true,
        min_stem_len = DEFAULT_MIN_STEM_LEN,
        min_num_stems = DEFAULT_MIN_NUM_STEMS,
        num_seed_families = DEFAULT_NUM_SEED_FAMILIES,
        min_robustness = DEFAULT_MIN_ROBUSTNESS,
        min_biparse_entropy = DEFAULT_MIN_BIPARSE_ENTROPY,
        side = None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn learn_from_wordlist(
        &mut self,
        words: Vec<String>,
        lowercase: bool,
        min_stem_len: usize,
        min_num_stems: usize,
        num_seed_families: usize,
        min_robustness: usize,
        min_biparse_entropy: f64,
        side: Option<&str>,
    ) -> PyResult<()> {
        let config = learn_config(
            lowercase,
            min_stem_len,
            min_num_stems,
            num_seed_families,
            min_robustness,
            min_biparse_entropy,
            side,
            None,
        )?;
        Ok(self.inner.learn_from_wordlist(words, &config)?)
    }

    #[pyo3(signature = (
        path,
        encoding = "utf-8",
        lowercase = true,
        min_stem_len = DEFAULT_MIN_STEM_LEN,
        min_num_stems = DEFAULT_MIN_NUM_STEMS,
        num_seed_families = DEFAULT_NUM_SEED_FAMILIES,
        min_robustness = DEFAULT_MIN_ROBUSTNESS,
        min_biparse_entropy = DEFAULT_MIN_BIPARSE_ENTROPY,
        side = None,
        tokenization_regex = None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn learn_from_file(
        &mut self,
        path: &str,
        encoding: &str,
        lowercase: bool,
        min_stem_len: usize,
        min_num_stems: usize,
        num_seed_families: usize,
        min_robustness: usize,
        min_biparse_entropy: f64,
        side: Option<&str>,
        tokenization_regex: Option<String>,
    ) -> PyResult<()> {
        let config = learn_config(
            lowercase,
            min_stem_len,
            min_num_stems,
            num_seed_families,
            min_robustness,
            min_biparse_entropy,
            side,
            tokenization_regex,
        )?;
        Ok(self.inner.learn_from_file(path, encoding, &config)?)
    }

    #[pyo3(signature = (side = "suffix"))]
    fn signatures(&self, side: &str) -> PyResult<Vec<PySignature>> {
        let side = parse_side(side)?;
        Ok(self
            .inner
            .get_signatures(side)
            .into_iter()
            .map(PySignature::from)
            .collect())
    }

    fn signature(&self, affix_string: &str, side: &str) -> PyResult<PySignature> {
        let side = parse_side(side)?;
        Ok(PySignature::from(self.inner.get_signature(affix_string, side)?))
    }

    #[pyo3(signature = (side = "suffix"))]
    fn families(&self, side: &str) -> PyResult<Vec<PyFamily>> {
        let side = parse_side(side)?;
        Ok(self.inner.get_families(side).iter().map(PyFamily::from).collect())
    }

    #[pyo3(signature = (side = "suffix"))]
    fn protostems(&self, side: &str) -> PyResult<BTreeMap<String, Vec<String>>> {
        let side = parse_side(side)?;
        Ok(self
            .inner
            .get_protostems(side)
            .iter()
            .map(|(stem, conts)| (stem.clone(), conts.iter().map(ToString::to_string).collect()))
            .collect())
    }

    /// `(pass, parses)` pairs recorded for `word`.
    #[pyo3(signature = (word, side = "suffix"))]
    fn biography(&self, word: &str, side: &str) -> PyResult<Vec<(String, Vec<String>)>> {
        let side = parse_side(side)?;
        Ok(self
            .inner
            .get_biography(word, side)
            .into_iter()
            .map(|entry| {
                (
                    entry.pass.name().to_string(),
                    entry.parses.iter().map(ToString::to_string).collect(),
                )
            })
            .collect())
    }

    #[pyo3(signature = (side = "suffix"))]
    fn shadow_signatures(&self, side: &str) -> PyResult<Vec<String>> {
        let side = parse_side(side)?;
        Ok(self.inner.get_shadow_signatures(side).into_iter().collect())
    }

    #[pyo3(signature = (side = "suffix"))]
    fn to_json(&self, side: &str) -> PyResult<String> {
        let side = parse_side(side)?;
        Ok(report::to_json(&self.inner, side)?)
    }
}

// ============================================================================
// MODULE DEFINITION
// ============================================================================

#[pymodule]
fn crab_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_entropy, m)?)?;
    m.add_function(wrap_pyfunction!(py_robustness, m)?)?;

    m.add_class::<PyMorphology>()?;
    m.add_class::<PySignature>()?;
    m.add_class::<PyFamily>()?;

    Ok(())
}
