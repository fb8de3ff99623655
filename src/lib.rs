//! Crab core: unsupervised morphological segmentation.
//!
//! Learns signatures (sets of stems sharing one set of affixes) from a word
//! list, through a fixed sequence of passes per affix side:
//! - `find_signatures1`: protostems from adjacent sorted words
//! - `widen_signatures`: leftover protostems joining contained signatures
//! - `split_affixes`: compound affixes split through biparses
//! - families grouped around the most robust signatures
//!
//! Every pass records what it concluded about each word in that word's
//! biography. Python bindings are available with the `python` feature.

pub mod config;
pub mod discovery;
pub mod entropy;
pub mod error;
pub mod family;
pub mod graph;
pub mod lexicon;
pub mod morpheme;
pub mod morphology;
pub mod report;
pub mod signature;
pub mod split;
pub mod text;
pub mod types;
pub mod widen;

#[cfg(feature = "python")]
mod python;

pub use config::{InputEncoding, LearnConfig};
pub use error::{CrabError, CrabResult};
pub use family::Family;
pub use lexicon::{BiographyEntry, Lexicon, Note, Word};
pub use morpheme::{Morpheme, AFFIX_DELIMITER, AFFIX_INDEX_DELIMITER, NULL_DISPLAY};
pub use morphology::{Morphology, SideAnalysis};
pub use report::{to_json, Report, ReportKind};
pub use signature::Signature;
pub use types::{Bigram, Parse, Pass, Side};
