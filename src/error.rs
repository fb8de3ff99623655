//! Error types shared by every learning pass and accessor.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Side;

#[derive(Debug, Error)]
pub enum CrabError {
    #[error("couldn't open file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file {} is not valid {encoding}", .path.display())]
    Decode { path: PathBuf, encoding: String },
    #[error("unsupported input encoding {0:?} (expected utf-8 or latin-1)")]
    UnsupportedEncoding(String),
    #[error("no {side} signature with affix string {key:?}")]
    SignatureNotFound { key: String, side: Side },
    #[error("stem {stem:?} is shorter than the requested edge length {length}")]
    StemTooShort { stem: String, length: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid tokenization regex: {0}")]
    Tokenizer(#[from] regex::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type CrabResult<T> = Result<T, CrabError>;
