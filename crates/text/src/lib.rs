//! Text processing for the docqa pipeline
//!
//! Features:
//! - Unicode-aware tokenization
//! - Sliding-window document splitting with stable chunk ids
//! - Owned-corpus BM25 lexical index

pub mod bm25;
pub mod splitter;
pub mod tokenize;

pub use bm25::{Bm25Config, Bm25Index};
pub use splitter::{SplitterConfig, TextSplitter};
pub use tokenize::{terms, tokenize};

use thiserror::Error;

/// Text processing errors
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Invalid splitter configuration: {0}")]
    InvalidConfig(String),
}

impl From<TextError> for docqa_core::Error {
    fn from(err: TextError) -> Self {
        docqa_core::Error::Text(err.to_string())
    }
}
