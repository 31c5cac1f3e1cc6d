//! Keyword extraction from a directory of plain-text documents.
//!
//! Documents and stop words are loaded from disk, tokenized into a pruned
//! vocabulary and a bag-of-words corpus, and ranked into keywords either from
//! topic model output or from summed term weights.

pub mod config;
pub mod corpus;
pub mod decode;
pub mod dictionary;
pub mod error;
pub mod export;
pub mod keywords;
pub mod loader;
pub mod models;
pub mod persist;
pub mod pipeline;
pub mod tokenizer;
pub mod topics;

pub use config::{FileFilter, PipelineConfig, PruneThresholds};
pub use corpus::{SparseCorpus, SparseVector};
pub use dictionary::{TermId, Vocabulary};
pub use error::{KwgError, Result};
pub use keywords::Keyword;
pub use topics::{DocumentTopics, Topic};
