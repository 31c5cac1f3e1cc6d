//! Topic models and term weighting schemes that feed keyword scoring.
//!
//! Scoring only depends on the two traits below, so any library producing
//! the same shapes can be plugged in.

pub mod lda;
pub mod mallet;
pub mod tfidf;

pub use lda::GibbsLda;
pub use mallet::MalletLda;
pub use tfidf::TfIdf;

use crate::dictionary::{TermId, Vocabulary};
use crate::topics::{DocumentTopics, Topic};
use crate::{Result, SparseCorpus};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicParams {
    pub num_topics: usize,
    /// Terms reported per topic.
    pub num_words: usize,
    pub iterations: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FittedTopics {
    pub topics: Vec<Topic>,
    /// One distribution per corpus document, in corpus order.
    pub doc_topics: Vec<DocumentTopics>,
}

pub trait TopicModel {
    fn fit(&self, corpus: &SparseCorpus, vocab: &Vocabulary, params: &TopicParams) -> Result<FittedTopics>;
}

pub trait TermWeighting {
    /// Per-document (term id, weight) pairs, in corpus order.
    fn weigh(&self, corpus: &SparseCorpus) -> Vec<Vec<(TermId, f64)>>;
}
