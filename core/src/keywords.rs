use crate::dictionary::{TermId, Vocabulary};
use crate::topics::Topic;
use crate::{KwgError, Result, SparseCorpus};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub term: String,
    pub score: f64,
}

/// Per-term score sums that remember the order terms were first seen in.
#[derive(Default)]
struct Accumulator {
    index: HashMap<String, usize>,
    entries: Vec<Keyword>,
}

impl Accumulator {
    fn add(&mut self, term: &str, weight: f64) {
        match self.index.get(term) {
            Some(&i) => self.entries[i].score += weight,
            None => {
                self.index.insert(term.to_string(), self.entries.len());
                self.entries.push(Keyword { term: term.to_string(), score: weight });
            }
        }
    }

    /// Highest `k` scores; equal scores keep first-seen order.
    fn top_k(self, k: usize) -> Vec<Keyword> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        entries.truncate(k);
        entries
    }
}

/// Topic-based keywords: the summed topic weight of each term, multiplied
/// by the natural log of the term's total count in the corpus.
pub fn score_topics(corpus: &SparseCorpus, vocab: &Vocabulary, topics: &[Topic], k: usize) -> Result<Vec<Keyword>> {
    corpus.check_vocabulary(vocab)?;
    let mut acc = Accumulator::default();
    for topic in topics {
        for (term, weight) in &topic.terms {
            acc.add(term, *weight);
        }
    }

    let frequencies = corpus.term_frequencies();
    for entry in acc.entries.iter_mut() {
        let tid = vocab.id(&entry.term).ok_or_else(|| KwgError::UnknownTerm { term: entry.term.clone() })?;
        let frequency = frequencies[tid as usize];
        if frequency == 0 {
            return Err(KwgError::ScoreComputation { term: entry.term.clone(), frequency });
        }
        entry.score *= (frequency as f64).ln();
    }

    let keywords = acc.top_k(k);
    tracing::info!(num_topics = topics.len(), num_keywords = keywords.len(), "keywords generated from topics");
    Ok(keywords)
}

/// Term-weight keywords: each term's weights summed over all documents.
pub fn score_term_weights(weights: &[Vec<(TermId, f64)>], vocab: &Vocabulary, k: usize) -> Result<Vec<Keyword>> {
    let mut acc = Accumulator::default();
    for doc in weights {
        for (tid, weight) in doc {
            let term = vocab.term(*tid).ok_or_else(|| KwgError::UnknownTerm { term: format!("#{tid}") })?;
            acc.add(term, *weight);
        }
    }
    let keywords = acc.top_k(k);
    tracing::info!(num_docs = weights.len(), num_keywords = keywords.len(), "keywords generated from term weights");
    Ok(keywords)
}
