use crate::dictionary::{TermId, Vocabulary};
use crate::loader::StopWords;
use crate::tokenizer::tokenize;
use crate::{KwgError, Result};
use serde::{Deserialize, Serialize};

/// (term id, count) pairs of one document, ascending by term id.
pub type SparseVector = Vec<(TermId, u32)>;

/// Bag-of-words vectors, indexed like the documents they came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseCorpus {
    vectors: Vec<SparseVector>,
    num_terms: usize,
    /// Checksum of the vocabulary the vectors were built against.
    vocabulary_checksum: String,
}

impl SparseCorpus {
    /// Re-tokenizes every document and maps it through the fixed vocabulary.
    pub fn build<S: AsRef<str>>(docs: &[S], vocab: &Vocabulary, stop_words: &StopWords) -> Self {
        let vectors = docs
            .iter()
            .map(|doc| vocab.doc2bow(tokenize(doc.as_ref(), stop_words)))
            .collect();
        Self::from_vectors(vectors, vocab)
    }

    pub fn from_vectors(vectors: Vec<SparseVector>, vocab: &Vocabulary) -> Self {
        Self { vectors, num_terms: vocab.len(), vocabulary_checksum: vocab.checksum() }
    }

    /// Fails with `VocabularyCorpusMismatch` unless this corpus was built from `vocab`.
    pub fn check_vocabulary(&self, vocab: &Vocabulary) -> Result<()> {
        let expected = vocab.checksum();
        if self.vocabulary_checksum != expected || self.num_terms != vocab.len() {
            return Err(KwgError::VocabularyCorpusMismatch { expected, found: self.vocabulary_checksum.clone() });
        }
        let out_of_range = self
            .vectors
            .iter()
            .flatten()
            .any(|(tid, _)| *tid as usize >= self.num_terms);
        if out_of_range {
            return Err(KwgError::VocabularyCorpusMismatch { expected, found: format!("{} (term id out of range)", self.vocabulary_checksum) });
        }
        Ok(())
    }

    /// Total count of every term over all documents (column sums).
    pub fn term_frequencies(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.num_terms];
        for (tid, count) in self.vectors.iter().flatten() {
            if let Some(t) = totals.get_mut(*tid as usize) {
                *t += *count as u64;
            }
        }
        totals
    }

    pub fn vectors(&self) -> &[SparseVector] { &self.vectors }

    pub fn num_terms(&self) -> usize { self.num_terms }

    pub fn num_nnz(&self) -> usize { self.vectors.iter().map(Vec::len).sum() }

    pub fn vocabulary_checksum(&self) -> &str { &self.vocabulary_checksum }

    pub fn len(&self) -> usize { self.vectors.len() }

    pub fn is_empty(&self) -> bool { self.vectors.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PruneThresholds;

    fn pruned_vocab(docs: &[&str], stop: &StopWords) -> Vocabulary {
        let mut v = Vocabulary::from_documents(docs.iter().map(|d| tokenize(d, stop)));
        v.filter_extremes(PruneThresholds { no_below: 2, no_above: 1.0, keep_n: 100 });
        v
    }

    #[test]
    fn pruned_terms_contribute_nothing() {
        let stop: StopWords = ["the".to_string()].into_iter().collect();
        let docs = ["The cat sat", "the cat ran", "a dog sat"];
        let vocab = pruned_vocab(&docs, &stop);
        assert_eq!(vocab.len(), 2);
        let corpus = SparseCorpus::build(&docs, &vocab, &stop);
        let cat = vocab.id("cat").unwrap();
        let sat = vocab.id("sat").unwrap();
        assert_eq!(corpus.vectors()[0], vec![(cat, 1), (sat, 1)]);
        assert_eq!(corpus.vectors()[1], vec![(cat, 1)]);
        assert_eq!(corpus.vectors()[2], vec![(sat, 1)]);
        assert_eq!(corpus.num_nnz(), 4);
    }

    #[test]
    fn column_sums() {
        let stop = StopWords::new();
        let docs = ["x x y", "x y y y"];
        let vocab = pruned_vocab(&docs, &stop);
        let corpus = SparseCorpus::build(&docs, &vocab, &stop);
        let freqs = corpus.term_frequencies();
        assert_eq!(freqs[vocab.id("x").unwrap() as usize], 3);
        assert_eq!(freqs[vocab.id("y").unwrap() as usize], 4);
    }

    #[test]
    fn foreign_vocabulary_is_rejected() {
        let stop = StopWords::new();
        let docs = ["x y", "x y z", "z q q"];
        let vocab = pruned_vocab(&docs, &stop);
        let corpus = SparseCorpus::build(&docs, &vocab, &stop);
        assert!(corpus.check_vocabulary(&vocab).is_ok());
        let other = Vocabulary::from_documents(vec![vec!["x".to_string()]]);
        assert!(matches!(corpus.check_vocabulary(&other), Err(KwgError::VocabularyCorpusMismatch { .. })));
    }

    #[test]
    fn empty_documents_build_empty_corpus() {
        let stop = StopWords::new();
        let docs: [&str; 0] = [];
        let vocab = pruned_vocab(&docs, &stop);
        let corpus = SparseCorpus::build(&docs, &vocab, &stop);
        assert!(corpus.is_empty());
        assert!(corpus.term_frequencies().is_empty());
    }
}
