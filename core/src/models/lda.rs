use super::{FittedTopics, TopicModel, TopicParams};
use crate::dictionary::{TermId, Vocabulary};
use crate::topics::Topic;
use crate::{KwgError, Result, SparseCorpus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Latent Dirichlet allocation trained by collapsed Gibbs sampling with
/// symmetric priors.
#[derive(Debug, Clone, Copy)]
pub struct GibbsLda {
    /// Document-topic concentration.
    pub alpha: f64,
    /// Topic-word concentration.
    pub beta: f64,
}

impl Default for GibbsLda {
    fn default() -> Self { Self { alpha: 0.1, beta: 0.01 } }
}

struct Counts {
    doc_topic: Vec<Vec<u32>>,
    topic_word: Vec<Vec<u32>>,
    topic_total: Vec<u32>,
}

impl Counts {
    fn new(num_docs: usize, num_topics: usize, num_words: usize) -> Self {
        Self {
            doc_topic: vec![vec![0; num_topics]; num_docs],
            topic_word: vec![vec![0; num_words]; num_topics],
            topic_total: vec![0; num_topics],
        }
    }

    fn add(&mut self, d: usize, t: usize, w: usize) {
        self.doc_topic[d][t] += 1;
        self.topic_word[t][w] += 1;
        self.topic_total[t] += 1;
    }

    fn remove(&mut self, d: usize, t: usize, w: usize) {
        self.doc_topic[d][t] -= 1;
        self.topic_word[t][w] -= 1;
        self.topic_total[t] -= 1;
    }
}

impl TopicModel for GibbsLda {
    fn fit(&self, corpus: &SparseCorpus, vocab: &Vocabulary, params: &TopicParams) -> Result<FittedTopics> {
        let num_topics = params.num_topics;
        if num_topics == 0 {
            return Err(KwgError::ExternalModel { reason: "number of topics must be positive".into() });
        }
        corpus.check_vocabulary(vocab)?;
        let num_words = vocab.len();
        let v_beta = num_words as f64 * self.beta;

        // one entry per token occurrence
        let docs: Vec<Vec<usize>> = corpus
            .vectors()
            .iter()
            .map(|bow| {
                bow.iter()
                    .flat_map(|(tid, count)| std::iter::repeat(*tid as usize).take(*count as usize))
                    .collect()
            })
            .collect();

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut counts = Counts::new(docs.len(), num_topics, num_words);
        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(docs.len());
        for (d, words) in docs.iter().enumerate() {
            let z: Vec<usize> = words.iter().map(|_| rng.gen_range(0..num_topics)).collect();
            for (&w, &t) in words.iter().zip(&z) {
                counts.add(d, t, w);
            }
            assignments.push(z);
        }

        let mut p = vec![0.0f64; num_topics];
        for _ in 0..params.iterations {
            for (d, words) in docs.iter().enumerate() {
                for (i, &w) in words.iter().enumerate() {
                    let old = assignments[d][i];
                    counts.remove(d, old, w);
                    let mut total = 0.0;
                    for (t, slot) in p.iter_mut().enumerate() {
                        total += (counts.doc_topic[d][t] as f64 + self.alpha)
                            * (counts.topic_word[t][w] as f64 + self.beta)
                            / (counts.topic_total[t] as f64 + v_beta);
                        *slot = total;
                    }
                    let u = rng.gen::<f64>() * total;
                    let new = p.iter().position(|&c| u < c).unwrap_or(num_topics - 1);
                    counts.add(d, new, w);
                    assignments[d][i] = new;
                }
            }
        }

        let topics = (0..num_topics)
            .map(|t| {
                let denom = counts.topic_total[t] as f64 + v_beta;
                let mut phi: Vec<(usize, f64)> = counts.topic_word[t]
                    .iter()
                    .enumerate()
                    .map(|(w, &n)| (w, (n as f64 + self.beta) / denom))
                    .collect();
                phi.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                let terms = phi
                    .into_iter()
                    .take(params.num_words)
                    .filter_map(|(w, weight)| vocab.term(w as TermId).map(|term| (term.to_string(), weight)))
                    .collect();
                Topic::new(terms)
            })
            .collect();

        let t_alpha = num_topics as f64 * self.alpha;
        let doc_topics = docs
            .iter()
            .enumerate()
            .map(|(d, words)| {
                let denom = words.len() as f64 + t_alpha;
                (0..num_topics)
                    .map(|t| (t, (counts.doc_topic[d][t] as f64 + self.alpha) / denom))
                    .collect()
            })
            .collect();

        tracing::info!(num_topics, num_docs = docs.len(), iterations = params.iterations, "lda model trained");
        Ok(FittedTopics { topics, doc_topics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Vocabulary, SparseCorpus) {
        let texts = [
            "apple banana apple banana fruit",
            "banana apple fruit apple",
            "engine wheel engine car",
            "car wheel engine wheel",
        ];
        let docs: Vec<Vec<String>> = texts.iter().map(|d| d.split_whitespace().map(String::from).collect()).collect();
        let vocab = Vocabulary::from_documents(docs.clone());
        let vectors = docs.into_iter().map(|d| vocab.doc2bow(d)).collect();
        let corpus = SparseCorpus::from_vectors(vectors, &vocab);
        (vocab, corpus)
    }

    fn params() -> TopicParams { TopicParams { num_topics: 2, num_words: 3, iterations: 200, seed: 7 } }

    #[test]
    fn shapes_and_distributions() {
        let (vocab, corpus) = fixture();
        let fitted = GibbsLda::default().fit(&corpus, &vocab, &params()).unwrap();
        assert_eq!(fitted.topics.len(), 2);
        for topic in &fitted.topics {
            assert_eq!(topic.terms.len(), 3);
            assert!(topic.terms.windows(2).all(|w| w[0].1 >= w[1].1));
            assert!(topic.terms.iter().all(|(_, w)| *w > 0.0 && *w <= 1.0));
        }
        assert_eq!(fitted.doc_topics.len(), 4);
        for dist in &fitted.doc_topics {
            let sum: f64 = dist.iter().map(|(_, p)| p).sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn same_seed_same_topics() {
        let (vocab, corpus) = fixture();
        let a = GibbsLda::default().fit(&corpus, &vocab, &params()).unwrap();
        let b = GibbsLda::default().fit(&corpus, &vocab, &params()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_topics_is_an_error() {
        let (vocab, corpus) = fixture();
        let p = TopicParams { num_topics: 0, ..params() };
        assert!(GibbsLda::default().fit(&corpus, &vocab, &p).is_err());
    }

    #[test]
    fn ids_beyond_vocabulary_are_rejected() {
        let (vocab, _) = fixture();
        let corpus = SparseCorpus::from_vectors(vec![vec![(0, 1), (99, 2)]], &vocab);
        let err = GibbsLda::default().fit(&corpus, &vocab, &params()).unwrap_err();
        assert!(matches!(err, KwgError::VocabularyCorpusMismatch { .. }));
    }
}
