use super::TermWeighting;
use crate::dictionary::TermId;
use crate::SparseCorpus;

/// tf * log2(N / df), L2-normalised per document.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdf {
    /// Use log2(1 + N / df) so that terms present in every document keep a weight.
    pub smoothed_idf: bool,
}

const EPSILON: f64 = 1e-12;

impl TfIdf {
    fn idf(&self, n: f64, df: f64) -> f64 {
        if self.smoothed_idf { (1.0 + n / df).log2() } else { (n / df).log2() }
    }
}

impl TermWeighting for TfIdf {
    fn weigh(&self, corpus: &SparseCorpus) -> Vec<Vec<(TermId, f64)>> {
        let mut df = vec![0u32; corpus.num_terms()];
        for (tid, _) in corpus.vectors().iter().flatten() {
            if let Some(d) = df.get_mut(*tid as usize) {
                *d += 1;
            }
        }
        let n = corpus.len().max(1) as f64;

        corpus
            .vectors()
            .iter()
            .map(|doc| {
                // ids beyond the vocabulary have no term to weigh
                let weights: Vec<(TermId, f64)> = doc
                    .iter()
                    .filter_map(|(tid, tf)| {
                        let df_t = (*df.get(*tid as usize)?).max(1) as f64;
                        Some((*tid, *tf as f64 * self.idf(n, df_t)))
                    })
                    .collect();
                let mut norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm == 0.0 { norm = 1.0; }
                weights
                    .into_iter()
                    .map(|(tid, w)| (tid, w / norm))
                    .filter(|(_, w)| w.abs() > EPSILON)
                    .collect()
            })
            .collect()
    }
}
