use crate::config::PruneThresholds;
use crate::corpus::SparseVector;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::collections::{BTreeMap, HashMap, HashSet};

pub type TermId = u32;

/// Bidirectional term <-> id mapping with document statistics.
///
/// Ids are dense in `0..len()` and follow first-encounter order across the
/// token stream; pruning keeps that relative order when compacting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    token2id: HashMap<String, TermId>,
    id2token: Vec<String>,
    /// Number of documents containing each term.
    dfs: Vec<u32>,
    /// Number of occurrences of each term over the whole stream.
    cfs: Vec<u64>,
    num_docs: u32,
    num_pos: u64,
    num_nnz: u64,
}

impl Vocabulary {
    pub fn new() -> Self { Self::default() }

    /// Builds a vocabulary from one token stream per document.
    pub fn from_documents<D, T>(docs: D) -> Self
    where
        D: IntoIterator<Item = T>,
        T: IntoIterator<Item = String>,
    {
        let mut vocab = Self::new();
        for tokens in docs {
            vocab.add_document(tokens);
        }
        vocab
    }

    pub fn add_document<T: IntoIterator<Item = String>>(&mut self, tokens: T) {
        let mut seen_in_doc: HashSet<TermId> = HashSet::new();
        for term in tokens {
            let tid = match self.token2id.get(&term) {
                Some(&tid) => tid,
                None => {
                    let tid = self.id2token.len() as TermId;
                    self.id2token.push(term.clone());
                    self.token2id.insert(term, tid);
                    self.dfs.push(0);
                    self.cfs.push(0);
                    tid
                }
            };
            self.cfs[tid as usize] += 1;
            self.num_pos += 1;
            if seen_in_doc.insert(tid) {
                self.dfs[tid as usize] += 1;
            }
        }
        self.num_docs += 1;
        self.num_nnz += seen_in_doc.len() as u64;
    }

    /// Drops terms whose document frequency is below `no_below` or above
    /// `no_above * num_docs`, then keeps the `keep_n` most frequent, then
    /// compacts ids. Returns the number of removed terms.
    pub fn filter_extremes(&mut self, thresholds: PruneThresholds) -> usize {
        let max_df = thresholds.no_above * self.num_docs as f64;
        let mut good: Vec<TermId> = (0..self.id2token.len() as TermId)
            .filter(|&tid| {
                let df = self.dfs[tid as usize];
                df >= thresholds.no_below && df as f64 <= max_df
            })
            .collect();
        if good.len() > thresholds.keep_n {
            // stable: equal frequencies keep first-encounter order
            good.sort_by(|a, b| self.dfs[*b as usize].cmp(&self.dfs[*a as usize]));
            good.truncate(thresholds.keep_n);
            good.sort_unstable();
        }
        let removed = self.id2token.len() - good.len();
        self.retain_ids(&good);
        tracing::debug!(removed, kept = self.len(), ?thresholds, "filtered vocabulary extremes");
        removed
    }

    /// Keeps only `ids` (ascending) and reassigns ids without gaps.
    fn retain_ids(&mut self, ids: &[TermId]) {
        let mut id2token = Vec::with_capacity(ids.len());
        let mut dfs = Vec::with_capacity(ids.len());
        let mut cfs = Vec::with_capacity(ids.len());
        for &old in ids {
            id2token.push(std::mem::take(&mut self.id2token[old as usize]));
            dfs.push(self.dfs[old as usize]);
            cfs.push(self.cfs[old as usize]);
        }
        self.token2id = id2token
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as TermId))
            .collect();
        self.id2token = id2token;
        self.dfs = dfs;
        self.cfs = cfs;
    }

    /// Counts the known tokens of one document; unknown tokens are dropped.
    pub fn doc2bow<T: IntoIterator<Item = String>>(&self, tokens: T) -> SparseVector {
        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
        for term in tokens {
            if let Some(&tid) = self.token2id.get(&term) {
                *counts.entry(tid).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }

    pub fn id(&self, term: &str) -> Option<TermId> { self.token2id.get(term).copied() }

    pub fn term(&self, id: TermId) -> Option<&str> { self.id2token.get(id as usize).map(String::as_str) }

    pub fn doc_freq(&self, id: TermId) -> u32 { self.dfs.get(id as usize).copied().unwrap_or(0) }

    pub fn collection_freq(&self, id: TermId) -> u64 { self.cfs.get(id as usize).copied().unwrap_or(0) }

    pub fn len(&self) -> usize { self.id2token.len() }

    pub fn is_empty(&self) -> bool { self.id2token.is_empty() }

    pub fn num_docs(&self) -> u32 { self.num_docs }

    pub fn num_pos(&self) -> u64 { self.num_pos }

    pub fn num_nnz(&self) -> u64 { self.num_nnz }

    /// Terms in id order.
    pub fn terms(&self) -> impl Iterator<Item = (TermId, &str)> {
        self.id2token.iter().enumerate().map(|(i, t)| (i as TermId, t.as_str()))
    }

    /// SHA-1 over the id-ordered terms and their document frequencies. A
    /// corpus records this value to prove which vocabulary it was built from.
    pub fn checksum(&self) -> String {
        let mut hasher = Sha1::new();
        for (term, df) in self.id2token.iter().zip(&self.dfs) {
            hasher.update(term.as_bytes());
            hasher.update([0u8]);
            hasher.update(df.to_le_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}
