use crate::config::{PipelineConfig, PruneThresholds};
use crate::loader::{load_documents, load_stop_words, LoadReport, StopWords};
use crate::persist::{load_snapshot, save_snapshot, ModelPaths, SnapshotMeta};
use crate::tokenizer::tokenize;
use crate::{Result, SparseCorpus, Vocabulary};

/// Vocabulary and corpus of one run, with what loading the sources reported.
#[derive(Debug)]
pub struct CorpusModel {
    pub vocabulary: Vocabulary,
    pub corpus: SparseCorpus,
    pub documents: LoadReport,
    pub stop_words: LoadReport,
    pub meta: SnapshotMeta,
}

/// First tokenization pass: assign ids, then prune with thresholds chosen
/// from the number of documents. The result is fixed from here on.
pub fn build_vocabulary<S: AsRef<str>>(docs: &[S], stop_words: &StopWords) -> Vocabulary {
    let mut vocab = Vocabulary::from_documents(docs.iter().map(|d| tokenize(d.as_ref(), stop_words)));
    let before = vocab.len();
    vocab.filter_extremes(PruneThresholds::for_corpus_size(docs.len()));
    tracing::info!(num_docs = docs.len(), before, num_tokens = vocab.len(), "dictionary generated");
    vocab
}

/// Reads the source directories, builds vocabulary and corpus, and persists
/// both to the model directory.
pub fn build_model(config: &PipelineConfig) -> Result<CorpusModel> {
    let (stop, stop_report) = load_stop_words(&config.stopwords_dir, &config.file_filter);
    let (docs, doc_report) = load_documents(&config.documents_dir, &config.file_filter, config.doc_length);

    let vocabulary = build_vocabulary(&docs, &stop);
    let corpus = SparseCorpus::build(&docs, &vocabulary, &stop);
    tracing::info!(num_docs = corpus.len(), num_nnz = corpus.num_nnz(), "corpus generated");

    let meta = save_snapshot(&ModelPaths::new(&config.model_dir), &vocabulary, &corpus)?;
    Ok(CorpusModel { vocabulary, corpus, documents: doc_report, stop_words: stop_report, meta })
}

/// Reloads a persisted vocabulary and corpus without touching the sources.
pub fn load_model(config: &PipelineConfig) -> Result<(Vocabulary, SparseCorpus)> {
    load_snapshot(&ModelPaths::new(&config.model_dir))
}
