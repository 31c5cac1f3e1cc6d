use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which files in a source directory are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFilter {
    /// Every regular file whose name does not start with a dot.
    AllVisible,
    /// Visible files with the given extension only, e.g. "txt".
    Extension(String),
}

impl Default for FileFilter {
    fn default() -> Self { FileFilter::AllVisible }
}

impl FileFilter {
    pub fn accepts(&self, path: &Path) -> bool {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => return false,
        };
        if name.starts_with('.') { return false; }
        match self {
            FileFilter::AllVisible => true,
            FileFilter::Extension(ext) => path
                .extension()
                .and_then(|e| e.to_str())
                .map_or(false, |e| e.eq_ignore_ascii_case(ext.trim_start_matches('.'))),
        }
    }
}

/// Vocabulary pruning policy: minimum document frequency, maximum document
/// fraction and maximum vocabulary size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PruneThresholds {
    pub no_below: u32,
    pub no_above: f64,
    pub keep_n: usize,
}

pub const SMALL_CORPUS_MAX_DOCS: usize = 10;
pub const DEFAULT_KEEP_N: usize = 100_000;

impl PruneThresholds {
    /// Thresholds relax for corpora of ten documents or fewer, where
    /// frequency-based pruning would discard most of the vocabulary.
    pub fn for_corpus_size(num_docs: usize) -> Self {
        if num_docs <= SMALL_CORPUS_MAX_DOCS {
            Self { no_below: 1, no_above: 1.0, keep_n: DEFAULT_KEEP_N }
        } else {
            Self { no_below: 2, no_above: 0.95, keep_n: DEFAULT_KEEP_N }
        }
    }
}

/// Run configuration, passed explicitly into the pipeline entry points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub documents_dir: PathBuf,
    pub stopwords_dir: PathBuf,
    pub model_dir: PathBuf,
    pub results_dir: PathBuf,
    /// Words per document chunk; 0 keeps every file whole.
    pub doc_length: usize,
    pub num_topics: usize,
    pub num_words: usize,
    pub num_keywords: usize,
    pub mallet_path: Option<PathBuf>,
    pub file_filter: FileFilter,
    pub delimiter: char,
    pub seed: u64,
    pub iterations: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::with_data_dir("data")
    }
}

impl PipelineConfig {
    /// Default layout rooted at `data`: documents/, stop_words/, models/, results/.
    pub fn with_data_dir<P: AsRef<Path>>(data: P) -> Self {
        let root = data.as_ref();
        Self {
            documents_dir: root.join("documents"),
            stopwords_dir: root.join("stop_words"),
            model_dir: root.join("models"),
            results_dir: root.join("results"),
            doc_length: 0,
            num_topics: 10,
            num_words: 10,
            num_keywords: 10,
            mallet_path: None,
            file_filter: FileFilter::AllVisible,
            delimiter: '\t',
            seed: 1,
            iterations: 1000,
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }
}
