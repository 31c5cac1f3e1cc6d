use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, KwgError>;

/// Errors raised by the corpus pipeline and keyword scoring.
#[derive(Debug, thiserror::Error)]
pub enum KwgError {
    #[error("no supported encoding could decode {}", .path.display())]
    Decode { path: PathBuf },

    #[error("corpus was built from vocabulary {found}, loaded vocabulary is {expected}")]
    VocabularyCorpusMismatch { expected: String, found: String },

    #[error("topic index {index} is out of range 1..={num_topics}")]
    InvalidTopicIndex { index: usize, num_topics: usize },

    #[error("cannot parse topic exclusion input {input:?}")]
    InvalidExclusionInput { input: String },

    #[error("term {term:?} has corpus frequency {frequency}, cannot take its logarithm")]
    ScoreComputation { term: String, frequency: u64 },

    #[error("term {term:?} is not in the vocabulary")]
    UnknownTerm { term: String },

    #[error("snapshot file {} is missing", .path.display())]
    MissingSnapshot { path: PathBuf },

    #[error("external model failed: {reason}")]
    ExternalModel { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
