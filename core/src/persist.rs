use crate::{KwgError, Result, SparseCorpus, Vocabulary};
use serde::{Deserialize, Serialize};
use std::fs::{self, create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub num_docs: usize,
    pub num_terms: usize,
    pub vocabulary_checksum: String,
    pub created_at: String,
    pub version: u32,
}

pub struct ModelPaths {
    pub root: PathBuf,
}

impl ModelPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn vocabulary(&self) -> PathBuf { self.root.join("kwg.dict") }
    pub fn corpus(&self) -> PathBuf { self.root.join("kwg.corpus") }
    pub fn meta(&self) -> PathBuf { self.root.join("kwg.meta.json") }
}

/// Writes through a temporary sibling and renames it into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent() {
        create_dir_all(dir)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    {
        let mut f = File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(KwgError::MissingSnapshot { path: path.to_path_buf() })
        }
        Err(e) => return Err(e.into()),
    };
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(buf)
}

pub fn save_vocabulary(paths: &ModelPaths, vocab: &Vocabulary) -> Result<()> {
    let bytes = bincode::serialize(vocab)?;
    write_atomic(&paths.vocabulary(), &bytes)
}

pub fn load_vocabulary(paths: &ModelPaths) -> Result<Vocabulary> {
    let buf = read_file(&paths.vocabulary())?;
    Ok(bincode::deserialize(&buf)?)
}

pub fn save_corpus(paths: &ModelPaths, corpus: &SparseCorpus) -> Result<()> {
    let bytes = bincode::serialize(corpus)?;
    write_atomic(&paths.corpus(), &bytes)
}

pub fn load_corpus(paths: &ModelPaths) -> Result<SparseCorpus> {
    let buf = read_file(&paths.corpus())?;
    Ok(bincode::deserialize(&buf)?)
}

pub fn save_meta(paths: &ModelPaths, meta: &SnapshotMeta) -> Result<()> {
    let json = serde_json::to_string_pretty(meta)?;
    write_atomic(&paths.meta(), json.as_bytes())
}

pub fn load_meta(paths: &ModelPaths) -> Result<SnapshotMeta> {
    let buf = read_file(&paths.meta())?;
    Ok(serde_json::from_slice(&buf)?)
}

/// Persists vocabulary, corpus and meta together. The corpus must have been
/// built from `vocab`; nothing is written otherwise.
pub fn save_snapshot(paths: &ModelPaths, vocab: &Vocabulary, corpus: &SparseCorpus) -> Result<SnapshotMeta> {
    corpus.check_vocabulary(vocab)?;
    let meta = SnapshotMeta {
        num_docs: corpus.len(),
        num_terms: vocab.len(),
        vocabulary_checksum: vocab.checksum(),
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        version: SNAPSHOT_VERSION,
    };
    save_vocabulary(paths, vocab)?;
    save_corpus(paths, corpus)?;
    save_meta(paths, &meta)?;
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, num_terms = meta.num_terms, "snapshot saved");
    Ok(meta)
}

/// Loads vocabulary and corpus, rejecting a corpus built from another vocabulary.
pub fn load_snapshot(paths: &ModelPaths) -> Result<(Vocabulary, SparseCorpus)> {
    let vocab = load_vocabulary(paths)?;
    let corpus = load_corpus(paths)?;
    corpus.check_vocabulary(&vocab)?;
    tracing::info!(root = %paths.root.display(), num_docs = corpus.len(), num_terms = vocab.len(), "snapshot loaded");
    Ok((vocab, corpus))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_round_trips_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ModelPaths::new(dir.path());
        let meta = SnapshotMeta { num_docs: 3, num_terms: 7, vocabulary_checksum: "abc".into(), created_at: "2024-01-01T00:00:00Z".into(), version: 1 };
        save_meta(&paths, &meta).unwrap();
        assert_eq!(load_meta(&paths).unwrap(), meta);
        assert!(!dir.path().join("kwg.meta.json.tmp").exists());
    }

    #[test]
    fn missing_vocabulary_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ModelPaths::new(dir.path());
        assert!(matches!(load_snapshot(&paths), Err(KwgError::MissingSnapshot { .. })));
    }
}
