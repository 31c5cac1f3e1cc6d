use crate::config::FileFilter;
use crate::decode::read_text;
use crate::tokenizer::normalize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of reading one source directory.
#[derive(Debug, Default, Clone)]
pub struct LoadReport {
    pub files_read: usize,
    pub skipped: Vec<PathBuf>,
}

impl LoadReport {
    pub fn files_skipped(&self) -> usize { self.skipped.len() }
}

pub type StopWords = HashSet<String>;

/// Eligible files directly inside `dir`, sorted by file name so that document
/// order is reproducible across runs.
pub fn list_files(dir: &Path, filter: &FileFilter) -> Vec<PathBuf> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "source directory does not exist, treating it as empty");
        return Vec::new();
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(%err, "cannot read directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && filter.accepts(e.path()))
        .map(|e| e.into_path())
        .collect()
}

/// Decodes every eligible file, skipping and recording those that fail.
fn read_all(dir: &Path, filter: &FileFilter) -> (Vec<(PathBuf, String)>, LoadReport) {
    let mut report = LoadReport::default();
    let mut texts = Vec::new();
    for path in list_files(dir, filter) {
        match read_text(&path) {
            Ok(text) => {
                report.files_read += 1;
                texts.push((path, text));
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping file");
                report.skipped.push(path);
            }
        }
    }
    (texts, report)
}

/// Union of all whitespace-separated, lower-cased words in the stop word files.
///
/// The diacritic-free spelling of every entry is added as well, since document
/// tokens are compared after diacritics are stripped.
pub fn load_stop_words(dir: &Path, filter: &FileFilter) -> (StopWords, LoadReport) {
    let (texts, report) = read_all(dir, filter);
    let mut words = StopWords::new();
    for (_, text) in &texts {
        for w in text.split_whitespace() {
            let lower = w.to_lowercase();
            let plain = normalize(w);
            if plain != lower { words.insert(plain); }
            words.insert(lower);
        }
    }
    if words.is_empty() {
        tracing::warn!(dir = %dir.display(), "no stop words loaded");
    }
    tracing::info!(num_words = words.len(), skipped = report.files_skipped(), "stop words loaded");
    (words, report)
}

/// Splits `text` into consecutive chunks of `n` words; the last may be shorter.
pub fn split_words(text: &str, n: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if n == 0 { return vec![text.to_string()]; }
    words.chunks(n).map(|c| c.join(" ")).collect()
}

/// Loads documents in file order, chunking each file when `doc_length > 0`.
pub fn load_documents(dir: &Path, filter: &FileFilter, doc_length: usize) -> (Vec<String>, LoadReport) {
    let (texts, report) = read_all(dir, filter);
    let mut docs = Vec::new();
    for (path, text) in texts {
        if doc_length > 0 {
            let chunks = split_words(&text, doc_length);
            tracing::debug!(path = %path.display(), chunks = chunks.len(), "split document");
            docs.extend(chunks);
        } else {
            docs.push(text);
        }
    }
    if docs.is_empty() {
        tracing::warn!(dir = %dir.display(), "no documents loaded");
    }
    tracing::info!(num_docs = docs.len(), skipped = report.files_skipped(), "documents loaded");
    (docs, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn chunks_are_exact_with_short_tail() {
        let chunks = split_words("a b c d e f g", 3);
        assert_eq!(chunks, vec!["a b c", "d e f", "g"]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(split_words("   ", 4).is_empty());
    }

    #[test]
    fn documents_follow_file_then_chunk_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "four five").unwrap();
        fs::write(dir.path().join("a.txt"), "one two three").unwrap();
        fs::write(dir.path().join(".hidden"), "never read").unwrap();
        let (docs, report) = load_documents(dir.path(), &FileFilter::AllVisible, 2);
        assert_eq!(docs, vec!["one two", "three", "four five"]);
        assert_eq!(report.files_read, 2);
        assert_eq!(report.files_skipped(), 0);
    }

    #[test]
    fn undecodable_files_are_skipped_and_counted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.txt"), "plain text").unwrap();
        fs::write(dir.path().join("bad.bin"), [0u8, 0xFF, 0x00, 0x81]).unwrap();
        let (docs, report) = load_documents(dir.path(), &FileFilter::AllVisible, 0);
        assert_eq!(docs, vec!["plain text"]);
        assert_eq!(report.files_skipped(), 1);
    }

    #[test]
    fn stop_words_are_lowercased_and_flattened() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en.txt"), "The\r\nAND of\n").unwrap();
        fs::write(dir.path().join("fr.txt"), "Été le").unwrap();
        let (words, report) = load_stop_words(dir.path(), &FileFilter::AllVisible);
        assert_eq!(report.files_read, 2);
        for w in ["the", "and", "of", "été", "ete", "le"] {
            assert!(words.contains(w), "missing {w}");
        }
        assert_eq!(words.len(), 6);
    }

    #[test]
    fn missing_directory_is_empty() {
        let (words, report) = load_stop_words(Path::new("/definitely/not/here"), &FileFilter::AllVisible);
        assert!(words.is_empty());
        assert_eq!(report.files_read, 0);
    }
}
