use super::{FittedTopics, TopicModel, TopicParams};
use crate::dictionary::Vocabulary;
use crate::topics::{DocumentTopics, Topic};
use crate::{KwgError, Result, SparseCorpus};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs topic training through an installed MALLET binary.
#[derive(Debug, Clone)]
pub struct MalletLda {
    pub mallet_path: PathBuf,
    /// Directory receiving MALLET's input and output files.
    pub work_dir: PathBuf,
    /// Sum of the document-topic priors, as MALLET expects it.
    pub alpha: f64,
}

impl MalletLda {
    pub fn new<P: AsRef<Path>, W: AsRef<Path>>(mallet_path: P, work_dir: W) -> Self {
        Self { mallet_path: mallet_path.as_ref().to_path_buf(), work_dir: work_dir.as_ref().to_path_buf(), alpha: 50.0 }
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        tracing::debug!(mallet = %self.mallet_path.display(), ?args, "running mallet");
        let output = Command::new(&self.mallet_path)
            .args(args)
            .output()
            .map_err(|e| KwgError::ExternalModel { reason: format!("cannot run {}: {e}", self.mallet_path.display()) })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KwgError::ExternalModel { reason: format!("mallet {} exited with {}: {}", args[0], output.status, stderr.trim()) });
        }
        Ok(())
    }
}

/// One line per document: "<index> 0 <term> <term> ...", each term repeated by its count.
fn write_corpus(path: &Path, corpus: &SparseCorpus, vocab: &Vocabulary) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for (d, bow) in corpus.vectors().iter().enumerate() {
        write!(out, "{d} 0")?;
        for (tid, count) in bow {
            let term = vocab.term(*tid).ok_or_else(|| KwgError::UnknownTerm { term: format!("#{tid}") })?;
            for _ in 0..*count {
                write!(out, " {term}")?;
            }
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn path(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

fn parse_error(file: &str, line: &str) -> KwgError {
    KwgError::ExternalModel { reason: format!("unexpected line in {file}: {line:?}") }
}

/// Parses a topic-word-weights file ("topic<TAB>term<TAB>weight"), normalises
/// each topic's weights to sum to one and keeps the `num_words` heaviest terms.
pub fn parse_word_weights(text: &str, num_topics: usize, num_words: usize) -> Result<Vec<Topic>> {
    let mut raw: Vec<Vec<(String, f64)>> = vec![Vec::new(); num_topics];
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let mut fields = line.split('\t');
        let (topic, term, weight) = match (fields.next(), fields.next(), fields.next()) {
            (Some(t), Some(w), Some(x)) => (t, w, x),
            _ => return Err(parse_error("topic word weights", line)),
        };
        let topic: usize = topic.trim().parse().map_err(|_| parse_error("topic word weights", line))?;
        let weight: f64 = weight.trim().parse().map_err(|_| parse_error("topic word weights", line))?;
        let slot = raw.get_mut(topic).ok_or_else(|| parse_error("topic word weights", line))?;
        slot.push((term.to_string(), weight));
    }
    Ok(raw
        .into_iter()
        .map(|mut terms| {
            let total: f64 = terms.iter().map(|(_, w)| w).sum();
            if total > 0.0 {
                for (_, w) in terms.iter_mut() { *w /= total; }
            }
            terms.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            terms.truncate(num_words);
            Topic::new(terms)
        })
        .collect())
}

/// Parses a doc-topics file. Accepts both the dense layout
/// ("doc name p0 p1 ...") and the older sparse one ("doc name t p t p ...").
/// Every document `0..num_docs` must appear exactly once.
pub fn parse_doc_topics(text: &str, num_topics: usize, num_docs: usize) -> Result<Vec<DocumentTopics>> {
    let mut rows: BTreeMap<usize, DocumentTopics> = BTreeMap::new();
    for line in text.lines().filter(|l| !l.trim().is_empty() && !l.starts_with('#')) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(parse_error("doc topics", line));
        }
        let doc: usize = fields[0].parse().map_err(|_| parse_error("doc topics", line))?;
        let values: Vec<f64> = fields[2..]
            .iter()
            .map(|v| v.parse::<f64>().map_err(|_| parse_error("doc topics", line)))
            .collect::<Result<_>>()?;
        let mut dist: DocumentTopics = if values.len() == num_topics {
            values.into_iter().enumerate().collect()
        } else if values.len() % 2 == 0 {
            values.chunks_exact(2).map(|pair| (pair[0] as usize, pair[1])).collect()
        } else {
            return Err(parse_error("doc topics", line));
        };
        dist.sort_by_key(|(t, _)| *t);
        if rows.insert(doc, dist).is_some() {
            return Err(KwgError::ExternalModel { reason: format!("document {doc} listed twice in doc topics") });
        }
    }
    let contiguous = rows.keys().enumerate().all(|(i, doc)| i == *doc);
    if rows.len() != num_docs || !contiguous {
        return Err(KwgError::ExternalModel {
            reason: format!("doc topics cover {} documents, expected 0..{num_docs}", rows.len()),
        });
    }
    Ok(rows.into_values().collect())
}

impl TopicModel for MalletLda {
    fn fit(&self, corpus: &SparseCorpus, vocab: &Vocabulary, params: &TopicParams) -> Result<FittedTopics> {
        fs::create_dir_all(&self.work_dir)?;
        let corpus_txt = self.work_dir.join("corpus.txt");
        let corpus_mallet = self.work_dir.join("corpus.mallet");
        let doc_topics_txt = self.work_dir.join("doctopics.txt");
        let weights_txt = self.work_dir.join("wordweights.txt");
        write_corpus(&corpus_txt, corpus, vocab)?;

        self.run(&[
            "import-file", "--preserve-case", "--keep-sequence", "--token-regex", "\\S+",
            "--input", &path(&corpus_txt), "--output", &path(&corpus_mallet),
        ])?;
        let (num_topics, alpha, iterations, seed) = (
            params.num_topics.to_string(),
            self.alpha.to_string(),
            params.iterations.to_string(),
            params.seed.to_string(),
        );
        self.run(&[
            "train-topics", "--input", &path(&corpus_mallet), "--num-topics", &num_topics,
            "--alpha", &alpha, "--optimize-interval", "0", "--num-iterations", &iterations,
            "--random-seed", &seed, "--output-doc-topics", &path(&doc_topics_txt),
            "--topic-word-weights-file", &path(&weights_txt),
        ])?;

        let topics = parse_word_weights(&fs::read_to_string(&weights_txt)?, params.num_topics, params.num_words)?;
        let doc_topics = parse_doc_topics(&fs::read_to_string(&doc_topics_txt)?, params.num_topics, corpus.len())?;
        tracing::info!(num_topics = topics.len(), num_docs = doc_topics.len(), "mallet model trained");
        Ok(FittedTopics { topics, doc_topics })
    }
}
