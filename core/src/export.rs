use crate::keywords::Keyword;
use crate::topics::{DocumentTopics, Topic};
use crate::Result;
use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};

/// Writes the results of one run into delimited files sharing a timestamp prefix.
pub struct Exporter {
    dir: PathBuf,
    delimiter: char,
    stamp: i64,
}

impl Exporter {
    pub fn new<P: AsRef<Path>>(dir: P, delimiter: char) -> Self {
        let stamp = time::OffsetDateTime::now_utc().unix_timestamp();
        Self::with_timestamp(dir, delimiter, stamp)
    }

    pub fn with_timestamp<P: AsRef<Path>>(dir: P, delimiter: char, stamp: i64) -> Self {
        Self { dir: dir.as_ref().to_path_buf(), delimiter, stamp }
    }

    fn write(&self, suffix: &str, contents: &str) -> Result<PathBuf> {
        create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}_{suffix}", self.stamp));
        fs::write(&path, contents)?;
        tracing::info!(path = %path.display(), "results exported");
        Ok(path)
    }

    pub fn keywords(&self, keywords: &[Keyword]) -> Result<PathBuf> {
        self.write("keywords.csv", &render_keywords(keywords, self.delimiter))
    }

    pub fn topics(&self, topics: &[Topic]) -> Result<PathBuf> {
        self.write("topics.csv", &render_topics(topics, self.delimiter))
    }

    pub fn document_topics(&self, doc_topics: &[DocumentTopics], num_topics: usize) -> Result<PathBuf> {
        self.write("document_topics.csv", &render_document_topics(doc_topics, num_topics, self.delimiter))
    }

    pub fn query(&self, keywords: &[Keyword]) -> Result<PathBuf> {
        self.write("query.txt", &render_query(keywords))
    }
}

/// One "term<d>score" row per keyword.
pub fn render_keywords(keywords: &[Keyword], delimiter: char) -> String {
    keywords
        .iter()
        .map(|k| format!("{}{delimiter}{}\n", k.term, k.score))
        .collect()
}

/// Per topic, a row of terms followed by a row of their weights.
pub fn render_topics(topics: &[Topic], delimiter: char) -> String {
    let sep = delimiter.to_string();
    let mut out = String::new();
    for topic in topics {
        let terms: Vec<&str> = topic.terms.iter().map(|(t, _)| t.as_str()).collect();
        let weights: Vec<String> = topic.terms.iter().map(|(_, w)| w.to_string()).collect();
        out.push_str(&terms.join(&sep));
        out.push('\n');
        out.push_str(&weights.join(&sep));
        out.push('\n');
    }
    out
}

/// Header "Document, Topic 1 .. Topic T", then one row of probabilities
/// (five decimals) per document. Topics missing from a sparse distribution are 0.
pub fn render_document_topics(doc_topics: &[DocumentTopics], num_topics: usize, delimiter: char) -> String {
    let sep = delimiter.to_string();
    let mut header = vec!["Document".to_string()];
    header.extend((1..=num_topics).map(|t| format!("Topic {t}")));
    let mut out = header.join(&sep);
    out.push('\n');
    for (d, dist) in doc_topics.iter().enumerate() {
        let mut row = vec![0.0f64; num_topics];
        for (t, p) in dist {
            if let Some(slot) = row.get_mut(*t) { *slot = *p; }
        }
        let mut cells = vec![d.to_string()];
        cells.extend(row.iter().map(|p| format!("{p:.5}")));
        out.push_str(&cells.join(&sep));
        out.push('\n');
    }
    out
}

/// Keywords one per line, then an OR query and a plain space-separated query.
pub fn render_query(keywords: &[Keyword]) -> String {
    let terms: Vec<&str> = keywords.iter().map(|k| k.term.as_str()).collect();
    let mut out = String::new();
    for t in &terms {
        out.push_str(t);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&terms.join(" OR "));
    out.push_str("\n\n");
    out.push_str(&terms.join(" "));
    out
}
