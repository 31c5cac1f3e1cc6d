use crate::{KwgError, Result};
use serde::{Deserialize, Serialize};

/// One topic: terms ranked by weight, highest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub terms: Vec<(String, f64)>,
}

impl Topic {
    pub fn new(terms: Vec<(String, f64)>) -> Self { Self { terms } }
}

/// (topic index, probability) pairs for one document.
pub type DocumentTopics = Vec<(usize, f64)>;

/// Parses a comma-separated list of 1-based topic numbers. Blank input
/// excludes nothing; spaces and empty items are ignored.
pub fn parse_exclusion(input: &str) -> Result<Vec<usize>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|_| KwgError::InvalidExclusionInput { input: input.to_string() }))
        .collect()
}

/// Removes the topics numbered `indices` (1-based), keeping the others in
/// their original order. Every index is validated before anything is removed.
pub fn exclude(mut topics: Vec<Topic>, indices: &[usize]) -> Result<Vec<Topic>> {
    let num_topics = topics.len();
    if let Some(&index) = indices.iter().find(|&&i| i == 0 || i > num_topics) {
        return Err(KwgError::InvalidTopicIndex { index, num_topics });
    }
    let mut order = indices.to_vec();
    order.sort_unstable_by(|a, b| b.cmp(a));
    order.dedup();
    for i in order {
        topics.remove(i - 1);
    }
    tracing::info!(excluded = num_topics - topics.len(), remaining = topics.len(), "topics excluded");
    Ok(topics)
}

/// "(n) term term ..." listing used when asking which topics to exclude.
pub fn format_topics(topics: &[Topic]) -> String {
    let mut out = String::new();
    for (i, topic) in topics.iter().enumerate() {
        out.push_str(&format!("({})", i + 1));
        for (term, _) in &topic.terms {
            out.push(' ');
            out.push_str(term);
        }
        out.push('\n');
    }
    out
}
