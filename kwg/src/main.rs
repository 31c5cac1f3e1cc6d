use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kwg_core::export::Exporter;
use kwg_core::keywords::{score_term_weights, score_topics};
use kwg_core::models::{GibbsLda, MalletLda, TermWeighting, TfIdf, TopicModel, TopicParams};
use kwg_core::pipeline::{build_model, load_model};
use kwg_core::topics::{exclude, parse_exclusion};
use kwg_core::{Keyword, PipelineConfig, SparseCorpus, Topic, Vocabulary};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod prompt;

#[derive(Parser)]
#[command(name = "kwg")]
#[command(about = "Generate keywords from a directory of text documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Data directory holding documents/, stop_words/, models/ and results/
    #[arg(long, default_value = "data")]
    data: PathBuf,
    /// JSON configuration file; flags given on the command line take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    /// Split documents into chunks of this many words (0 = no splitting)
    #[arg(short = 'd', long)]
    doc_length: Option<usize>,
    /// Reuse the vocabulary and corpus saved by an earlier run
    #[arg(long, default_value_t = false)]
    reuse_model: bool,
}

#[derive(Args, Default)]
struct TopicArgs {
    /// Number of topics
    #[arg(short = 't', long)]
    topics: Option<usize>,
    /// Number of words per topic
    #[arg(short = 'w', long)]
    words: Option<usize>,
    /// Number of keywords
    #[arg(short = 'k', long)]
    keywords: Option<usize>,
    /// Path to a MALLET binary; the built-in sampler is used otherwise
    #[arg(short = 'm', long)]
    mallet: Option<PathBuf>,
}

impl TopicArgs {
    fn apply(self, config: &mut PipelineConfig) {
        if let Some(t) = self.topics { config.num_topics = t; }
        if let Some(w) = self.words { config.num_words = w; }
        if let Some(k) = self.keywords { config.num_keywords = k; }
        if self.mallet.is_some() { config.mallet_path = self.mallet; }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build and save the vocabulary and corpus only
    Build {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Keywords from topic model term weights
    Topics {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        model: TopicArgs,
        /// Comma-separated topic numbers to exclude, instead of asking
        #[arg(long)]
        exclude: Option<String>,
        /// Keep all topics without asking
        #[arg(long, default_value_t = false)]
        no_prompt: bool,
    },
    /// Keywords from summed TF-IDF weights
    Tfidf {
        #[command(flatten)]
        source: SourceArgs,
        /// Number of keywords
        #[arg(short = 'k', long)]
        keywords: Option<usize>,
        /// Use smoothed IDF = log2(1 + N/df) instead of log2(N/df)
        #[arg(long, default_value_t = false)]
        smoothed_idf: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { source } => {
            let config = resolve_config(&source)?;
            build_model(&config).context("building corpus")?;
            Ok(())
        }
        Commands::Topics { source, model, exclude: excluded, no_prompt } => {
            let mut config = resolve_config(&source)?;
            model.apply(&mut config);
            let exclusion = match (excluded, no_prompt) {
                (Some(list), _) => Exclusion::Given(list),
                (None, true) => Exclusion::KeepAll,
                (None, false) => Exclusion::Ask,
            };
            topic_keywords(&config, source.reuse_model, exclusion)
        }
        Commands::Tfidf { source, keywords, smoothed_idf } => {
            let mut config = resolve_config(&source)?;
            if let Some(k) = keywords { config.num_keywords = k; }
            tfidf_keywords(&config, source.reuse_model, TfIdf { smoothed_idf })
        }
    }
}

fn resolve_config(source: &SourceArgs) -> Result<PipelineConfig> {
    let mut config = match &source.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => PipelineConfig::with_data_dir(&source.data),
    };
    if let Some(d) = source.doc_length { config.doc_length = d; }
    Ok(config)
}

fn corpus(config: &PipelineConfig, reuse_model: bool) -> Result<(Vocabulary, SparseCorpus)> {
    if reuse_model {
        return load_model(config).context("loading saved corpus");
    }
    let model = build_model(config).context("building corpus")?;
    Ok((model.vocabulary, model.corpus))
}

enum Exclusion {
    Ask,
    Given(String),
    KeepAll,
}

fn topic_keywords(config: &PipelineConfig, reuse_model: bool, exclusion: Exclusion) -> Result<()> {
    let (vocab, corpus) = corpus(config, reuse_model)?;
    let params = TopicParams {
        num_topics: config.num_topics,
        num_words: config.num_words,
        iterations: config.iterations,
        seed: config.seed,
    };
    let fitted = match &config.mallet_path {
        Some(path) => {
            tracing::info!(mallet = %path.display(), "generating model with mallet");
            MalletLda::new(path, config.model_dir.join("mallet")).fit(&corpus, &vocab, &params)?
        }
        None => {
            tracing::info!("generating model with gibbs sampling lda");
            GibbsLda::default().fit(&corpus, &vocab, &params)?
        }
    };

    let stdin = io::stdin();
    let working = select_topics(&fitted.topics, exclusion, &mut stdin.lock(), &mut io::stdout())?;

    let keywords = score_topics(&corpus, &vocab, &working, config.num_keywords)?;
    print_keywords(&keywords);

    let exporter = Exporter::new(&config.results_dir, config.delimiter);
    exporter.keywords(&keywords)?;
    exporter.topics(&fitted.topics)?;
    exporter.document_topics(&fitted.doc_topics, fitted.topics.len())?;
    exporter.query(&keywords)?;
    Ok(())
}

/// Topics kept for scoring. An invalid `--exclude` list keeps every topic.
fn select_topics<R: BufRead, W: Write>(
    topics: &[Topic],
    exclusion: Exclusion,
    input: &mut R,
    out: &mut W,
) -> io::Result<Vec<Topic>> {
    match exclusion {
        Exclusion::KeepAll => Ok(topics.to_vec()),
        Exclusion::Given(list) => match parse_exclusion(&list).and_then(|idx| exclude(topics.to_vec(), &idx)) {
            Ok(kept) => Ok(kept),
            Err(err) => {
                tracing::warn!(%err, "ignoring topic exclusion");
                Ok(topics.to_vec())
            }
        },
        Exclusion::Ask => prompt::ask_exclusion(topics.to_vec(), input, out),
    }
}

fn tfidf_keywords(config: &PipelineConfig, reuse_model: bool, weighting: TfIdf) -> Result<()> {
    let (vocab, corpus) = corpus(config, reuse_model)?;
    let weights = weighting.weigh(&corpus);
    let keywords = score_term_weights(&weights, &vocab, config.num_keywords)?;
    print_keywords(&keywords);

    let exporter = Exporter::new(&config.results_dir, config.delimiter);
    exporter.keywords(&keywords)?;
    exporter.query(&keywords)?;
    Ok(())
}

fn print_keywords(keywords: &[Keyword]) {
    println!("Keywords generated:");
    for (i, k) in keywords.iter().enumerate() {
        println!("({}) {} [{}]", i + 1, k.term, k.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    fn source(config: Option<PathBuf>, doc_length: Option<usize>) -> SourceArgs {
        SourceArgs { data: PathBuf::from("data"), config, doc_length, reuse_model: false }
    }

    fn topics() -> Vec<Topic> {
        ["a", "b", "c"].iter().map(|t| Topic::new(vec![(t.to_string(), 0.5)])).collect()
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kwg.json");
        fs::write(&path, r#"{"doc_length": 5, "num_topics": 3, "num_keywords": 4, "seed": 9}"#).unwrap();

        let mut config = resolve_config(&source(Some(path.clone()), Some(7))).unwrap();
        TopicArgs { keywords: Some(2), ..TopicArgs::default() }.apply(&mut config);
        assert_eq!(config.doc_length, 7);
        assert_eq!(config.num_keywords, 2);
        assert_eq!(config.num_topics, 3);
        assert_eq!(config.seed, 9);

        let unchanged = resolve_config(&source(Some(path), None)).unwrap();
        assert_eq!(unchanged.doc_length, 5);
    }

    #[test]
    fn data_dir_is_used_without_config_file() {
        let config = resolve_config(&source(None, None)).unwrap();
        assert_eq!(config.documents_dir, PathBuf::from("data").join("documents"));
        assert_eq!(config.doc_length, 0);
    }

    #[test]
    fn invalid_exclusion_keeps_all_topics() {
        let mut out = Vec::new();
        let kept = select_topics(&topics(), Exclusion::Given("9".into()), &mut Cursor::new(""), &mut out).unwrap();
        assert_eq!(kept, topics());
        let kept = select_topics(&topics(), Exclusion::Given("two".into()), &mut Cursor::new(""), &mut out).unwrap();
        assert_eq!(kept.len(), 3);
        assert!(out.is_empty());
    }

    #[test]
    fn given_exclusion_removes_topics() {
        let kept = select_topics(&topics(), Exclusion::Given("1, 3".into()), &mut Cursor::new(""), &mut Vec::new()).unwrap();
        assert_eq!(kept, vec![topics()[1].clone()]);
    }
}
