//! Command line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::settings::{EvalSettings, ScorerKind, SourceConfig};

/// Segment-detection metrics for text-to-video retrieval
#[derive(Parser, Debug)]
#[command(name = "vidseg-eval", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score clip sources against an annotated query dataset
    #[command(visible_alias = "e")]
    Evaluate(EvaluateArgs),

    /// Rank the captions of one clip database against a query
    #[command(visible_alias = "s")]
    Search(SearchArgs),
}

#[derive(Args, Debug, Default)]
pub struct EvaluateArgs {
    /// Settings file; defaults apply when it does not exist
    #[arg(short, long, env = "VIDSEG_CONFIG", default_value = "vidseg.json")]
    pub config: PathBuf,

    /// Evaluation dataset (JSON array of annotated queries)
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Clip source as PATH:KIND, KIND being `clips` or `captions` (repeatable)
    #[arg(long = "source", value_name = "PATH:KIND")]
    pub sources: Vec<SourceConfig>,

    /// Similarity cutoff for segment detection
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Score by caption token overlap instead of embeddings
    #[arg(long)]
    pub lexical: bool,

    /// JSON map of text to embedding vector
    #[arg(long)]
    pub query_embeddings: Option<PathBuf>,

    /// JSON map translating queries before scoring
    #[arg(long)]
    pub glossary: Option<PathBuf>,

    /// Write the summary as JSON here
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl EvaluateArgs {
    /// Flags win over the settings file.
    pub fn apply(self, mut settings: EvalSettings) -> EvalSettings {
        if let Some(dataset) = self.dataset {
            settings.dataset = dataset;
        }
        if !self.sources.is_empty() {
            settings.sources = self.sources;
        }
        if let Some(threshold) = self.threshold {
            settings.threshold = threshold;
        }
        if self.lexical {
            settings.scorer = ScorerKind::Lexical;
        }
        if self.query_embeddings.is_some() {
            settings.query_embeddings = self.query_embeddings;
        }
        if self.glossary.is_some() {
            settings.glossary = self.glossary;
        }
        if self.output.is_some() {
            settings.output = self.output;
        }
        settings
    }
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Clip database to search
    #[arg(long)]
    pub db: PathBuf,

    /// Query text
    #[arg(short, long)]
    pub query: String,

    #[arg(short = 'k', long, default_value_t = 3)]
    pub top_k: usize,

    /// JSON map of text to embedding vector
    #[arg(long)]
    pub query_embeddings: PathBuf,

    /// JSON map translating queries before scoring
    #[arg(long)]
    pub glossary: Option<PathBuf>,
}
