pub mod embedding;
pub mod lexical;
pub mod search;
pub mod translator;

use anyhow::Result;

use crate::db::models::Clip;

pub use embedding::{EmbeddingScorer, EmbeddingStore};
pub use lexical::LexicalScorer;
pub use translator::{Glossary, Passthrough, Translator};

/// Similarity of a query to one clip caption, in `[0, 1]`.
pub trait SimilarityScorer {
    fn score(&self, query: &str, clip: &Clip) -> Result<f64>;
}
