use std::collections::HashSet;

use anyhow::Result;

use crate::db::models::Clip;
use crate::similarity::translator::Translator;
use crate::similarity::SimilarityScorer;

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Jaccard overlap of the token sets of two texts.
pub fn token_overlap(a: &str, b: &str) -> f64 {
    let left = tokens(a);
    let right = tokens(b);
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

/// Embedding-free scorer for runs without cached vectors.
pub struct LexicalScorer {
    translator: Box<dyn Translator>,
}

impl LexicalScorer {
    pub fn new(translator: Box<dyn Translator>) -> Self {
        Self { translator }
    }
}

impl SimilarityScorer for LexicalScorer {
    fn score(&self, query: &str, clip: &Clip) -> Result<f64> {
        let translated = self.translator.translate(query);
        Ok(token_overlap(&translated, &clip.caption))
    }
}
