use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use log::info;

use crate::db::models::Clip;
use crate::similarity::translator::Translator;
use crate::similarity::SimilarityScorer;

/// Precomputed sentence embeddings keyed by the exact text they encode.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingStore {
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingStore {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read embeddings from {}", path.display()))?;
        let vectors: HashMap<String, Vec<f32>> = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse embeddings {}", path.display()))?;
        info!(
            "Loaded {} cached embeddings from {}",
            vectors.len(),
            path.display()
        );
        Ok(Self { vectors })
    }

    pub fn from_vectors(vectors: HashMap<String, Vec<f32>>) -> Self {
        Self { vectors }
    }

    pub fn get(&self, text: &str) -> Option<&[f32]> {
        self.vectors.get(text).map(Vec::as_slice)
    }
}

/// `1 - ||a - b|| / 2`, clipped to `[0, 1]`.
///
/// For unit vectors the distance lies in `[0, 2]`, so identical texts score 1
/// and opposite ones 0.
pub fn l2_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        bail!("embedding dimensions differ: {} vs {}", a.len(), b.len());
    }
    if a.is_empty() {
        bail!("embeddings must not be empty");
    }
    let distance = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum::<f64>()
        .sqrt();
    Ok((1.0 - distance / 2.0).clamp(0.0, 1.0))
}

/// Scores captions by embedding distance to the translated query.
pub struct EmbeddingScorer {
    store: EmbeddingStore,
    translator: Box<dyn Translator>,
}

impl EmbeddingScorer {
    pub fn new(store: EmbeddingStore, translator: Box<dyn Translator>) -> Self {
        Self { store, translator }
    }

    pub fn translate_query(&self, query: &str) -> String {
        self.translator.translate(query)
    }

    pub fn query_vector(&self, query: &str) -> Result<&[f32]> {
        let translated = self.translate_query(query);
        self.store
            .get(&translated)
            .ok_or_else(|| anyhow!("no cached embedding for query '{translated}'"))
    }

    pub fn caption_vector<'a>(&'a self, clip: &'a Clip) -> Result<&'a [f32]> {
        if let Some(embedding) = clip.embedding.as_deref() {
            return Ok(embedding);
        }
        self.store
            .get(&clip.caption)
            .ok_or_else(|| anyhow!("no embedding for caption '{}'", clip.caption))
    }
}

impl SimilarityScorer for EmbeddingScorer {
    fn score(&self, query: &str, clip: &Clip) -> Result<f64> {
        let query_vec = self.query_vector(query)?;
        let caption_vec = self.caption_vector(clip)?;
        l2_similarity(query_vec, caption_vec)
    }
}
