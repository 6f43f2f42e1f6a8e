use anyhow::Result;
use log::warn;
use serde::Serialize;

use crate::db::models::Clip;
use crate::db::ClipDatabase;
use crate::similarity::embedding::EmbeddingScorer;

/// One ranked caption returned by [`top_k`].
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub caption: String,
    pub score: f64,
    pub video_path: Option<String>,
    pub video_id: Option<String>,
    pub clip_id: String,
    pub start_time: f64,
    pub end_time: Option<f64>,
}

impl SearchHit {
    fn from_clip(clip: &Clip, score: f64) -> Self {
        Self {
            caption: clip.caption.clone(),
            score,
            video_path: clip.video_path.clone(),
            video_id: clip.video_id.clone(),
            clip_id: clip.clip_label(),
            start_time: clip.start_time,
            end_time: clip.end_time,
        }
    }
}

fn normalized(vector: &[f32]) -> Vec<f64> {
    let norm = vector
        .iter()
        .map(|v| f64::from(*v) * f64::from(*v))
        .sum::<f64>()
        .sqrt();
    if norm == 0.0 {
        return vec![0.0; vector.len()];
    }
    vector.iter().map(|v| f64::from(*v) / norm).collect()
}

fn cosine(query: &[f64], caption: &[f32]) -> f64 {
    let caption = normalized(caption);
    query.iter().zip(&caption).map(|(a, b)| a * b).sum()
}

/// Rank every clip by cosine similarity to the query, best first.
///
/// A linear scan over the database; clips without a resolvable embedding or
/// with a mismatched dimension are left out. A query that translates to
/// nothing has no hits.
pub fn top_k(
    db: &ClipDatabase,
    scorer: &EmbeddingScorer,
    query: &str,
    k: usize,
) -> Result<Vec<SearchHit>> {
    if scorer.translate_query(query).trim().is_empty() {
        warn!("Query '{query}' translated to nothing; no hits");
        return Ok(Vec::new());
    }

    let query_vec = normalized(scorer.query_vector(query)?);

    let mut hits: Vec<SearchHit> = db
        .clips()
        .iter()
        .filter_map(|clip| {
            let caption_vec = scorer.caption_vector(clip).ok()?;
            (caption_vec.len() == query_vec.len())
                .then(|| SearchHit::from_clip(clip, cosine(&query_vec, caption_vec)))
        })
        .collect();

    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(k);
    Ok(hits)
}
