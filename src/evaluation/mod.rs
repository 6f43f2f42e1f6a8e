//! Batch driver: scores every dataset row against every clip source.
//!
//! Rows are processed one at a time. For each row the source's lookup
//! strategy resolves the video's clips, clips are sorted by start time, each
//! caption is scored against the query, and the resulting curve goes through
//! [`compute_metrics`]. Rows whose video has no clips are skipped.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;

use crate::db::{models::EvalRow, ClipDatabase, ClipLookup, EvalDataset, SourceKind};
use crate::metrics::{MetricsAccumulator, MetricsRecord, SourceSummary};
use crate::segmentation::{compute_metrics, DetectionConfig, GroundTruth, Sample};
use crate::similarity::SimilarityScorer;

/// A loaded clip database paired with the lookup strategy for its schema.
pub struct EvalSource {
    pub db: ClipDatabase,
    pub kind: SourceKind,
    lookup: Box<dyn ClipLookup>,
}

impl EvalSource {
    pub fn new(db: ClipDatabase, kind: SourceKind) -> Self {
        Self {
            db,
            kind,
            lookup: kind.lookup(),
        }
    }

    pub fn name(&self) -> String {
        self.db.name()
    }
}

/// Summary of one source, labelled for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct NamedSummary {
    pub name: String,
    pub path: PathBuf,
    pub kind: SourceKind,
    #[serde(flatten)]
    pub summary: SourceSummary,
}

pub struct Evaluator<'a> {
    scorer: &'a dyn SimilarityScorer,
    config: DetectionConfig,
}

impl<'a> Evaluator<'a> {
    pub fn new(scorer: &'a dyn SimilarityScorer, config: DetectionConfig) -> Self {
        Self { scorer, config }
    }

    /// Build the similarity curve of one row's video. `None` when the
    /// source has no clips for it.
    pub fn similarity_curve(
        &self,
        source: &EvalSource,
        row: &EvalRow,
    ) -> Result<Option<Vec<Sample>>> {
        let Some(identifier) = source.lookup.identifier(row) else {
            warn!(
                "Row '{}' has no {} identifier; skipping",
                row.query, source.kind
            );
            return Ok(None);
        };

        let clips = source.db.clips_for(source.lookup.as_ref(), &identifier);
        if clips.is_empty() {
            warn!("No clips found for video: {identifier}");
            return Ok(None);
        }

        let mut samples = Vec::with_capacity(clips.len());
        for clip in clips {
            let similarity = self.scorer.score(&row.query, clip).with_context(|| {
                format!(
                    "failed to score clip at {}s of {identifier}",
                    clip.start_time
                )
            })?;
            debug!("{identifier} @ {:.2}s -> {similarity:.4}", clip.start_time);
            samples.push(Sample::new(clip.start_time, similarity));
        }

        info!("Processed video: {identifier}");
        Ok(Some(samples))
    }

    pub fn evaluate_row(
        &self,
        source: &EvalSource,
        row: &EvalRow,
    ) -> Result<Option<MetricsRecord>> {
        let gt = GroundTruth::new(row.start_time, row.end_time)
            .with_context(|| format!("invalid ground truth for query '{}'", row.query))?;

        let Some(samples) = self.similarity_curve(source, row)? else {
            return Ok(None);
        };

        Ok(Some(compute_metrics(&samples, &gt, &self.config)))
    }

    pub fn evaluate_source(
        &self,
        source: &EvalSource,
        dataset: &EvalDataset,
    ) -> Result<SourceSummary> {
        info!("Processing DB: {}", source.db.path().display());
        let mut accumulator = MetricsAccumulator::new();

        for row in dataset.rows() {
            match self.evaluate_row(source, row)? {
                Some(record) => accumulator.record(&record),
                None => accumulator.record_skip(),
            }
        }

        let summary = accumulator.summarize();
        info!(
            "{}: {} queries scored, {} skipped",
            source.name(),
            summary.queries,
            summary.skipped
        );
        Ok(summary)
    }

    /// Evaluate each source in order over the same dataset.
    pub fn compare(
        &self,
        sources: &[EvalSource],
        dataset: &EvalDataset,
    ) -> Result<Vec<NamedSummary>> {
        sources
            .iter()
            .map(|source| {
                let summary = self.evaluate_source(source, dataset)?;
                Ok(NamedSummary {
                    name: source.name(),
                    path: source.db.path().to_path_buf(),
                    kind: source.kind,
                    summary,
                })
            })
            .collect()
    }
}
