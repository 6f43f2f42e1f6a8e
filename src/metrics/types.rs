use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-query scores for one similarity curve against one ground truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Highest similarity inside the ground-truth interval
    pub max_similarity: f64,
    /// Mean similarity inside the ground-truth interval
    pub mean_similarity: f64,
    /// Share of in-interval samples at or above the threshold
    pub gt_coverage: f64,
    /// Summed intersection over summed union of detected segments
    pub precision: f64,
    /// Summed intersection over ground-truth length
    pub recall: f64,
    pub f1_score: f64,
}

impl MetricsRecord {
    pub fn get(&self, name: MetricName) -> f64 {
        match name {
            MetricName::MaxSimilarity => self.max_similarity,
            MetricName::MeanSimilarity => self.mean_similarity,
            MetricName::GtCoverage => self.gt_coverage,
            MetricName::Precision => self.precision,
            MetricName::Recall => self.recall,
            MetricName::F1Score => self.f1_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    MaxSimilarity,
    MeanSimilarity,
    GtCoverage,
    Precision,
    Recall,
    F1Score,
}

impl MetricName {
    pub const ALL: [MetricName; 6] = [
        MetricName::MaxSimilarity,
        MetricName::MeanSimilarity,
        MetricName::GtCoverage,
        MetricName::Precision,
        MetricName::Recall,
        MetricName::F1Score,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::MaxSimilarity => "max_similarity",
            MetricName::MeanSimilarity => "mean_similarity",
            MetricName::GtCoverage => "gt_coverage",
            MetricName::Precision => "precision",
            MetricName::Recall => "recall",
            MetricName::F1Score => "f1_score",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distribution of one metric across the queries of one source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl SummaryStats {
    /// `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            mean,
            std: variance.sqrt(),
            min,
            max,
        })
    }
}

/// Summary for one data source. Empty when no query was scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub queries: usize,
    pub skipped: usize,
    pub metrics: BTreeMap<MetricName, SummaryStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_uses_population_std() {
        let stats = SummaryStats::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert!((stats.std - 1.25f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn summary_of_nothing_is_none() {
        assert!(SummaryStats::from_values(&[]).is_none());
    }

    #[test]
    fn metric_names_follow_record_field_order() {
        let record = MetricsRecord {
            max_similarity: 1.0,
            mean_similarity: 2.0,
            gt_coverage: 3.0,
            precision: 4.0,
            recall: 5.0,
            f1_score: 6.0,
        };
        let values: Vec<f64> = MetricName::ALL.iter().map(|&m| record.get(m)).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(MetricName::F1Score.to_string(), "f1_score");
    }

    #[test]
    fn metric_names_serialize_as_field_names() {
        let json = serde_json::to_string(&MetricName::GtCoverage).unwrap();
        assert_eq!(json, "\"gt_coverage\"");
    }
}
