use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::metrics::MetricsRecord;
use crate::segmentation::algorithm::{detect_segments, DetectedSegment, Sample};
use crate::segmentation::config::DetectionConfig;

/// Annotated time span that answers a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundTruth {
    pub start: f64,
    pub end: f64,
}

impl GroundTruth {
    /// Build a validated interval. `compute_metrics` accepts any interval,
    /// but loaders go through here so inverted rows never reach it.
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            bail!("ground truth bounds must be finite, got ({start}, {end})");
        }
        if start > end {
            bail!("ground truth start {start} is after end {end}");
        }
        Ok(Self { start, end })
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, timestamp: f64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// Summed intersection and union of detected segments against the ground truth.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverlapTotals {
    pub intersection: f64,
    pub union: f64,
}

/// Accumulate overlap per segment, independently.
///
/// Only strictly positive overlaps count; touching endpoints add nothing.
/// Totals are sums over segments, not the area of a set union.
pub fn overlap_totals(segments: &[DetectedSegment], gt: &GroundTruth) -> OverlapTotals {
    let mut totals = OverlapTotals::default();

    for segment in segments {
        let intersection_start = segment.start.max(gt.start);
        let intersection_end = segment.end.min(gt.end);

        if intersection_end > intersection_start {
            totals.intersection += intersection_end - intersection_start;
            totals.union += segment.end.max(gt.end) - segment.start.min(gt.start);
        }
    }

    totals
}

/// Score one similarity curve against one ground-truth interval.
///
/// Never fails: anything undefined (no samples in the interval, no detected
/// segments, zero union, zero-length interval) stays at 0.
pub fn compute_metrics(
    samples: &[Sample],
    gt: &GroundTruth,
    config: &DetectionConfig,
) -> MetricsRecord {
    let mut record = MetricsRecord::default();

    // Statistics over the samples inside the ground-truth interval
    let gt_similarities: Vec<f64> = samples
        .iter()
        .filter(|s| gt.contains(s.timestamp))
        .map(|s| s.similarity)
        .collect();

    if !gt_similarities.is_empty() {
        let count = gt_similarities.len() as f64;
        record.max_similarity = gt_similarities
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        record.mean_similarity = gt_similarities.iter().sum::<f64>() / count;

        let high_count = gt_similarities
            .iter()
            .filter(|&&s| s >= config.threshold)
            .count();
        record.gt_coverage = high_count as f64 / count;
    }

    let segments = detect_segments(samples, config);
    let totals = overlap_totals(&segments, gt);

    if totals.union > 0.0 {
        record.precision = totals.intersection / totals.union;
        // A positive union implies strict overlap, which a zero-length
        // interval cannot have; the guard keeps recall finite regardless.
        if gt.duration() > 0.0 {
            record.recall = totals.intersection / gt.duration();
        }
        record.f1_score = f1(record.precision, record.recall);
    }

    record
}

/// Harmonic mean of precision and recall, 0 when both are 0.
pub fn f1(precision: f64, recall: f64) -> f64 {
    let denominator = precision + recall;
    if denominator > 0.0 {
        2.0 * precision * recall / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn curve(points: &[(f64, f64)]) -> Vec<Sample> {
        points.iter().map(|&(t, s)| Sample::new(t, s)).collect()
    }

    fn gt(start: f64, end: f64) -> GroundTruth {
        GroundTruth::new(start, end).unwrap()
    }

    #[test]
    fn exact_hit_scores_perfectly() {
        let samples = curve(&[(0.0, 0.1), (1.0, 0.9), (2.0, 0.8), (3.0, 0.2)]);
        let record = compute_metrics(&samples, &gt(1.0, 2.0), &DetectionConfig::default());

        assert!((record.max_similarity - 0.9).abs() < EPS);
        assert!((record.mean_similarity - 0.85).abs() < EPS);
        assert!((record.gt_coverage - 1.0).abs() < EPS);
        assert!((record.precision - 1.0).abs() < EPS);
        assert!((record.recall - 1.0).abs() < EPS);
        assert!((record.f1_score - 1.0).abs() < EPS);
    }

    #[test]
    fn nothing_above_threshold_only_fills_similarity_stats() {
        let samples = curve(&[(0.0, 0.3), (1.0, 0.2)]);
        let record = compute_metrics(&samples, &gt(0.0, 1.0), &DetectionConfig::default());

        assert!((record.max_similarity - 0.3).abs() < EPS);
        assert!((record.mean_similarity - 0.25).abs() < EPS);
        assert_eq!(record.gt_coverage, 0.0);
        assert_eq!(record.precision, 0.0);
        assert_eq!(record.recall, 0.0);
        assert_eq!(record.f1_score, 0.0);
    }

    #[test]
    fn empty_curve_is_all_zeros() {
        let record = compute_metrics(&[], &gt(3.0, 9.0), &DetectionConfig::default());
        assert_eq!(record, MetricsRecord::default());
    }

    #[test]
    fn disjoint_segments_sum_intersections_and_unions() {
        // Segments [0,1] and [3,4] against gt [0.5,3.5]:
        //   seg 1: inter 0.5, union 3.5
        //   seg 2: inter 0.5, union 3.5
        // precision = 1/7 (a true set IoU would give 1/4), recall = 1/3
        let samples = curve(&[
            (0.0, 0.9),
            (1.0, 0.9),
            (2.0, 0.1),
            (3.0, 0.9),
            (4.0, 0.9),
            (5.0, 0.1),
        ]);
        let record = compute_metrics(&samples, &gt(0.5, 3.5), &DetectionConfig::default());

        assert!((record.precision - 1.0 / 7.0).abs() < EPS);
        assert!((record.recall - 1.0 / 3.0).abs() < EPS);
        assert!((record.f1_score - 0.2).abs() < EPS);
        assert!((record.max_similarity - 0.9).abs() < EPS);
        assert!((record.mean_similarity - 1.9 / 3.0).abs() < EPS);
        assert!((record.gt_coverage - 2.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        let segments = [DetectedSegment { start: 0.0, end: 2.0 }];
        let totals = overlap_totals(&segments, &gt(2.0, 5.0));
        assert_eq!(totals, OverlapTotals::default());
    }

    #[test]
    fn single_sample_segment_never_overlaps() {
        let samples = curve(&[(0.0, 0.1), (2.0, 0.9), (4.0, 0.1)]);
        let record = compute_metrics(&samples, &gt(1.0, 3.0), &DetectionConfig::default());
        assert_eq!(record.precision, 0.0);
        assert_eq!(record.recall, 0.0);
        assert!((record.gt_coverage - 1.0).abs() < EPS);
    }

    #[test]
    fn zero_length_ground_truth_has_no_recall() {
        let samples = curve(&[(0.0, 0.9), (1.0, 0.9), (2.0, 0.9)]);
        let record = compute_metrics(&samples, &gt(1.0, 1.0), &DetectionConfig::default());
        assert_eq!(record.precision, 0.0);
        assert_eq!(record.recall, 0.0);
        assert_eq!(record.f1_score, 0.0);
        assert!((record.max_similarity - 0.9).abs() < EPS);
        assert!((record.gt_coverage - 1.0).abs() < EPS);
    }

    #[test]
    fn detection_past_the_interval_lowers_precision() {
        let samples = curve(&[(0.0, 0.9), (10.0, 0.9), (20.0, 0.2)]);
        let record = compute_metrics(&samples, &gt(0.0, 5.0), &DetectionConfig::default());
        assert!((record.precision - 0.5).abs() < EPS);
        assert!((record.recall - 1.0).abs() < EPS);
        assert!((record.f1_score - 2.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn rejects_inverted_interval() {
        assert!(GroundTruth::new(5.0, 1.0).is_err());
        assert!(GroundTruth::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn f1_is_zero_without_both_components() {
        assert_eq!(f1(0.0, 0.0), 0.0);
        assert_eq!(f1(0.7, 0.0), 0.0);
        assert_eq!(f1(0.0, 0.4), 0.0);
    }

    fn arb_curve() -> impl Strategy<Value = Vec<Sample>> {
        prop::collection::vec((0.0f64..10.0, 0.0f64..=1.0), 0..48).prop_map(|mut points| {
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            points
                .into_iter()
                .map(|(t, s)| Sample::new(t, s))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn bounded_metrics_stay_in_unit_interval(
            samples in arb_curve(),
            start in 0.0f64..10.0,
            len in 0.0f64..10.0,
            threshold in 0.0f64..=1.0,
        ) {
            let config = DetectionConfig::new(threshold).unwrap();
            let record = compute_metrics(&samples, &gt(start, start + len), &config);

            prop_assert!((0.0..=1.0).contains(&record.gt_coverage));
            prop_assert!((0.0..=1.0).contains(&record.precision));
            prop_assert!((0.0..=1.0 + EPS).contains(&record.recall));
            prop_assert!((0.0..=1.0 + EPS).contains(&record.f1_score));
        }

        #[test]
        fn coverage_is_zero_without_samples_in_interval(
            samples in arb_curve(),
            threshold in 0.0f64..=1.0,
        ) {
            let config = DetectionConfig::new(threshold).unwrap();
            let record = compute_metrics(&samples, &gt(20.0, 30.0), &config);
            prop_assert_eq!(record.gt_coverage, 0.0);
            prop_assert_eq!(record.max_similarity, 0.0);
        }

        #[test]
        fn f1_is_harmonic_mean(
            samples in arb_curve(),
            start in 0.0f64..10.0,
            len in 0.0f64..10.0,
        ) {
            let config = DetectionConfig::default();
            let record = compute_metrics(&samples, &gt(start, start + len), &config);
            if record.precision == 0.0 || record.recall == 0.0 {
                prop_assert_eq!(record.f1_score, 0.0);
            } else {
                let expected = 2.0 * record.precision * record.recall
                    / (record.precision + record.recall);
                prop_assert!((record.f1_score - expected).abs() < EPS);
            }
        }
    }
}
