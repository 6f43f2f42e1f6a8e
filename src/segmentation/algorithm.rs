use serde::{Deserialize, Serialize};

use crate::segmentation::config::DetectionConfig;

/// One point of a similarity curve: a clip start time and its query similarity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: f64,
    pub similarity: f64,
}

impl Sample {
    pub fn new(timestamp: f64, similarity: f64) -> Self {
        Self {
            timestamp,
            similarity,
        }
    }

    fn is_hit(&self, config: &DetectionConfig) -> bool {
        self.similarity >= config.threshold
    }
}

/// A maximal run of consecutive samples at or above the threshold.
///
/// Spans the first and last timestamp of the run, so a single-sample run
/// has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedSegment {
    pub start: f64,
    pub end: f64,
}

/// Scan samples in order and group consecutive hits into segments.
///
/// Samples are expected sorted by timestamp. A below-threshold sample closes
/// the open run; the end of input closes the last one.
pub fn detect_segments(samples: &[Sample], config: &DetectionConfig) -> Vec<DetectedSegment> {
    let mut segments = Vec::new();
    let mut current: Option<DetectedSegment> = None;

    for sample in samples {
        match &mut current {
            Some(segment) if sample.is_hit(config) => {
                segment.end = sample.timestamp;
            }
            None if sample.is_hit(config) => {
                current = Some(DetectedSegment {
                    start: sample.timestamp,
                    end: sample.timestamp,
                });
            }
            _ => {
                if let Some(segment) = current.take() {
                    segments.push(segment);
                }
            }
        }
    }

    if let Some(segment) = current {
        segments.push(segment);
    }

    segments
}
