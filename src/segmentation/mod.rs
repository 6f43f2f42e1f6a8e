pub mod algorithm;
pub mod config;
pub mod scoring;

pub use algorithm::{detect_segments, DetectedSegment, Sample};
pub use config::DetectionConfig;
pub use scoring::{compute_metrics, GroundTruth};
