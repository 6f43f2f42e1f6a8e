//! Clip record shared by both clip database schemas.
//!
//! The `clips` schema identifies videos by `video_id`; the `captions` schema
//! only carries a `video_path`. Either may hold a cached caption embedding.

use serde::{Deserialize, Serialize};

use crate::db::helpers::{optional_seconds, seconds};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub video_path: Option<String>,
    #[serde(default)]
    pub clip_id: Option<serde_json::Value>,
    pub caption: String,
    #[serde(deserialize_with = "seconds")]
    pub start_time: f64,
    #[serde(default, deserialize_with = "optional_seconds")]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl Clip {
    pub fn clip_label(&self) -> String {
        match &self.clip_id {
            Some(serde_json::Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}
