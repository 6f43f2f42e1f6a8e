use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::db::models::{Clip, EvalRow};

/// Schema of a clip database, chosen per source at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `clips_embedding.json`: clips keyed by `video_id`
    Clips,
    /// `*_t2v_captions.json`: clips keyed by `video_path`
    #[serde(alias = "t2v")]
    Captions,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Clips => "clips",
            SourceKind::Captions => "captions",
        }
    }

    pub fn lookup(&self) -> Box<dyn ClipLookup> {
        match self {
            SourceKind::Clips => Box::new(ByVideoId),
            SourceKind::Captions => Box::new(ByVideoPath),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "clips" => Ok(SourceKind::Clips),
            "captions" | "t2v" => Ok(SourceKind::Captions),
            other => Err(anyhow!("unknown source kind '{other}' (expected clips or captions)")),
        }
    }
}

/// How a dataset row is resolved to the clips of its video.
pub trait ClipLookup {
    /// Identifier of the row's video in this schema, if the row carries one.
    fn identifier(&self, row: &EvalRow) -> Option<String>;

    fn matches(&self, clip: &Clip, identifier: &str) -> bool;
}

/// Exact match on `video_id`; the identifier is the tail of the row's URL
/// after its last `=` (the `v=` parameter of a watch URL).
pub struct ByVideoId;

impl ClipLookup for ByVideoId {
    fn identifier(&self, row: &EvalRow) -> Option<String> {
        let url = row.video_url.as_deref()?;
        url.rsplit('=').next().map(str::to_string)
    }

    fn matches(&self, clip: &Clip, identifier: &str) -> bool {
        clip.video_id.as_deref() == Some(identifier)
    }
}

/// Substring match of the row's matched name inside `video_path`.
pub struct ByVideoPath;

impl ClipLookup for ByVideoPath {
    fn identifier(&self, row: &EvalRow) -> Option<String> {
        row.matched_name.clone()
    }

    fn matches(&self, clip: &Clip, identifier: &str) -> bool {
        clip.video_path
            .as_deref()
            .is_some_and(|path| path.contains(identifier))
    }
}
