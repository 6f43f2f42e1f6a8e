use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use log::info;
use serde::de::DeserializeOwned;

pub mod helpers;
pub mod lookup;
pub mod models;

pub use lookup::{ClipLookup, SourceKind};
use models::{Clip, EvalRow};

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {what} {}", path.display()))
}

/// An in-memory clip database loaded from a JSON array of clips.
#[derive(Debug, Clone)]
pub struct ClipDatabase {
    path: PathBuf,
    clips: Vec<Clip>,
}

impl ClipDatabase {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let clips: Vec<Clip> = read_json(&path, "clip database")?;
        info!("Loaded {} clips from {}", clips.len(), path.display());
        Ok(Self { path, clips })
    }

    pub fn from_clips(path: impl Into<PathBuf>, clips: Vec<Clip>) -> Self {
        Self {
            path: path.into(),
            clips,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name: the file stem, e.g. `test_db_d5_t2v_captions`.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Clips of one video, sorted by start time ascending.
    pub fn clips_for(&self, lookup: &dyn ClipLookup, identifier: &str) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self
            .clips
            .iter()
            .filter(|clip| lookup.matches(clip, identifier))
            .collect();
        clips.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        clips
    }
}

/// Annotated queries with their ground-truth intervals.
#[derive(Debug, Clone, Default)]
pub struct EvalDataset {
    rows: Vec<EvalRow>,
}

impl EvalDataset {
    pub fn load(path: &Path) -> Result<Self> {
        let rows: Vec<EvalRow> = read_json(path, "evaluation dataset")?;
        for (index, row) in rows.iter().enumerate() {
            if row.start_time > row.end_time {
                bail!(
                    "row {index} ('{}') has start {} after end {}",
                    row.query,
                    row.start_time,
                    row.end_time
                );
            }
        }
        info!("Loaded {} evaluation rows from {}", rows.len(), path.display());
        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<EvalRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[EvalRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
