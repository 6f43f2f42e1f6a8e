use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::db::SourceKind;
use crate::segmentation::config::{DetectionConfig, DEFAULT_THRESHOLD};

/// A clip database to evaluate, with the schema it uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: PathBuf,
    pub kind: SourceKind,
}

impl FromStr for SourceConfig {
    type Err = anyhow::Error;

    /// `PATH:KIND`, e.g. `output/clips_embedding.json:clips`.
    fn from_str(value: &str) -> Result<Self> {
        let (path, kind) = value
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("source '{value}' must look like PATH:KIND"))?;
        Ok(Self {
            path: PathBuf::from(path),
            kind: kind.parse()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    #[default]
    Embedding,
    Lexical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalSettings {
    pub dataset: PathBuf,
    pub sources: Vec<SourceConfig>,
    pub threshold: f64,
    pub scorer: ScorerKind,
    pub query_embeddings: Option<PathBuf>,
    pub glossary: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl Default for EvalSettings {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("evaluation_dataset.json"),
            sources: vec![
                SourceConfig {
                    path: PathBuf::from("output/text2video/test_db_d5_t2v_captions.json"),
                    kind: SourceKind::Captions,
                },
                SourceConfig {
                    path: PathBuf::from("output/text2video/test_db_d1_t2v_captions.json"),
                    kind: SourceKind::Captions,
                },
                SourceConfig {
                    path: PathBuf::from("output/text2video/clips_embedding.json"),
                    kind: SourceKind::Clips,
                },
            ],
            threshold: DEFAULT_THRESHOLD,
            scorer: ScorerKind::default(),
            query_embeddings: None,
            glossary: None,
            output: None,
        }
    }
}

impl EvalSettings {
    /// Read settings from `path`, or fall back to defaults when it is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings {}", path.display()))
    }

    pub fn detection(&self) -> Result<DetectionConfig> {
        DetectionConfig::new(self.threshold)
    }
}
