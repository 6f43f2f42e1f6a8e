use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

/// Maps a query into the language the caption embeddings were built in.
pub trait Translator {
    fn translate(&self, text: &str) -> String;
}

/// Leaves queries untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Translator for Passthrough {
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Whole-query phrase table, loaded from a JSON object of `source: target`.
///
/// Unknown queries pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    entries: HashMap<String, String>,
}

impl Glossary {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read glossary from {}", path.display()))?;
        let entries: HashMap<String, String> = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse glossary {}", path.display()))?;
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: HashMap<String, String>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(source, target)| (source.trim().to_string(), target))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Translator for Glossary {
    fn translate(&self, text: &str) -> String {
        match self.entries.get(text.trim()) {
            Some(target) => target.clone(),
            None => {
                debug!("No glossary entry for '{text}', using it as-is");
                text.to_string()
            }
        }
    }
}
