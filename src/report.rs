use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::evaluation::NamedSummary;

/// Everything one `evaluate` run produced, as written to the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub dataset: PathBuf,
    pub threshold: f64,
    pub sources: Vec<NamedSummary>,
}

impl EvaluationReport {
    pub fn new(dataset: PathBuf, threshold: f64, sources: Vec<NamedSummary>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            dataset,
            threshold,
            sources,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create report directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write report to {}", path.display()))
    }
}

/// Human-readable summary: one block per source, four stats per metric.
pub fn render_text(sources: &[NamedSummary]) -> String {
    let mut out = String::from("Performance Summary:\n");

    for source in sources {
        let _ = writeln!(out, "\n=== {} ===", source.name);
        let _ = writeln!(
            out,
            "queries: {}  skipped: {}",
            source.summary.queries, source.summary.skipped
        );

        for (metric, stats) in &source.summary.metrics {
            let _ = writeln!(out, "\n{metric}:");
            let _ = writeln!(out, "  mean: {:.4}", stats.mean);
            let _ = writeln!(out, "  std: {:.4}", stats.std);
            let _ = writeln!(out, "  min: {:.4}", stats.min);
            let _ = writeln!(out, "  max: {:.4}", stats.max);
        }
    }

    out
}
