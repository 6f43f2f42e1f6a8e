mod types;

pub use types::{MetricName, MetricsRecord, SourceSummary, SummaryStats};

/// Per-metric value lists for one data source, in query order.
#[derive(Debug, Clone, Default)]
pub struct MetricsAccumulator {
    values: [Vec<f64>; 6],
    skipped: usize,
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: &MetricsRecord) {
        for name in MetricName::ALL {
            self.values[name.index()].push(record.get(name));
        }
    }

    /// Count a query that produced no record. Skips never enter the statistics.
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn values(&self, name: MetricName) -> &[f64] {
        &self.values[name.index()]
    }

    pub fn query_count(&self) -> usize {
        self.values[0].len()
    }

    pub fn summarize(&self) -> SourceSummary {
        let metrics = MetricName::ALL
            .iter()
            .filter_map(|&name| {
                SummaryStats::from_values(self.values(name)).map(|stats| (name, stats))
            })
            .collect();

        SourceSummary {
            queries: self.query_count(),
            skipped: self.skipped,
            metrics,
        }
    }
}
