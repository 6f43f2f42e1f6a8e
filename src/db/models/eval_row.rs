use serde::{Deserialize, Serialize};

use crate::db::helpers::seconds;

/// One annotated query from the evaluation dataset.
///
/// Column aliases match the spreadsheet headers the dataset is exported from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalRow {
    #[serde(alias = "Query")]
    pub query: String,
    #[serde(default, alias = "VideoURL")]
    pub video_url: Option<String>,
    #[serde(default, alias = "MatchedName")]
    pub matched_name: Option<String>,
    #[serde(alias = "StartTime", deserialize_with = "seconds")]
    pub start_time: f64,
    #[serde(alias = "EndTime", deserialize_with = "seconds")]
    pub end_time: f64,
}
