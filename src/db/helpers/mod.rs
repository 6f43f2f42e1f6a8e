use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Deserializer};

/// Clip databases store times either as JSON numbers or as numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeconds {
    Number(f64),
    Text(String),
}

pub fn parse_seconds(value: &str, field: &str) -> Result<f64> {
    let seconds: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("failed to parse {field} '{value}' as seconds"))?;
    if !seconds.is_finite() {
        return Err(anyhow!("{field} must be finite, got '{value}'"));
    }
    Ok(seconds)
}

fn resolve(raw: RawSeconds) -> Result<f64> {
    match raw {
        RawSeconds::Number(value) => Ok(value),
        RawSeconds::Text(text) => parse_seconds(&text, "time"),
    }
}

pub fn seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawSeconds::deserialize(deserializer)?;
    resolve(raw).map_err(serde::de::Error::custom)
}

pub fn optional_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawSeconds>::deserialize(deserializer)? {
        Some(raw) => resolve(raw).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
