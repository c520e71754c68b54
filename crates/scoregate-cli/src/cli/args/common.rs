//! Shared argument types.

use clap::ValueEnum;
use scoregate_core::Aggregation;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregationArg {
    /// Highest score across runs
    Best,
    /// Lower median of the runs
    Median,
    /// First run in file-name order
    First,
}

impl From<AggregationArg> for Aggregation {
    fn from(arg: AggregationArg) -> Self {
        match arg {
            AggregationArg::Best => Aggregation::Best,
            AggregationArg::Median => Aggregation::Median,
            AggregationArg::First => Aggregation::First,
        }
    }
}

/// `label=url`; the label may not be empty, the URL may contain `=`.
pub fn parse_link(raw: &str) -> Result<(String, String), String> {
    let (label, url) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=URL, got `{raw}`"))?;
    let label = label.trim();
    let url = url.trim();
    if label.is_empty() || url.is_empty() {
        return Err(format!("expected LABEL=URL, got `{raw}`"));
    }
    Ok((label.to_string(), url.to_string()))
}
