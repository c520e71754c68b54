//! Links to the full audit reports, shown at the bottom of the PR comment.
//!
//! The file format is the one Lighthouse CI writes after uploading
//! (`.lighthouseci/links.json`): a JSON object of audited URL -> report URL.

use crate::errors::{ScoreGateError, ScoreGateResult};
use std::collections::BTreeMap;
use std::path::Path;

/// Label -> URL, ordered by label.
pub type ReportLinks = BTreeMap<String, String>;

pub fn load_report_links(path: &Path) -> ScoreGateResult<ReportLinks> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ScoreGateError::report_load_at(path, format!("cannot read report links: {e}"))
    })?;
    parse_report_links(&raw)
        .map_err(|message| ScoreGateError::report_load_at(path, message))
}

pub fn parse_report_links(raw: &str) -> Result<ReportLinks, String> {
    let links: ReportLinks = serde_json::from_str(raw)
        .map_err(|e| format!("report links must be a JSON object of strings: {e}"))?;
    if let Some((label, _)) = links.iter().find(|(_, url)| url.trim().is_empty()) {
        return Err(format!("report link `{label}` has an empty URL"));
    }
    Ok(links)
}
