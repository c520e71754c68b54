//! Loading audit report files and grouping them by variant.
//!
//! Two report shapes are accepted:
//! - Lighthouse result JSON: `{"categories": {"performance": {"score": 0.93}}}`,
//!   scores in `0..=1`, normalised to `0..=100`.
//! - Flat map: `{"performance": 93}`, scores already in `0..=100`.
//!
//! The variant comes from the file name: the stem is split on `-`, `_` and
//! `.` and a token equal to a configured variant selects it, so
//! `lighthouse-anonymous-2.json` belongs to `anonymous`.

use crate::errors::{ScoreGateError, ScoreGateResult};
use crate::goals::Goals;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub variant: String,
    /// File stem; unique per audit execution.
    pub execution_id: String,
    pub source: PathBuf,
    /// Only categories declared in the goals are kept.
    pub scores: BTreeMap<String, f64>,
}

impl Report {
    pub fn score(&self, category: &str) -> Option<f64> {
        self.scores.get(category).copied()
    }
}

/// Reports per variant, each list in execution order.
pub type ReportsByVariant = BTreeMap<String, Vec<Report>>;

/// Scan `dir` for `*.json` reports and group them by configured variant.
///
/// Every configured variant must end up with at least one report, and every
/// report must carry every goal category.
pub fn load_reports(dir: &Path, goals: &Goals) -> ScoreGateResult<ReportsByVariant> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        ScoreGateError::report_load_at(dir, format!("cannot read reports directory: {e}"))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ScoreGateError::io(dir, e))?;
        let path = entry.path();
        let ft = entry.file_type().map_err(|e| ScoreGateError::io(&path, e))?;
        if !ft.is_file() {
            continue;
        }
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if !is_json {
            tracing::debug!(file = %path.display(), "skipping non-JSON file");
            continue;
        }
        files.push(path);
    }
    files.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));

    let categories = goals.categories();
    let mut by_variant: ReportsByVariant = BTreeMap::new();

    for path in files {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let variant = match infer_variant(&stem, &goals.variants) {
            Ok(Some(v)) => v.to_string(),
            Ok(None) => {
                tracing::warn!(
                    file = %path.display(),
                    "report file name names no configured variant; skipping"
                );
                continue;
            }
            Err(message) => return Err(ScoreGateError::report_load_at(&path, message)),
        };

        let raw = std::fs::read_to_string(&path)
            .map_err(|e| ScoreGateError::report_load_at(&path, format!("cannot read report: {e}")))?;
        let report = parse_report(&path, &variant, &stem, &raw, &categories)?;
        tracing::debug!(
            file = %path.display(),
            variant = %variant,
            "loaded report"
        );
        by_variant.entry(variant).or_default().push(report);
    }

    for variant in &goals.variants {
        if !by_variant.get(variant).is_some_and(|r| !r.is_empty()) {
            return Err(ScoreGateError::report_load_at(
                dir,
                format!("no reports found for variant `{variant}`"),
            ));
        }
    }

    Ok(by_variant)
}

/// Pick the configured variant named by a file stem.
///
/// `Ok(None)` when no token matches; `Err` when tokens name two different variants.
pub fn infer_variant<'a>(stem: &str, variants: &'a [String]) -> Result<Option<&'a str>, String> {
    let mut found: Option<&'a str> = None;
    for token in stem.split(['-', '_', '.']).filter(|t| !t.is_empty()) {
        let Some(v) = variants.iter().find(|v| v.eq_ignore_ascii_case(token)) else {
            continue;
        };
        match found {
            Some(prev) if prev != v.as_str() => {
                return Err(format!(
                    "file name names more than one variant (`{prev}` and `{v}`)"
                ));
            }
            _ => found = Some(v.as_str()),
        }
    }
    Ok(found)
}

/// Parse a single report body and keep the requested categories.
pub fn parse_report(
    path: &Path,
    variant: &str,
    execution_id: &str,
    raw: &str,
    categories: &[String],
) -> ScoreGateResult<Report> {
    let doc: Value = serde_json::from_str(raw)
        .map_err(|e| ScoreGateError::report_load_at(path, format!("invalid JSON: {e}")))?;
    let obj = doc
        .as_object()
        .ok_or_else(|| ScoreGateError::report_load_at(path, "report must be a JSON object"))?;

    let lighthouse = obj.get("categories").and_then(Value::as_object);

    let mut scores = BTreeMap::new();
    for category in categories {
        let score = match lighthouse {
            Some(cats) => lighthouse_score(cats, category),
            None => flat_score(obj, category),
        }
        .map_err(|message| ScoreGateError::report_load_at(path, message))?;
        scores.insert(category.clone(), score);
    }

    Ok(Report {
        variant: variant.to_string(),
        execution_id: execution_id.to_string(),
        source: path.to_path_buf(),
        scores,
    })
}

fn lighthouse_score(cats: &serde_json::Map<String, Value>, category: &str) -> Result<f64, String> {
    let entry = cats
        .get(category)
        .ok_or_else(|| format!("missing category `{category}`"))?;
    let raw = match entry.get("score") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::Null) | None => None,
        Some(other) => return Err(format!("category `{category}`: score is not a number: {other}")),
    }
    .ok_or_else(|| format!("category `{category}` has no score"))?;
    if !(0.0..=1.0).contains(&raw) {
        return Err(format!(
            "category `{category}`: score {raw} is outside 0..=1"
        ));
    }
    Ok((raw * 100.0).round())
}

fn flat_score(obj: &serde_json::Map<String, Value>, category: &str) -> Result<f64, String> {
    let value = obj
        .get(category)
        .ok_or_else(|| format!("missing category `{category}`"))?;
    let score = value
        .as_f64()
        .ok_or_else(|| format!("category `{category}`: score is not a number: {value}"))?;
    if !(0.0..=100.0).contains(&score) {
        return Err(format!(
            "category `{category}`: score {score} is outside 0..=100"
        ));
    }
    Ok(score)
}

fn file_name(p: &Path) -> String {
    p.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Compare names treating digit runs as numbers, so `run-2` sorts before `run-10`.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();
    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let na = take_digits(&mut ai);
                let nb = take_digits(&mut bi);
                let ord = na
                    .trim_start_matches('0')
                    .len()
                    .cmp(&nb.trim_start_matches('0').len())
                    .then_with(|| na.trim_start_matches('0').cmp(nb.trim_start_matches('0')))
                    .then_with(|| na.len().cmp(&nb.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut s = String::new();
    while let Some(c) = it.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        s.push(c);
        it.next();
    }
    s
}
