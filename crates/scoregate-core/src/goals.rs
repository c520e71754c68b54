//! Goals declaration: minimum score per category, the variants to judge, and
//! at most one bundle-size budget.
//!
//! ```yaml
//! version: 1
//! aggregation: best
//! variants: [anonymous, authenticated]
//! goals:
//!   performance:
//!     min_score: 90
//!     bundle:
//!       max_kb: 200
//!       pattern: "main.*.js"
//!   accessibility: 95
//! ```

use crate::aggregate::Aggregation;
use crate::errors::{ScoreGateError, ScoreGateResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

pub const DEFAULT_VARIANTS: [&str; 2] = ["anonymous", "authenticated"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleBudget {
    pub max_kb: f64,
    /// Glob matched against artifact file names (or relative paths when it contains `/`).
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goal {
    pub category: String,
    pub min_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<BundleBudget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goals {
    pub version: u32,
    pub aggregation: Aggregation,
    pub variants: Vec<String>,
    /// Declaration order is preserved and drives output order.
    pub goals: Vec<Goal>,
    /// `sha256:<hex>` of the declaration bytes.
    #[serde(skip)]
    pub digest: String,
}

impl Goals {
    pub fn categories(&self) -> Vec<String> {
        self.goals.iter().map(|g| g.category.clone()).collect()
    }

    pub fn goal(&self, category: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.category == category)
    }

    /// The single category carrying a bundle budget, if any.
    pub fn bundle(&self) -> Option<(&Goal, &BundleBudget)> {
        self.goals
            .iter()
            .find_map(|g| g.bundle.as_ref().map(|b| (g, b)))
    }

    /// Replace the aggregation strategy (CLI override), keeping everything else.
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGoals {
    version: Option<u32>,
    #[serde(default)]
    aggregation: Option<Aggregation>,
    #[serde(default)]
    variants: Option<Vec<String>>,
    #[serde(default)]
    goals: serde_yaml::Mapping,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGoalDetail {
    min_score: f64,
    #[serde(default)]
    bundle: Option<RawBundle>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBundle {
    max_kb: f64,
    pattern: String,
}

pub fn load_goals(path: &Path) -> ScoreGateResult<Goals> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ScoreGateError::config_at(path, format!("failed to read goals declaration: {e}"))
    })?;
    parse_goals(&raw).map_err(|e| match e {
        ScoreGateError::Config { path: None, message } => ScoreGateError::Config {
            path: Some(path.to_path_buf()),
            message,
        },
        other => other,
    })
}

pub fn parse_goals(raw: &str) -> ScoreGateResult<Goals> {
    let cfg: RawGoals = serde_yaml::from_str(raw)
        .map_err(|e| ScoreGateError::config(format!("failed to parse YAML: {e}")))?;

    let version = cfg
        .version
        .ok_or_else(|| ScoreGateError::config("missing `version`"))?;
    if version != SUPPORTED_CONFIG_VERSION {
        return Err(ScoreGateError::config(format!(
            "unsupported config version {} (supported: {})",
            version, SUPPORTED_CONFIG_VERSION
        )));
    }

    let variants = validate_variants(
        cfg.variants
            .unwrap_or_else(|| DEFAULT_VARIANTS.iter().map(|v| v.to_string()).collect()),
    )?;

    if cfg.goals.is_empty() {
        return Err(ScoreGateError::config("`goals` must declare at least one category"));
    }

    let mut goals = Vec::with_capacity(cfg.goals.len());
    for (key, value) in &cfg.goals {
        let category = key
            .as_str()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ScoreGateError::config(format!("goal category must be a non-empty string, got {key:?}"))
            })?
            .to_string();
        if goals.iter().any(|g: &Goal| g.category == category) {
            return Err(ScoreGateError::config(format!(
                "duplicate goal category `{category}`"
            )));
        }
        goals.push(parse_goal(category, value)?);
    }

    let with_bundle: Vec<&str> = goals
        .iter()
        .filter(|g| g.bundle.is_some())
        .map(|g| g.category.as_str())
        .collect();
    if with_bundle.len() > 1 {
        return Err(ScoreGateError::config(format!(
            "only one category may declare a bundle budget, found: {}",
            with_bundle.join(", ")
        )));
    }

    Ok(Goals {
        version,
        aggregation: cfg.aggregation.unwrap_or_default(),
        variants,
        goals,
        digest: digest(raw.as_bytes()),
    })
}

fn parse_goal(category: String, value: &serde_yaml::Value) -> ScoreGateResult<Goal> {
    let (min_score, bundle) = match value {
        serde_yaml::Value::Number(n) => {
            let score = n.as_f64().ok_or_else(|| {
                ScoreGateError::config(format!("goal `{category}`: score is not a number"))
            })?;
            (score, None)
        }
        serde_yaml::Value::Mapping(_) => {
            let detail: RawGoalDetail = serde_yaml::from_value(value.clone())
                .map_err(|e| ScoreGateError::config(format!("goal `{category}`: {e}")))?;
            (detail.min_score, detail.bundle)
        }
        other => {
            return Err(ScoreGateError::config(format!(
                "goal `{category}`: expected a score or a mapping with `min_score`, got {other:?}"
            )))
        }
    };

    if !min_score.is_finite() || !(0.0..=100.0).contains(&min_score) {
        return Err(ScoreGateError::config(format!(
            "goal `{category}`: min_score {min_score} is outside 0..=100"
        )));
    }

    let bundle = bundle
        .map(|b| validate_bundle(&category, b))
        .transpose()?;

    Ok(Goal {
        category,
        min_score,
        bundle,
    })
}

fn validate_bundle(category: &str, raw: RawBundle) -> ScoreGateResult<BundleBudget> {
    if !raw.max_kb.is_finite() || raw.max_kb <= 0.0 {
        return Err(ScoreGateError::config(format!(
            "goal `{category}`: bundle.max_kb must be a positive number, got {}",
            raw.max_kb
        )));
    }
    let pattern = raw.pattern.trim().to_string();
    if pattern.is_empty() {
        return Err(ScoreGateError::config(format!(
            "goal `{category}`: bundle.pattern must not be empty"
        )));
    }
    globset::Glob::new(&pattern).map_err(|e| {
        ScoreGateError::config(format!("goal `{category}`: invalid bundle.pattern: {e}"))
    })?;
    Ok(BundleBudget {
        max_kb: raw.max_kb,
        pattern,
    })
}

/// Variant names are matched against single file-name tokens, so they may
/// not contain the `-`, `_` or `.` separators.
fn validate_variants(variants: Vec<String>) -> ScoreGateResult<Vec<String>> {
    if variants.is_empty() {
        return Err(ScoreGateError::config("`variants` must not be empty"));
    }
    let mut out: Vec<String> = Vec::with_capacity(variants.len());
    for v in variants {
        let v = v.trim().to_string();
        if v.is_empty() || !v.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ScoreGateError::config(format!(
                "variant `{v}` must be a non-empty alphanumeric name"
            )));
        }
        if out.iter().any(|existing| existing.eq_ignore_ascii_case(&v)) {
            return Err(ScoreGateError::config(format!("duplicate variant `{v}`")));
        }
        out.push(v);
    }
    Ok(out)
}

fn digest(bytes: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(bytes)))
}

/// Starter declaration written by `scoregate init`.
pub const SAMPLE_GOALS: &str = r#"version: 1

# How repeated runs of the same variant are combined: best | median | first
aggregation: best

# Report files are grouped by the variant token in their file name,
# e.g. lighthouse-anonymous-1.json, lighthouse-authenticated-2.json
variants: [anonymous, authenticated]

goals:
  performance:
    min_score: 90
    bundle:
      max_kb: 200
      pattern: "main.*.js"
  accessibility: 95
  best-practices: 90
  seo: 90
"#;
