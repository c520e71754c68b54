//! summary.json: machine-readable outcome of a `scoregate check` run.
//!
//! Downstream tooling should branch on `(reason_code_version, reason_code)`
//! rather than on the exit code alone.

use crate::bundle::BundleCheck;
use crate::evaluate::{VariantVerdict, Verdict};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current schema version for summary.json
pub const SCHEMA_VERSION: u32 = 1;

/// Reason code registry version (stable for downstream branching).
pub const REASON_CODE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub schema_version: u32,

    pub reason_code_version: u32,

    /// 0=pass, 1=goal not met, 2=config or input error
    pub exit_code: i32,

    /// Stable machine-readable reason code (e.g. "E_REPORT_LOAD")
    pub reason_code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Suggested next step when exit_code != 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<String>,

    pub provenance: Provenance,

    /// RFC 3339 timestamp
    pub generated_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultsSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    pub scoregate_version: String,

    /// `sha256:<hex>` of the goals declaration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals_digest: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsSummary {
    /// Checks (category per variant, plus the bundle budget) that passed
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
    pub variants: Vec<VariantResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<BundleResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantResult {
    pub variant: String,
    pub runs: usize,
    pub passed: bool,
    pub categories: Vec<CategoryResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: String,
    pub goal: f64,
    pub actual: f64,
    pub samples: Vec<f64>,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub artifact: String,
    pub bytes: u64,
    pub actual_kb: f64,
    pub max_kb: f64,
    pub within_budget: bool,
}

impl From<&VariantVerdict> for VariantResult {
    fn from(v: &VariantVerdict) -> Self {
        Self {
            variant: v.variant.clone(),
            runs: v.runs,
            passed: v.passed,
            categories: v
                .categories
                .iter()
                .map(|c| CategoryResult {
                    category: c.category.clone(),
                    goal: c.goal,
                    actual: c.actual,
                    samples: c.samples.clone(),
                    passed: c.passed,
                })
                .collect(),
        }
    }
}

fn bundle_result(category: Option<&String>, b: &BundleCheck) -> BundleResult {
    BundleResult {
        category: category.cloned(),
        artifact: b.artifact.display().to_string(),
        bytes: b.bytes,
        actual_kb: b.actual_kb,
        max_kb: b.max_kb,
        within_budget: b.within_budget,
    }
}

impl Provenance {
    fn new(version: &str) -> Self {
        Self {
            scoregate_version: version.to_string(),
            goals_digest: None,
            aggregation: None,
        }
    }
}

impl Summary {
    pub fn success(version: &str) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            reason_code_version: REASON_CODE_VERSION,
            exit_code: 0,
            reason_code: "OK".to_string(),
            message: None,
            next_step: None,
            provenance: Provenance::new(version),
            generated_at: chrono::Utc::now().to_rfc3339(),
            results: None,
        }
    }

    pub fn failure(
        exit_code: i32,
        reason_code: &str,
        message: &str,
        next_step: &str,
        version: &str,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            reason_code_version: REASON_CODE_VERSION,
            exit_code,
            reason_code: reason_code.to_string(),
            message: Some(message.to_string()),
            next_step: Some(next_step.to_string()),
            provenance: Provenance::new(version),
            generated_at: chrono::Utc::now().to_rfc3339(),
            results: None,
        }
    }

    pub fn with_goals(mut self, digest: &str, aggregation: &str) -> Self {
        self.provenance.goals_digest = Some(digest.to_string());
        self.provenance.aggregation = Some(aggregation.to_string());
        self
    }

    pub fn with_verdict(mut self, verdict: &Verdict) -> Self {
        let counts = verdict.counts();
        self.results = Some(ResultsSummary {
            passed: counts.passed,
            failed: counts.failed,
            total: counts.total,
            variants: verdict.variants.iter().map(VariantResult::from).collect(),
            bundle: verdict
                .bundle
                .as_ref()
                .map(|b| bundle_result(verdict.bundle_category.as_ref(), b)),
        });
        self
    }
}

/// Write summary.json to file
pub fn write_summary(summary: &Summary, out: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(out, json)?;
    Ok(())
}
