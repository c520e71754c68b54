//! Turning goals + reports (+ artifact directory) into a [`Verdict`].

use crate::aggregate::{aggregate, Aggregation};
use crate::bundle::{check_bundle_size, BundleCheck};
use crate::errors::{ScoreGateError, ScoreGateResult};
use crate::goals::Goals;
use crate::reports::ReportsByVariant;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryVerdict {
    pub category: String,
    pub goal: f64,
    pub actual: f64,
    /// Raw scores in execution order.
    pub samples: Vec<f64>,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantVerdict {
    pub variant: String,
    pub runs: usize,
    pub categories: Vec<CategoryVerdict>,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub aggregation: Aggregation,
    pub variants: Vec<VariantVerdict>,
    /// Category that owns the bundle budget, when one is declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<BundleCheck>,
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerdictCounts {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl Verdict {
    /// Every category of every variant met its goal.
    pub fn categories_passed(&self) -> bool {
        self.variants.iter().all(|v| v.passed)
    }

    /// `true` when no budget is declared.
    pub fn bundle_passed(&self) -> bool {
        !matches!(&self.bundle, Some(b) if !b.within_budget)
    }

    /// `(variant, category)` pairs that fell short of their goal.
    pub fn failed_categories(&self) -> Vec<(&str, &CategoryVerdict)> {
        self.variants
            .iter()
            .flat_map(|v| {
                v.categories
                    .iter()
                    .filter(|c| !c.passed)
                    .map(move |c| (v.variant.as_str(), c))
            })
            .collect()
    }

    /// Category checks across all variants; the bundle check counts as one more.
    pub fn counts(&self) -> VerdictCounts {
        let mut passed = 0;
        let mut failed = 0;
        for c in self.variants.iter().flat_map(|v| v.categories.iter()) {
            if c.passed {
                passed += 1;
            } else {
                failed += 1;
            }
        }
        if let Some(b) = &self.bundle {
            if b.within_budget {
                passed += 1;
            } else {
                failed += 1;
            }
        }
        VerdictCounts {
            passed,
            failed,
            total: passed + failed,
        }
    }
}

/// Aggregate every configured variant, compare with its goals, and run the
/// bundle check when a budget is declared.
///
/// Overall success is the AND of every category of every variant and the
/// bundle budget. The function only reads its inputs, so identical inputs
/// give identical verdicts.
pub fn evaluate(
    goals: &Goals,
    reports: &ReportsByVariant,
    artifact_dir: Option<&Path>,
) -> ScoreGateResult<Verdict> {
    let categories = goals.categories();

    let mut variants = Vec::with_capacity(goals.variants.len());
    for variant in &goals.variants {
        let runs = reports
            .get(variant)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| {
                ScoreGateError::report_load(format!("no reports found for variant `{variant}`"))
            })?;
        let agg = aggregate(runs, &categories, goals.aggregation)?;

        let mut judged = Vec::with_capacity(goals.goals.len());
        for goal in &goals.goals {
            let cat = agg.category(&goal.category).ok_or_else(|| {
                ScoreGateError::report_load(format!(
                    "variant `{variant}` has no score for `{}`",
                    goal.category
                ))
            })?;
            judged.push(CategoryVerdict {
                category: goal.category.clone(),
                goal: goal.min_score,
                actual: cat.score,
                samples: cat.samples.clone(),
                passed: cat.score >= goal.min_score,
            });
        }

        let passed = judged.iter().all(|c| c.passed);
        variants.push(VariantVerdict {
            variant: variant.clone(),
            runs: agg.runs,
            categories: judged,
            passed,
        });
    }

    let (bundle_category, bundle) = match goals.bundle() {
        Some((goal, budget)) => {
            let dir = artifact_dir.ok_or_else(|| {
                ScoreGateError::config(format!(
                    "goal `{}` declares a bundle budget but no artifact directory was given",
                    goal.category
                ))
            })?;
            let check = check_bundle_size(dir, budget.max_kb, &budget.pattern)?;
            (Some(goal.category.clone()), Some(check))
        }
        None => (None, None),
    };

    let mut verdict = Verdict {
        aggregation: goals.aggregation,
        variants,
        bundle_category,
        bundle,
        passed: false,
    };
    verdict.passed = verdict.categories_passed() && verdict.bundle_passed();

    let counts = verdict.counts();
    tracing::info!(
        passed = verdict.passed,
        checks_passed = counts.passed,
        checks_failed = counts.failed,
        aggregation = %verdict.aggregation,
        "evaluation complete"
    );

    Ok(verdict)
}
